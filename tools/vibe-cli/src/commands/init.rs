//! Create a new Vibe Studio project file.

use std::path::PathBuf;

use vibe_project_model::project::Project;

use super::{parse_category, parse_vibe, save_project};

pub fn run(output: PathBuf, category: String, vibe: String, duration: f64) -> anyhow::Result<()> {
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }
    if duration <= 0.0 {
        anyhow::bail!("Target duration must be positive, got {duration}");
    }

    let category = parse_category(&category);
    let vibe = parse_vibe(&vibe);

    let project = Project::new(category, vibe, duration);
    save_project(&project, &output)?;

    println!("Project created: {}", output.display());
    println!("  ID: {}", project.id);
    println!("  Category: {}", category.label());
    println!("  Vibe: {}", vibe.label());
    println!("  Target duration: {duration}s");
    println!();
    println!("Next: vibe add {} <photos, clips, music>...", output.display());

    Ok(())
}

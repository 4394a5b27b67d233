//! Set the timeline order.

use std::path::PathBuf;

use super::{load_project, save_project};

pub fn run(path: PathBuf, ids: Vec<String>) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;

    if let Some(unknown) = ids.iter().find(|id| project.media_item(id).is_none()) {
        anyhow::bail!("Unknown media id: {unknown}");
    }
    project.reorder(&ids);
    save_project(&project, &path)?;

    println!("Timeline:");
    for item in project.ordered_media() {
        println!("  {:>3}. {} {}", item.position, item.id, item.filename);
    }
    Ok(())
}

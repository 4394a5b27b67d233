//! Show project information.

use std::path::PathBuf;

use vibe_project_model::project::MediaKind;
use vibe_render_engine::timing::plan_durations;

use super::load_project;

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let project = load_project(&path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&project)?);
        return Ok(());
    }

    println!("Project: {}", project.id);
    println!("  Created: {}", project.created_at);
    println!("  Status: {:?}", project.status);
    println!("  Category: {}", project.category.label());
    println!("  Vibe: {}", project.audio_vibe.label());
    println!("  Target duration: {}s", project.target_duration);
    println!("  Clip audio: {}%", project.video_volume);
    if let Some(output) = &project.output {
        println!("  Last output: {}", output.display());
    }
    println!();

    let ordered = project.ordered_media();
    let durations = plan_durations(&ordered, project.target_duration);
    println!("Timeline ({} items):", ordered.len());
    for (item, duration) in ordered.iter().zip(&durations) {
        let kind = match item.kind {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        };
        print!("  {:>3}. {} {kind:<5} {:>5.1}s  {}", item.position, item.id, duration, item.filename);
        if item.is_video() && (item.trim_start > 0.0 || item.trim_end.is_some()) {
            print!(
                "  [trim {}s..{}]",
                item.trim_start,
                item.trim_end.map(|e| format!("{e}s")).unwrap_or_else(|| "end".to_string())
            );
        }
        println!();
    }
    println!();

    println!("Audio tracks:");
    if project.audio_tracks.is_empty() {
        println!("  (none)");
    }
    for track in &project.audio_tracks {
        println!("  {} {} ({}%)  {}", track.id, track.role, track.volume, track.filename);
    }

    let missing = project.validate_sources();
    if !missing.is_empty() {
        println!();
        println!("Warnings:");
        for message in missing {
            println!("  [WARN] {message}");
        }
    }

    Ok(())
}

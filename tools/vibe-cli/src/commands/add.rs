//! Add media and audio files to a project.

use std::path::PathBuf;

use vibe_common::config::AppConfig;
use vibe_project_model::project::{short_id, Upload};

use super::{load_project, save_project};

pub async fn run(config: &AppConfig, path: PathBuf, files: Vec<PathBuf>) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;
    let workspace = config.project_workspace(&project.id);
    tokio::fs::create_dir_all(&workspace).await?;

    for file in files {
        if !file.is_file() {
            anyhow::bail!("Not a file: {}", file.display());
        }
        let filename = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = file
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
            .unwrap_or_default();

        // Uploads are stored under a generated name; the original is kept as metadata.
        let stored = workspace.join(format!("{}{ext}", short_id()));
        tokio::fs::copy(&file, &stored).await?;
        tracing::debug!(source = %file.display(), stored = %stored.display(), "Copied upload");

        match project.add_upload(stored, filename.clone()) {
            Upload::Media(item) => {
                println!("  + {:?} {} ({})", item.kind, item.id, filename);
            }
            Upload::Audio(track) => {
                println!("  + Audio {} ({}, volume {}%)", track.id, filename, track.volume);
            }
        }
    }

    save_project(&project, &path)?;
    println!(
        "Project now has {} media items and {} audio tracks.",
        project.media.len(),
        project.audio_tracks.len()
    );
    Ok(())
}

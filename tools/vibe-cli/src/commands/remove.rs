//! Remove a media item or audio track.

use std::path::PathBuf;

use super::{load_project, save_project};

pub fn run(path: PathBuf, id: String) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;

    if project.remove_media(&id) {
        println!("Removed media item {id}");
    } else if project.remove_audio_track(&id) {
        println!("Removed audio track {id}");
    } else {
        anyhow::bail!("No media item or audio track with id {id}");
    }

    save_project(&project, &path)
}

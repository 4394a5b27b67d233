//! Joining segments into one silent video.

use std::path::{Path, PathBuf};

use vibe_common::error::{VibeError, VibeResult};

use crate::job::{base_args, JobArtifacts, JobSettings};
use crate::runner::{CommandRunner, RunError};

/// One `file '<path>'` line of a concat-demuxer list.
///
/// Single quotes inside the path are closed, escaped and reopened.
pub fn concat_list_line(path: &Path) -> String {
    let escaped = path.display().to_string().replace('\'', r"'\''");
    format!("file '{escaped}'")
}

/// Full concat-demuxer list for `paths`, in order.
pub fn concat_list(paths: &[PathBuf]) -> String {
    let mut list = String::new();
    for path in paths {
        list.push_str(&concat_list_line(path));
        list.push('\n');
    }
    list
}

/// Write a concat list to `list_path` and register it for cleanup.
pub async fn write_concat_list(
    list_path: &Path,
    paths: &[PathBuf],
    artifacts: &mut JobArtifacts,
) -> VibeResult<()> {
    if let Some(parent) = list_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    artifacts.track(list_path);
    tokio::fs::write(list_path, concat_list(paths)).await?;
    Ok(())
}

/// Encoder arguments re-encoding a concat list into a silent H.264 video.
pub fn concat_args(list_path: &Path, settings: &JobSettings, output: &Path) -> Vec<String> {
    let mut args = base_args();
    args.extend([
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        list_path.display().to_string(),
    ]);
    args.extend(settings.video_codec_args());
    args.push("-an".to_string());
    args.push(output.display().to_string());
    args
}

/// Concatenate `segments` into `output`.
///
/// On failure no file is left at `output`.
pub async fn concatenate(
    runner: &dyn CommandRunner,
    segments: &[PathBuf],
    settings: &JobSettings,
    output: &Path,
    artifacts: &mut JobArtifacts,
) -> VibeResult<()> {
    let list_path = settings.concat_list_path();
    write_concat_list(&list_path, segments, artifacts).await?;

    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    tracing::info!(
        segments = segments.len(),
        output = %output.display(),
        "Concatenating segments"
    );

    let args = concat_args(&list_path, settings, output);
    match runner.run(&args, settings.concat_timeout).await {
        Ok(()) => Ok(()),
        Err(e) => {
            remove_partial(output).await;
            Err(match e {
                RunError::EncoderUnavailable { .. } => e.into(),
                other => VibeError::concatenation(other.to_string()),
            })
        }
    }
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial output"),
    }
}

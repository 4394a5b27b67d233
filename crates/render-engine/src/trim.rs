//! Destructive clip trimming.

use std::path::{Path, PathBuf};

use vibe_common::error::{VibeError, VibeResult};
use vibe_project_model::project::MediaItem;

use crate::job::base_args;
use crate::runner::CommandRunner;
use crate::timing::{format_secs, DEFAULT_ENCODE_TIMEOUT};

/// Where the trimmed copy of `item` is written.
pub fn trimmed_path(item: &MediaItem, workspace: &Path) -> PathBuf {
    workspace.join(format!("{}_trimmed.mp4", item.id))
}

/// Encoder arguments cutting `source` to `[start, end]`.
pub fn trim_args(source: &Path, start: f64, end: Option<f64>, output: &Path) -> Vec<String> {
    let mut args = base_args();
    args.extend([
        "-ss".to_string(),
        format_secs(start),
        "-i".to_string(),
        source.display().to_string(),
    ]);
    if let Some(end) = end {
        args.extend(["-to".to_string(), format_secs(end)]);
    }
    args.extend([
        "-c:v".to_string(),
        "libx264".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-preset".to_string(),
        "fast".to_string(),
        output.display().to_string(),
    ]);
    args
}

/// Re-encode a video item to the given window and point it at the result.
///
/// The item's own trim window is cleared since the new file already is the
/// requested window.
pub async fn trim_clip(
    runner: &dyn CommandRunner,
    item: &mut MediaItem,
    start: f64,
    end: Option<f64>,
    workspace: &Path,
) -> VibeResult<PathBuf> {
    if !item.is_video() {
        return Err(VibeError::project(format!(
            "media {} is not a video and cannot be trimmed",
            item.id
        )));
    }
    if start < 0.0 || end.is_some_and(|end| end <= start) {
        return Err(VibeError::project(format!(
            "invalid trim window {}s to {}s",
            format_secs(start),
            end.map(format_secs).unwrap_or_default()
        )));
    }

    tokio::fs::create_dir_all(workspace).await?;
    let output = trimmed_path(item, workspace);
    let args = trim_args(&item.path, start, end, &output);

    tracing::info!(media_id = %item.id, start, end = ?end, "Trimming clip");
    runner.run(&args, DEFAULT_ENCODE_TIMEOUT).await?;

    item.path = output.clone();
    item.trim_start = 0.0;
    item.trim_end = None;
    Ok(output)
}

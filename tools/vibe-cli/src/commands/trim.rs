//! Re-encode a clip to a time window.

use std::path::PathBuf;

use vibe_common::config::AppConfig;
use vibe_render_engine::{trim_clip, FfmpegRunner};

use super::{load_project, save_project};

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    id: String,
    start: f64,
    end: Option<f64>,
) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;
    let workspace = config.project_workspace(&project.id);
    let runner = FfmpegRunner::from_config(&config.encoder);

    let item = project
        .media_item_mut(&id)
        .ok_or_else(|| anyhow::anyhow!("Unknown media id: {id}"))?;
    let output = trim_clip(&runner, item, start, end, &workspace).await?;

    save_project(&project, &path)?;
    println!("Trimmed clip written to {}", output.display());
    Ok(())
}

//! Render a project into its final video.

use std::path::PathBuf;
use std::sync::Arc;

use vibe_common::config::AppConfig;
use vibe_project_model::store::{InMemoryProjectStore, ProjectStore};
use vibe_render_engine::{
    AudioOutcome, FfmpegRunner, GenerationRequest, GenerationService, RenderPipeline,
};

use super::{load_project, save_project};

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    duration: Option<f64>,
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let project = load_project(&path)?;
    let id = project.id.clone();

    let store = Arc::new(InMemoryProjectStore::new());
    store.put(project);

    let runner = Arc::new(FfmpegRunner::from_config(&config.encoder));
    let service = GenerationService::new(store.clone(), RenderPipeline::new(runner, config));
    let request = GenerationRequest {
        target_duration: duration,
        width,
        height,
        fps,
    };

    if !json {
        println!("Generating video for project {id}...");
    }
    let result = service.generate(&id, &request).await;

    // Status and output path are persisted whatever the outcome.
    save_project(&store.get(&id)?, &path)?;

    let output = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Video ready: {}", output.output_path.display());
    println!(
        "  Segments: {} encoded, {} skipped",
        output.segments_used, output.segments_failed
    );
    let audio = match output.audio {
        AudioOutcome::Mixed => "all sources mixed",
        AudioOutcome::FirstSourceOnly => "mix failed, first source only",
        AudioOutcome::Silent => "none",
    };
    println!("  Audio: {audio}");
    Ok(())
}

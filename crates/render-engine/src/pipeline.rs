//! End-to-end generation of one project video.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use vibe_common::config::{AppConfig, RenderDefaults};
use vibe_common::error::{VibeError, VibeResult};
use vibe_project_model::project::{Project, ProjectStatus};

use crate::concat::concatenate;
use crate::job::{JobArtifacts, JobSettings};
use crate::mixer::{extract_clip_audio, mix_audio, track_sources, AudioOutcome};
use crate::runner::CommandRunner;
use crate::segment::synthesize_segments;

/// Per-call overrides of project and config values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Overrides the project's target duration.
    pub target_duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<u32>,
}

/// Result of a successful generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub output_path: PathBuf,
    pub filename: String,
    pub status: ProjectStatus,
    pub audio: AudioOutcome,
    pub segments_used: usize,
    pub segments_failed: usize,
}

/// Runs segment synthesis, concatenation and audio mixing for a project.
pub struct RenderPipeline {
    runner: Arc<dyn CommandRunner>,
    config: AppConfig,
}

impl RenderPipeline {
    pub fn new(runner: Arc<dyn CommandRunner>, config: &AppConfig) -> Self {
        Self {
            runner,
            config: config.clone(),
        }
    }

    /// Generate the final video for `project`.
    ///
    /// Temporary files are removed whatever the outcome.
    #[tracing::instrument(skip_all, fields(project_id = %project.id))]
    pub async fn generate(
        &self,
        project: &Project,
        request: &GenerationRequest,
    ) -> VibeResult<GenerationOutput> {
        let Some(version) = self.runner.version().await else {
            return Err(VibeError::encoder_unavailable(format!(
                "{} could not be run",
                self.config.encoder.binary.display()
            )));
        };
        tracing::debug!(%version, "Encoder available");

        if project.media.is_empty() {
            return Err(VibeError::no_usable_media("project has no media"));
        }

        let target_secs = request.target_duration.unwrap_or(project.target_duration);
        if target_secs.is_nan() || target_secs <= 0.0 {
            return Err(VibeError::project(format!(
                "target duration must be positive, got {target_secs}"
            )));
        }

        let render = &self.config.render;
        let frame = RenderDefaults {
            width: request.width.unwrap_or(render.width),
            height: request.height.unwrap_or(render.height),
            fps: request.fps.unwrap_or(render.fps),
        };
        validate_frame(&frame)?;

        let settings = JobSettings::new(
            project,
            target_secs,
            &frame,
            self.config.encoder.clone(),
            self.config.project_workspace(&project.id),
            self.config.output_dir.clone(),
        );

        let mut artifacts = JobArtifacts::new();
        let result = self.run_stages(project, &settings, &mut artifacts).await;
        artifacts.cleanup().await;

        match &result {
            Ok(output) => tracing::info!(
                output = %output.output_path.display(),
                audio = ?output.audio,
                segments_used = output.segments_used,
                segments_failed = output.segments_failed,
                "Generation complete"
            ),
            Err(e) => tracing::error!(error = %e, "Generation failed"),
        }
        result
    }

    async fn run_stages(
        &self,
        project: &Project,
        settings: &JobSettings,
        artifacts: &mut JobArtifacts,
    ) -> VibeResult<GenerationOutput> {
        tokio::fs::create_dir_all(&settings.workspace).await?;
        tokio::fs::create_dir_all(&settings.output_dir).await?;

        let items = project.ordered_media();
        let runner = self.runner.as_ref();

        let report = synthesize_segments(runner, &items, settings, artifacts).await?;

        let filename = final_filename(&project.id);
        let final_path = settings.output_dir.join(&filename);
        let concat_path = settings.concat_output_path(&filename);
        artifacts.track(&concat_path);

        let segment_paths: Vec<PathBuf> = report.segments.iter().map(|s| s.path.clone()).collect();
        concatenate(runner, &segment_paths, settings, &concat_path, artifacts).await?;

        let mut sources = track_sources(&project.audio_tracks).await;
        if settings.keeps_clip_audio() {
            let video_segments: Vec<PathBuf> =
                report.video_segments().map(|s| s.path.clone()).collect();
            if let Some(clips) = extract_clip_audio(runner, &video_segments, settings, artifacts).await
            {
                sources.push(clips);
            }
        }

        let audio = mix_audio(runner, &concat_path, &sources, settings, &final_path).await?;

        Ok(GenerationOutput {
            output_path: final_path,
            filename,
            status: ProjectStatus::Complete,
            audio,
            segments_used: report.segments.len(),
            segments_failed: report.failures.len(),
        })
    }
}

/// yuv420p needs even dimensions; zero would break `scale` and `crop`.
fn validate_frame(frame: &RenderDefaults) -> VibeResult<()> {
    for (name, value) in [("width", frame.width), ("height", frame.height)] {
        if value == 0 || value % 2 != 0 {
            return Err(VibeError::project(format!(
                "{name} must be a positive even number, got {value}"
            )));
        }
    }
    if frame.fps == 0 {
        return Err(VibeError::project("fps must be positive"));
    }
    Ok(())
}

/// `vibe_<project id>_<unix seconds>.mp4`
pub fn final_filename(project_id: &str) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("vibe_{project_id}_{secs}.mp4")
}

//! Per-run parameters and scratch files of a generation job.

use std::path::{Path, PathBuf};
use std::time::Duration;

use vibe_common::config::{EncoderConfig, RenderDefaults};
use vibe_project_model::category::ColorGrade;
use vibe_project_model::project::Project;

use crate::timing::{concat_timeout, segment_timeout};

/// Parameters computed once per job and shared by every stage.
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub project_id: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub target_secs: f64,
    pub grade: ColorGrade,
    /// Gain applied to the clips' own audio; zero strips it.
    pub clip_audio_gain: f64,
    pub encoder: EncoderConfig,
    /// Per-project scratch directory.
    pub workspace: PathBuf,
    /// Directory receiving the finished video.
    pub output_dir: PathBuf,
    pub segment_timeout: Duration,
    pub concat_timeout: Duration,
}

impl JobSettings {
    pub fn new(
        project: &Project,
        target_secs: f64,
        frame: &RenderDefaults,
        encoder: EncoderConfig,
        workspace: PathBuf,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            project_id: project.id.clone(),
            width: frame.width,
            height: frame.height,
            fps: frame.fps.max(1),
            target_secs,
            grade: project.category.color_grade(),
            clip_audio_gain: project.video_gain(),
            encoder,
            workspace,
            output_dir,
            segment_timeout: segment_timeout(target_secs),
            concat_timeout: concat_timeout(target_secs),
        }
    }

    pub fn keeps_clip_audio(&self) -> bool {
        self.clip_audio_gain > 0.0
    }

    pub fn segment_path(&self, index: usize) -> PathBuf {
        self.workspace.join(format!("seg_{index:03}.mp4"))
    }

    pub fn concat_list_path(&self) -> PathBuf {
        self.workspace.join("concat.txt")
    }

    pub fn clip_audio_list_path(&self) -> PathBuf {
        self.workspace.join("va_concat.txt")
    }

    pub fn clip_audio_path(&self) -> PathBuf {
        self.workspace.join("vid_audio.aac")
    }

    /// Intermediate silent video for a final file name.
    pub fn concat_output_path(&self, final_name: &str) -> PathBuf {
        self.output_dir.join(format!("concat_{final_name}"))
    }

    pub fn video_codec_args(&self) -> Vec<String> {
        vec![
            "-c:v".to_string(),
            "libx264".to_string(),
            "-preset".to_string(),
            self.encoder.preset.clone(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
        ]
    }
}

/// Leading flags shared by every encoder invocation.
pub fn base_args() -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ]
}

/// Temporary files created by a job.
///
/// [`JobArtifacts::cleanup`] removes them at the end of the run; anything
/// still tracked when the value is dropped (e.g. a cancelled job) is
/// removed synchronously.
#[derive(Debug, Default)]
pub struct JobArtifacts {
    paths: Vec<PathBuf>,
}

impl JobArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Stop tracking a path that has become a deliverable.
    pub fn release(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Delete every tracked file. Missing files are not an error.
    pub async fn cleanup(&mut self) {
        let mut removed = 0usize;
        for path in self.paths.drain(..) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove temp file");
                }
            }
        }
        tracing::debug!(removed, "Cleaned up job artifacts");
    }
}

impl Drop for JobArtifacts {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            std::fs::remove_file(&path).ok();
        }
    }
}

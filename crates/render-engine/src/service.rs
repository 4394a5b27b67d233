//! Project-level generation with status bookkeeping.

use std::sync::Arc;

use vibe_common::error::VibeResult;
use vibe_project_model::project::{Project, ProjectStatus};
use vibe_project_model::store::ProjectStore;

use crate::pipeline::{GenerationOutput, GenerationRequest, RenderPipeline};

/// Generates videos for projects held in a [`ProjectStore`].
///
/// At most one job runs per project; the project's status moves through
/// `generating` to `complete` or `failed`.
pub struct GenerationService {
    store: Arc<dyn ProjectStore>,
    pipeline: RenderPipeline,
}

impl GenerationService {
    pub fn new(store: Arc<dyn ProjectStore>, pipeline: RenderPipeline) -> Self {
        Self { store, pipeline }
    }

    pub async fn generate(
        &self,
        project_id: &str,
        request: &GenerationRequest,
    ) -> VibeResult<GenerationOutput> {
        let _guard = self.store.begin_generation(project_id)?;

        let snapshot = self.store.update(project_id, &mut |p: &mut Project| {
            p.status = ProjectStatus::Generating;
        })?;
        tracing::info!(
            project_id,
            media = snapshot.media.len(),
            tracks = snapshot.audio_tracks.len(),
            "Starting generation"
        );

        let result = self.pipeline.generate(&snapshot, request).await;

        let write_back = match &result {
            Ok(output) => {
                let path = output.output_path.clone();
                self.store.update(project_id, &mut |p: &mut Project| {
                    p.status = ProjectStatus::Complete;
                    p.output = Some(path.clone());
                })
            }
            Err(_) => self.store.update(project_id, &mut |p: &mut Project| {
                p.status = ProjectStatus::Failed;
            }),
        };
        if let Err(e) = write_back {
            // The project was deleted mid-job.
            tracing::warn!(project_id, error = %e, "Could not record generation result");
        }

        result
    }
}

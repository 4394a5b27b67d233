//! Per-item segment encoding.
//!
//! Every timeline item becomes one uniformly sized, colour-graded MP4:
//!
//! - images: a blurred, cover-scaled copy of the picture as background with
//!   the contained picture centred on top, then a slow zoom-in;
//! - videos: the trimmed window scaled to cover the frame and cropped.
//!
//! Failures are logged and skipped; the surviving segments keep timeline
//! order.

use std::path::{Path, PathBuf};

use vibe_common::error::{VibeError, VibeResult};
use vibe_project_model::project::{MediaItem, MediaKind};

use crate::filter::{AspectFit, CropAnchor, Filter, FilterChain, FilterGraph, Pad};
use crate::job::{base_args, JobArtifacts, JobSettings};
use crate::runner::{CommandRunner, RunError};
use crate::timing::{format_secs, plan_durations};

/// Blur strength of the image background layer.
pub const BACKGROUND_BLUR_SIGMA: f64 = 30.0;

/// Per-frame zoom increment of the Ken Burns effect.
pub const ZOOM_STEP: f64 = 0.0005;

/// Zoom ceiling of the Ken Burns effect.
pub const MAX_ZOOM: f64 = 1.06;

/// An encoded segment that survived synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Position in the ordered timeline.
    pub index: usize,
    pub media_id: String,
    pub kind: MediaKind,
    pub path: PathBuf,
    /// Requested display length in seconds.
    pub duration_secs: f64,
}

impl Segment {
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

/// Outcome of the segment stage.
#[derive(Debug, Default)]
pub struct SegmentReport {
    pub segments: Vec<Segment>,
    pub failures: Vec<VibeError>,
}

impl SegmentReport {
    pub fn video_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_video())
    }
}

/// Filter graph turning a still image into a zooming vertical frame.
///
/// Input 0 feeds the blurred background, input 1 the foreground.
pub fn image_filter_graph(settings: &JobSettings, duration_secs: f64) -> FilterGraph {
    let (w, h) = (settings.width, settings.height);
    let frames = (duration_secs * settings.fps as f64).floor().max(1.0) as u64;

    FilterGraph::new()
        .chain(
            FilterChain::new()
                .input(Pad::video_input(0))
                .then(Filter::scale(w, h, AspectFit::Cover))
                .then(Filter::crop(w, h, CropAnchor::Center))
                .then(Filter::blur(BACKGROUND_BLUR_SIGMA))
                .output(Pad::new("bg")),
        )
        .chain(
            FilterChain::new()
                .input(Pad::video_input(1))
                .then(Filter::scale(w, h, AspectFit::Contain))
                .output(Pad::new("fg")),
        )
        .chain(
            FilterChain::new()
                .inputs([Pad::new("bg"), Pad::new("fg")])
                .then(Filter::OverlayCentered)
                .then(Filter::ZoomIn {
                    step: ZOOM_STEP,
                    max_zoom: MAX_ZOOM,
                    frames,
                    width: w,
                    height: h,
                    fps: settings.fps,
                })
                .then(Filter::ColorGrade(settings.grade))
                .output(Pad::new("vout")),
        )
}

/// Video filter chain for a clip.
pub fn video_filter_chain(settings: &JobSettings) -> FilterChain {
    FilterChain::new()
        .then(Filter::scale(settings.width, settings.height, AspectFit::Cover))
        .then(Filter::crop(settings.width, settings.height, CropAnchor::Default))
        .then(Filter::ColorGrade(settings.grade))
}

/// Encoder arguments for an image segment.
pub fn image_segment_args(
    source: &Path,
    duration_secs: f64,
    settings: &JobSettings,
    output: &Path,
) -> Vec<String> {
    let source = source.display().to_string();
    let mut args = base_args();
    // Same picture twice: background and foreground layers.
    for _ in 0..2 {
        args.extend(["-loop".to_string(), "1".to_string(), "-i".to_string(), source.clone()]);
    }
    args.extend([
        "-filter_complex".to_string(),
        image_filter_graph(settings, duration_secs).to_string(),
        "-map".to_string(),
        Pad::new("vout").map_arg(),
        "-t".to_string(),
        format_secs(duration_secs),
    ]);
    args.extend(settings.video_codec_args());
    args.push("-an".to_string());
    args.push(output.display().to_string());
    args
}

/// Length actually taken from a clip: the requested duration, capped by the
/// trim window when an end point is set.
pub fn video_segment_duration(item: &MediaItem, duration_secs: f64) -> f64 {
    match item.trim_end {
        Some(end) => duration_secs.min(end - item.trim_start),
        None => duration_secs,
    }
}

/// Encoder arguments for a video segment.
///
/// Fails when the trim window leaves nothing to encode.
pub fn video_segment_args(
    item: &MediaItem,
    index: usize,
    duration_secs: f64,
    settings: &JobSettings,
    output: &Path,
) -> VibeResult<Vec<String>> {
    let seg_duration = video_segment_duration(item, duration_secs);
    if seg_duration <= 0.0 {
        return Err(VibeError::segment(
            index,
            format!(
                "empty trim window ({}s to {}s)",
                format_secs(item.trim_start),
                item.trim_end.map(format_secs).unwrap_or_default()
            ),
        ));
    }

    let mut args = base_args();
    if item.trim_start > 0.0 {
        args.extend(["-ss".to_string(), format_secs(item.trim_start)]);
    }
    args.extend([
        "-i".to_string(),
        item.path.display().to_string(),
        "-t".to_string(),
        format_secs(seg_duration),
        "-vf".to_string(),
        video_filter_chain(settings).to_string(),
    ]);

    if settings.keeps_clip_audio() {
        args.extend([
            "-af".to_string(),
            Filter::volume(settings.clip_audio_gain).to_string(),
        ]);
        args.extend(settings.video_codec_args());
        args.extend([
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            format!("{}k", settings.encoder.clip_audio_bitrate_kbps),
        ]);
    } else {
        args.extend(settings.video_codec_args());
        args.push("-an".to_string());
    }
    args.push(output.display().to_string());
    Ok(args)
}

/// Encode every item in order, skipping the ones that fail.
///
/// Returns [`VibeError::NoUsableMedia`] when nothing survives and
/// [`VibeError::EncoderUnavailable`] as soon as the encoder cannot start.
pub async fn synthesize_segments(
    runner: &dyn CommandRunner,
    items: &[MediaItem],
    settings: &JobSettings,
    artifacts: &mut JobArtifacts,
) -> VibeResult<SegmentReport> {
    let durations = plan_durations(items, settings.target_secs);
    let mut report = SegmentReport::default();

    for (index, (item, &duration)) in items.iter().zip(&durations).enumerate() {
        let output = settings.segment_path(index);
        artifacts.track(&output);

        let args = match item.kind {
            MediaKind::Image => Ok(image_segment_args(&item.path, duration, settings, &output)),
            MediaKind::Video => video_segment_args(item, index, duration, settings, &output),
        };
        let args = match args {
            Ok(args) => args,
            Err(e) => {
                tracing::error!(index, media_id = %item.id, error = %e, "Skipping segment");
                report.failures.push(e);
                continue;
            }
        };

        tracing::info!(
            index,
            media_id = %item.id,
            kind = ?item.kind,
            duration_secs = duration,
            "Encoding segment"
        );

        match runner.run(&args, settings.segment_timeout).await {
            Ok(()) => report.segments.push(Segment {
                index,
                media_id: item.id.clone(),
                kind: item.kind,
                path: output,
                duration_secs: duration,
            }),
            Err(RunError::EncoderUnavailable { binary }) => {
                return Err(VibeError::encoder_unavailable(format!(
                    "{binary} is not installed"
                )));
            }
            Err(e) => {
                tracing::error!(index, media_id = %item.id, error = %e, "Segment failed, skipping");
                report.failures.push(VibeError::segment(index, e.to_string()));
            }
        }
    }

    if report.segments.is_empty() {
        return Err(VibeError::no_usable_media(format!(
            "all {} segments failed to encode",
            items.len()
        )));
    }

    tracing::info!(
        encoded = report.segments.len(),
        failed = report.failures.len(),
        "Segment stage finished"
    );
    Ok(report)
}

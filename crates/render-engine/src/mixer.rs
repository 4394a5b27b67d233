//! Audio mixing and final mux.
//!
//! The concatenated video is always silent. Every audio source (uploaded
//! tracks plus, optionally, the clips' own audio) is looped, scaled by its
//! gain and mixed, then muxed with a stream copy of the video and cut at the
//! target duration. If that fails the first source alone is muxed; if that
//! fails too the silent video is delivered as is.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use vibe_common::error::{VibeError, VibeResult};
use vibe_project_model::project::AudioTrack;

use crate::concat::write_concat_list;
use crate::filter::{Filter, FilterChain, FilterGraph, Pad};
use crate::job::{base_args, JobArtifacts, JobSettings};
use crate::runner::CommandRunner;
use crate::timing::{format_secs, CLIP_AUDIO_TIMEOUT, DEFAULT_ENCODE_TIMEOUT};

/// Label of the mixed audio stream.
const MIX_OUTPUT: &str = "aout";

/// One input of the mix.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    pub path: PathBuf,
    /// Linear gain in `[0.0, 1.0]`.
    pub gain: f64,
    /// Short name used in logs.
    pub label: String,
}

impl AudioSource {
    pub fn new(path: impl Into<PathBuf>, gain: f64, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            gain,
            label: label.into(),
        }
    }

    pub fn from_track(track: &AudioTrack) -> Self {
        Self::new(track.path.clone(), track.gain(), format!("track:{}", track.id))
    }
}

/// Which tier produced the final file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioOutcome {
    /// Every source mixed at its gain.
    Mixed,
    /// The mix failed; only the first source was muxed, at full level.
    FirstSourceOnly,
    /// No audio: nothing to mix, or every tier failed.
    Silent,
}

/// Sources for every track whose file exists, in track order.
pub async fn track_sources(tracks: &[AudioTrack]) -> Vec<AudioSource> {
    let mut sources = Vec::with_capacity(tracks.len());
    for track in tracks {
        if tokio::fs::try_exists(&track.path).await.unwrap_or(false) {
            sources.push(AudioSource::from_track(track));
        } else {
            tracing::warn!(
                track_id = %track.id,
                path = %track.path.display(),
                "Audio track file missing, leaving it out of the mix"
            );
        }
    }
    sources
}

/// Encoder arguments pulling the audio out of a concat list.
pub fn clip_audio_args(list_path: &Path, settings: &JobSettings, output: &Path) -> Vec<String> {
    let mut args = base_args();
    args.extend([
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        list_path.display().to_string(),
        "-vn".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        format!("{}k", settings.encoder.clip_audio_bitrate_kbps),
        output.display().to_string(),
    ]);
    args
}

/// Rebuild the clips' own audio as a single track.
///
/// `video_segments` are the surviving video segments in timeline order.
/// Returns `None` (with a warning) if there are none or extraction fails.
pub async fn extract_clip_audio(
    runner: &dyn CommandRunner,
    video_segments: &[PathBuf],
    settings: &JobSettings,
    artifacts: &mut JobArtifacts,
) -> Option<AudioSource> {
    if video_segments.is_empty() {
        return None;
    }

    let list_path = settings.clip_audio_list_path();
    if let Err(e) = write_concat_list(&list_path, video_segments, artifacts).await {
        tracing::warn!(error = %e, "Could not write clip audio list, skipping clip audio");
        return None;
    }

    let output = settings.clip_audio_path();
    artifacts.track(&output);
    let args = clip_audio_args(&list_path, settings, &output);
    match runner.run(&args, CLIP_AUDIO_TIMEOUT).await {
        Ok(()) => Some(AudioSource::new(output, settings.clip_audio_gain, "clips")),
        Err(e) => {
            tracing::warn!(error = %e, "Could not extract clip audio, skipping");
            None
        }
    }
}

/// Filter graph scaling every source and mixing them into `[aout]`.
///
/// Source `i` is encoder input `i + 1`; input 0 is the video.
pub fn mix_filter_graph(sources: &[AudioSource]) -> FilterGraph {
    let mut graph = FilterGraph::new();
    if let [only] = sources {
        graph.push(
            FilterChain::new()
                .input(Pad::audio_input(1))
                .then(Filter::volume(only.gain))
                .output(Pad::new(MIX_OUTPUT)),
        );
        return graph;
    }

    let labels: Vec<Pad> = (0..sources.len()).map(|i| Pad::new(format!("a{i}"))).collect();
    for (i, (source, label)) in sources.iter().zip(&labels).enumerate() {
        graph.push(
            FilterChain::new()
                .input(Pad::audio_input(i + 1))
                .then(Filter::volume(source.gain))
                .output(label.clone()),
        );
    }
    graph.push(
        FilterChain::new()
            .inputs(labels)
            .then(Filter::mix(sources.len()))
            .output(Pad::new(MIX_OUTPUT)),
    );
    graph
}

fn looped_input(path: &Path) -> [String; 4] {
    [
        "-stream_loop".to_string(),
        "-1".to_string(),
        "-i".to_string(),
        path.display().to_string(),
    ]
}

fn mux_tail(settings: &JobSettings, output: &Path) -> [String; 9] {
    [
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        format!("{}k", settings.encoder.audio_bitrate_kbps),
        "-t".to_string(),
        format_secs(settings.target_secs),
        output.display().to_string(),
    ]
}

/// Full mix-and-mux arguments.
pub fn mix_args(
    video: &Path,
    sources: &[AudioSource],
    settings: &JobSettings,
    output: &Path,
) -> Vec<String> {
    let mut args = base_args();
    args.extend(["-i".to_string(), video.display().to_string()]);
    for source in sources {
        args.extend(looped_input(&source.path));
    }
    args.extend([
        "-filter_complex".to_string(),
        mix_filter_graph(sources).to_string(),
        "-map".to_string(),
        "0:v:0".to_string(),
        "-map".to_string(),
        Pad::new(MIX_OUTPUT).map_arg(),
    ]);
    args.extend(mux_tail(settings, output));
    args
}

/// Single-source mux arguments, no filtering.
pub fn first_source_args(
    video: &Path,
    source: &AudioSource,
    settings: &JobSettings,
    output: &Path,
) -> Vec<String> {
    let mut args = base_args();
    args.extend(["-i".to_string(), video.display().to_string()]);
    args.extend(looped_input(&source.path));
    args.extend([
        "-map".to_string(),
        "0:v:0".to_string(),
        "-map".to_string(),
        "1:a:0".to_string(),
    ]);
    args.extend(mux_tail(settings, output));
    args
}

/// Produce `output` from the silent `video` and `sources`.
///
/// Never fails because of the encoder; only a failure to move the silent
/// video into place is an error.
pub async fn mix_audio(
    runner: &dyn CommandRunner,
    video: &Path,
    sources: &[AudioSource],
    settings: &JobSettings,
    output: &Path,
) -> VibeResult<AudioOutcome> {
    let Some(first) = sources.first() else {
        tracing::info!("No audio sources, delivering silent video");
        move_into_place(video, output).await?;
        return Ok(AudioOutcome::Silent);
    };

    tracing::info!(
        sources = sources.len(),
        labels = ?sources.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
        "Mixing audio"
    );

    let args = mix_args(video, sources, settings, output);
    match runner.run(&args, settings.concat_timeout).await {
        Ok(()) => {
            remove_quietly(video).await;
            return Ok(AudioOutcome::Mixed);
        }
        Err(e) => {
            let err = VibeError::audio_mix(e.to_string());
            tracing::error!(error = %err, "Audio mix failed, muxing first source only");
        }
    }

    let args = first_source_args(video, first, settings, output);
    match runner.run(&args, DEFAULT_ENCODE_TIMEOUT).await {
        Ok(()) => {
            remove_quietly(video).await;
            Ok(AudioOutcome::FirstSourceOnly)
        }
        Err(e) => {
            let err = VibeError::audio_mix(e.to_string());
            tracing::error!(error = %err, "Fallback mux failed, delivering silent video");
            move_into_place(video, output).await?;
            Ok(AudioOutcome::Silent)
        }
    }
}

/// Rename `from` to `to`, copying across filesystems when needed.
pub async fn move_into_place(from: &Path, to: &Path) -> VibeResult<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    if !tokio::fs::try_exists(from).await.unwrap_or(false) {
        return Err(VibeError::FileNotFound {
            path: from.to_path_buf(),
        });
    }
    tokio::fs::copy(from, to).await?;
    tokio::fs::remove_file(from).await?;
    Ok(())
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove intermediate");
        }
    }
}

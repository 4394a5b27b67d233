//! Error types shared across Vibe Studio crates.

use std::path::PathBuf;

/// Top-level error type for Vibe Studio operations.
#[derive(Debug, thiserror::Error)]
pub enum VibeError {
    #[error("Encoder unavailable: {message}")]
    EncoderUnavailable { message: String },

    #[error("Segment {index} failed to encode: {message}")]
    SegmentEncodeFailed { index: usize, message: String },

    #[error("No usable media: {message}")]
    NoUsableMedia { message: String },

    #[error("Concatenation failed: {message}")]
    ConcatenationFailed { message: String },

    #[error("Audio mix failed: {message}")]
    AudioMixFailed { message: String },

    #[error("Encoder timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    #[error("Generation already in progress for project {id}")]
    GenerationInProgress { id: String },

    #[error("Project error: {message}")]
    Project { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using VibeError.
pub type VibeResult<T> = Result<T, VibeError>;

impl VibeError {
    pub fn encoder_unavailable(msg: impl Into<String>) -> Self {
        Self::EncoderUnavailable {
            message: msg.into(),
        }
    }

    pub fn segment(index: usize, msg: impl Into<String>) -> Self {
        Self::SegmentEncodeFailed {
            index,
            message: msg.into(),
        }
    }

    pub fn no_usable_media(msg: impl Into<String>) -> Self {
        Self::NoUsableMedia {
            message: msg.into(),
        }
    }

    pub fn concatenation(msg: impl Into<String>) -> Self {
        Self::ConcatenationFailed {
            message: msg.into(),
        }
    }

    pub fn audio_mix(msg: impl Into<String>) -> Self {
        Self::AudioMixFailed {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }
}

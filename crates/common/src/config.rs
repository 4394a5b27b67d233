//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the encoder binary.
pub const ENCODER_ENV_VAR: &str = "VIBE_FFMPEG";

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-project scratch space (uploads, segments, concat lists).
    pub workspace_dir: PathBuf,

    /// Directory receiving finished videos.
    pub output_dir: PathBuf,

    /// Encoder invocation settings.
    pub encoder: EncoderConfig,

    /// Default output geometry.
    pub render: RenderDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// External encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Path or name of the ffmpeg binary.
    pub binary: PathBuf,

    /// x264 preset used for every video encode.
    pub preset: String,

    /// Bitrate of the final mixed audio stream.
    pub audio_bitrate_kbps: u32,

    /// Bitrate of clip audio retained inside segments.
    pub clip_audio_bitrate_kbps: u32,
}

/// Default output geometry for generated videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "vibe=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data = data_dir();
        Self {
            workspace_dir: data.join("uploads"),
            output_dir: data.join("outputs"),
            encoder: EncoderConfig::default(),
            render: RenderDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
            preset: "fast".to_string(),
            audio_bitrate_kbps: 192,
            clip_audio_bitrate_kbps: 128,
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    ///
    /// `VIBE_FFMPEG` takes precedence over the configured encoder binary.
    pub fn load() -> Self {
        let config_path = config_file_path();
        let mut config = Self::default();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(parsed) => config = parsed,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        config.apply_env_overrides();
        config
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(binary) = std::env::var(ENCODER_ENV_VAR) {
            let binary = binary.trim();
            if !binary.is_empty() {
                self.encoder.binary = PathBuf::from(binary);
            }
        }
    }

    /// Scratch directory for one project.
    pub fn project_workspace(&self, project_id: &str) -> PathBuf {
        self.workspace_dir.join(project_id)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vibe-studio").join("config.json")
}

/// Default data directory.
fn data_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("vibe-studio")
}

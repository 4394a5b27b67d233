//! Project metadata, media items, and audio tracks.
//!
//! A project is the top-level container that ties together the ordered
//! media timeline, the audio tracks mixed over it, and the state of the
//! last generation run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::{AudioVibe, Category};

/// Default length of a generated video, in seconds.
pub const DEFAULT_TARGET_DURATION_SECS: f64 = 30.0;

/// Default gain of an uploaded audio track (percent).
pub const DEFAULT_TRACK_VOLUME: u8 = 50;

const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "wav", "aac", "ogg", "m4a"];
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "webm"];

/// A Vibe Studio project (`project.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Short opaque identifier.
    pub id: String,

    /// Category selecting the colour grade.
    #[serde(default)]
    pub category: Category,

    /// Music mood chosen by the user.
    #[serde(default)]
    pub audio_vibe: AudioVibe,

    /// Requested video length in seconds.
    pub target_duration: f64,

    /// Timeline entries. Order is defined by `position`, not by index.
    #[serde(default)]
    pub media: Vec<MediaItem>,

    /// Audio tracks mixed together over the whole video.
    #[serde(default)]
    pub audio_tracks: Vec<AudioTrack>,

    /// Percentage of the clips' own audio kept in the output (0-100).
    #[serde(default = "default_video_volume")]
    pub video_volume: u8,

    /// Lifecycle state.
    #[serde(default)]
    pub status: ProjectStatus,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Location of the last finished video.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_video_volume() -> u8 {
    100
}

/// Lifecycle of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Generating,
    Complete,
    Failed,
}

/// Kind of timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// One entry on the visual timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: MediaKind,

    /// Source file on disk.
    pub path: PathBuf,

    /// Name the file was uploaded under.
    #[serde(default)]
    pub filename: String,

    /// Timeline order.
    #[serde(rename = "order")]
    pub position: i64,

    /// Seconds skipped at the head of a video clip.
    #[serde(default)]
    pub trim_start: f64,

    /// Last second of a video clip to use.
    #[serde(default)]
    pub trim_end: Option<f64>,

    /// Fixed display length overriding the automatic split.
    #[serde(default)]
    pub custom_duration: Option<f64>,

    #[serde(default)]
    pub caption: String,
}

impl MediaItem {
    /// Custom duration, ignoring zero and negative placeholders.
    pub fn effective_custom_duration(&self) -> Option<f64> {
        self.custom_duration.filter(|d| *d > 0.0)
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

/// An audio track mixed over the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub id: String,

    pub path: PathBuf,

    #[serde(default)]
    pub filename: String,

    /// Gain in percent (0-100).
    #[serde(default = "default_track_volume")]
    pub volume: u8,

    /// Free-form label shown in the editor.
    #[serde(default)]
    pub role: String,
}

fn default_track_volume() -> u8 {
    DEFAULT_TRACK_VOLUME
}

impl AudioTrack {
    /// Linear gain in `[0.0, 1.0]`.
    pub fn gain(&self) -> f64 {
        percent_to_gain(self.volume)
    }
}

/// What an uploaded file became.
#[derive(Debug, Clone, PartialEq)]
pub enum Upload {
    Media(MediaItem),
    Audio(AudioTrack),
}

/// Partial update of a media item. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaUpdate {
    pub trim_start: Option<f64>,
    pub trim_end: Option<Option<f64>>,
    pub caption: Option<String>,
    pub position: Option<i64>,
    pub custom_duration: Option<Option<f64>>,
}

/// Classification of an uploaded file by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Audio,
    Media(MediaKind),
}

/// Classify a file by its extension (case-insensitive).
///
/// Anything that is neither a known audio nor a known video container is
/// treated as a still image.
pub fn classify_upload(path: &Path) -> UploadKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        UploadKind::Audio
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        UploadKind::Media(MediaKind::Video)
    } else {
        UploadKind::Media(MediaKind::Image)
    }
}

/// Map a 0-100 percentage to a linear gain.
pub fn percent_to_gain(percent: u8) -> f64 {
    f64::from(percent.min(100)) / 100.0
}

impl Project {
    /// Create an empty draft project.
    pub fn new(category: Category, audio_vibe: AudioVibe, target_duration: f64) -> Self {
        Self {
            id: short_id(),
            category,
            audio_vibe,
            target_duration,
            media: vec![],
            audio_tracks: vec![],
            video_volume: default_video_volume(),
            status: ProjectStatus::Draft,
            created_at: chrono::Utc::now().to_rfc3339(),
            output: None,
        }
    }

    /// Register a file that has already been written to `path`.
    ///
    /// Audio files become tracks at the default volume; everything else is
    /// appended to the end of the timeline.
    pub fn add_upload(&mut self, path: impl Into<PathBuf>, filename: impl Into<String>) -> Upload {
        let path = path.into();
        let filename = filename.into();
        match classify_upload(&path) {
            UploadKind::Audio => {
                let track = AudioTrack {
                    id: short_id(),
                    path,
                    filename,
                    volume: DEFAULT_TRACK_VOLUME,
                    role: format!("Audio {}", self.audio_tracks.len() + 1),
                };
                self.audio_tracks.push(track.clone());
                Upload::Audio(track)
            }
            UploadKind::Media(kind) => {
                let item = MediaItem {
                    id: short_id(),
                    kind,
                    path,
                    filename,
                    position: self.media.len() as i64,
                    trim_start: 0.0,
                    trim_end: None,
                    custom_duration: None,
                    caption: String::new(),
                };
                self.media.push(item.clone());
                Upload::Media(item)
            }
        }
    }

    pub fn media_item(&self, id: &str) -> Option<&MediaItem> {
        self.media.iter().find(|m| m.id == id)
    }

    pub fn media_item_mut(&mut self, id: &str) -> Option<&mut MediaItem> {
        self.media.iter_mut().find(|m| m.id == id)
    }

    /// Remove a media item. Returns whether anything was removed.
    pub fn remove_media(&mut self, id: &str) -> bool {
        let before = self.media.len();
        self.media.retain(|m| m.id != id);
        self.media.len() != before
    }

    /// Apply a partial update to a media item.
    pub fn update_media(&mut self, id: &str, update: MediaUpdate) -> Result<&MediaItem, ProjectError> {
        let item = self
            .media
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| ProjectError::MediaNotFound { id: id.to_string() })?;

        if let Some(trim_start) = update.trim_start {
            item.trim_start = trim_start.max(0.0);
        }
        if let Some(trim_end) = update.trim_end {
            item.trim_end = trim_end;
        }
        if let Some(caption) = update.caption {
            item.caption = caption;
        }
        if let Some(position) = update.position {
            item.position = position;
        }
        if let Some(custom_duration) = update.custom_duration {
            item.custom_duration = custom_duration;
        }
        Ok(item)
    }

    /// Assign positions from an explicit id order and re-sort the timeline.
    ///
    /// Ids not present in `order` keep their current position.
    pub fn reorder(&mut self, order: &[String]) {
        for item in &mut self.media {
            if let Some(idx) = order.iter().position(|id| *id == item.id) {
                item.position = idx as i64;
            }
        }
        self.media.sort_by_key(|m| m.position);
    }

    /// Media items in timeline order. Ties keep insertion order.
    pub fn ordered_media(&self) -> Vec<MediaItem> {
        let mut items = self.media.clone();
        items.sort_by_key(|m| m.position);
        items
    }

    pub fn audio_track_mut(&mut self, id: &str) -> Option<&mut AudioTrack> {
        self.audio_tracks.iter_mut().find(|t| t.id == id)
    }

    /// Update a track's volume and/or role.
    pub fn update_audio_track(
        &mut self,
        id: &str,
        volume: Option<u8>,
        role: Option<String>,
    ) -> Result<&AudioTrack, ProjectError> {
        let track = self
            .audio_tracks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ProjectError::AudioTrackNotFound { id: id.to_string() })?;
        if let Some(volume) = volume {
            track.volume = volume.min(100);
        }
        if let Some(role) = role {
            track.role = role;
        }
        Ok(track)
    }

    pub fn remove_audio_track(&mut self, id: &str) -> bool {
        let before = self.audio_tracks.len();
        self.audio_tracks.retain(|t| t.id != id);
        self.audio_tracks.len() != before
    }

    /// Most recently added audio track.
    pub fn latest_audio_track(&self) -> Option<&AudioTrack> {
        self.audio_tracks.last()
    }

    pub fn set_video_volume(&mut self, percent: u8) {
        self.video_volume = percent.min(100);
    }

    /// Gain applied to the clips' own audio.
    pub fn video_gain(&self) -> f64 {
        percent_to_gain(self.video_volume)
    }

    /// Load a project snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ProjectError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let project: Project =
            serde_json::from_str(&json).map_err(|e| ProjectError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        project.validate()?;
        Ok(project)
    }

    /// Write the project snapshot as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ProjectError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ProjectError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ProjectError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Structural checks that hold for any stored project.
    pub fn validate(&self) -> Result<(), ProjectError> {
        if self.id.trim().is_empty() {
            return Err(ProjectError::ValidationError {
                message: "project id is empty".to_string(),
            });
        }
        if !(self.target_duration.is_finite() && self.target_duration > 0.0) {
            return Err(ProjectError::ValidationError {
                message: format!(
                    "target duration must be positive, got {}",
                    self.target_duration
                ),
            });
        }
        for item in &self.media {
            if let Some(end) = item.trim_end {
                if end <= item.trim_start {
                    return Err(ProjectError::ValidationError {
                        message: format!(
                            "media {} trim end {end} is not after trim start {}",
                            item.id, item.trim_start
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Report referenced files that are missing on disk.
    pub fn validate_sources(&self) -> Vec<String> {
        let mut errors = vec![];
        for item in &self.media {
            if !item.path.exists() {
                errors.push(format!(
                    "Media {} source missing: {}",
                    item.id,
                    item.path.display()
                ));
            }
        }
        for track in &self.audio_tracks {
            if !track.path.exists() {
                errors.push(format!(
                    "Audio track {} source missing: {}",
                    track.id,
                    track.path.display()
                ));
            }
        }
        errors
    }
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },

    #[error("Project not found: {id}")]
    NotFound { id: String },

    #[error("Media item not found: {id}")]
    MediaNotFound { id: String },

    #[error("Audio track not found: {id}")]
    AudioTrackNotFound { id: String },

    #[error("Generation already in progress for project {id}")]
    GenerationInProgress { id: String },
}

impl From<ProjectError> for vibe_common::VibeError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound { id } => Self::ProjectNotFound { id },
            ProjectError::GenerationInProgress { id } => Self::GenerationInProgress { id },
            ProjectError::IoError { source, .. } => Self::Io(source),
            other => Self::project(other.to_string()),
        }
    }
}

/// First eight hex digits of a random UUID.
pub fn short_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

//! Video categories and audio vibes.
//!
//! A category picks the colour grade applied to every segment of a project.
//! Audio vibes are presentation hints only and never reach the encoder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Video category. Unknown names deserialize as [`Category::Motivational`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Category {
    #[default]
    Motivational,
    Travel,
    Food,
    Fitness,
    Corporate,
    Celebration,
    Religious,
    Chill,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Motivational,
        Category::Travel,
        Category::Food,
        Category::Fitness,
        Category::Corporate,
        Category::Celebration,
        Category::Religious,
        Category::Chill,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Motivational => "motivational",
            Category::Travel => "travel",
            Category::Food => "food",
            Category::Fitness => "fitness",
            Category::Corporate => "corporate",
            Category::Celebration => "celebration",
            Category::Religious => "religious",
            Category::Chill => "chill",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Motivational => "Motivational",
            Category::Travel => "Travel",
            Category::Food => "Food",
            Category::Fitness => "Fitness",
            Category::Corporate => "Corporate",
            Category::Celebration => "Celebration",
            Category::Religious => "Religious",
            Category::Chill => "Chill",
        }
    }

    /// Colour grade applied to every segment of this category.
    pub fn color_grade(self) -> ColorGrade {
        let grade = ColorGrade::default();
        match self {
            Category::Motivational => grade.brightness(0.06).saturation(1.3),
            Category::Travel => grade.brightness(0.04).saturation(1.5),
            Category::Food => grade.brightness(0.05).saturation(1.4),
            Category::Fitness => grade.contrast(1.2).saturation(1.2),
            Category::Corporate => grade.brightness(0.02).saturation(0.9),
            Category::Celebration => grade.brightness(0.08).saturation(1.6),
            Category::Religious => grade.brightness(0.03).saturation(0.85).gamma(1.05),
            Category::Chill => grade.brightness(0.02).saturation(0.8),
        }
    }

    /// Lenient lookup used by front ends: unknown names map to the default.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::from_name_or_default(&name)
    }
}

/// `eq` colour adjustment. Unset components keep the encoder's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorGrade {
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
    pub saturation: Option<f64>,
    pub gamma: Option<f64>,
}

impl ColorGrade {
    pub fn brightness(mut self, value: f64) -> Self {
        self.brightness = Some(value);
        self
    }

    pub fn contrast(mut self, value: f64) -> Self {
        self.contrast = Some(value);
        self
    }

    pub fn saturation(mut self, value: f64) -> Self {
        self.saturation = Some(value);
        self
    }

    pub fn gamma(mut self, value: f64) -> Self {
        self.gamma = Some(value);
        self
    }

    pub fn is_identity(&self) -> bool {
        self.brightness.is_none()
            && self.contrast.is_none()
            && self.saturation.is_none()
            && self.gamma.is_none()
    }
}

/// Music mood chosen for a project. Unknown names deserialize as
/// [`AudioVibe::Energetic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AudioVibe {
    #[default]
    Energetic,
    Chill,
    Cinematic,
    Romantic,
    Religious,
    Corporate,
    Travel,
    Custom,
}

impl AudioVibe {
    pub const ALL: [AudioVibe; 8] = [
        AudioVibe::Energetic,
        AudioVibe::Chill,
        AudioVibe::Cinematic,
        AudioVibe::Romantic,
        AudioVibe::Religious,
        AudioVibe::Corporate,
        AudioVibe::Travel,
        AudioVibe::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AudioVibe::Energetic => "energetic",
            AudioVibe::Chill => "chill",
            AudioVibe::Cinematic => "cinematic",
            AudioVibe::Romantic => "romantic",
            AudioVibe::Religious => "religious",
            AudioVibe::Corporate => "corporate",
            AudioVibe::Travel => "travel",
            AudioVibe::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AudioVibe::Energetic => "Energetic",
            AudioVibe::Chill => "Chill",
            AudioVibe::Cinematic => "Cinematic",
            AudioVibe::Romantic => "Romantic",
            AudioVibe::Religious => "Religious",
            AudioVibe::Corporate => "Corporate",
            AudioVibe::Travel => "Travel",
            AudioVibe::Custom => "Custom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AudioVibe::Energetic => "Upbeat, fast-paced",
            AudioVibe::Chill => "Lo-fi / ambient",
            AudioVibe::Cinematic => "Epic orchestral",
            AudioVibe::Romantic => "Soft, emotional",
            AudioVibe::Religious => "Nasheeds, spiritual, devotional",
            AudioVibe::Corporate => "Professional background",
            AudioVibe::Travel => "World music, adventurous",
            AudioVibe::Custom => "Upload your own audio",
        }
    }
}

impl fmt::Display for AudioVibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioVibe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AudioVibe::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| format!("unknown audio vibe: {s}"))
    }
}

impl From<String> for AudioVibe {
    fn from(name: String) -> Self {
        name.parse().unwrap_or_default()
    }
}

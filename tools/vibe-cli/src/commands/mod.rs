pub mod add;
pub mod categories;
pub mod check;
pub mod generate;
pub mod info;
pub mod init;
pub mod remove;
pub mod reorder;
pub mod set;
pub mod trim;

use std::path::Path;

use vibe_project_model::category::{AudioVibe, Category};
use vibe_project_model::project::Project;

pub(crate) fn load_project(path: &Path) -> anyhow::Result<Project> {
    Project::load(path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))
}

pub(crate) fn save_project(project: &Project, path: &Path) -> anyhow::Result<()> {
    project
        .save(path)
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))
}

/// Unknown names fall back to the default category.
pub(crate) fn parse_category(name: &str) -> Category {
    name.parse().unwrap_or_else(|e: String| {
        tracing::warn!("{e}, using {}", Category::default());
        Category::default()
    })
}

pub(crate) fn parse_vibe(name: &str) -> AudioVibe {
    name.parse().unwrap_or_else(|e: String| {
        tracing::warn!("{e}, using {}", AudioVibe::default());
        AudioVibe::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_names_fall_back_to_defaults() {
        assert_eq!(parse_category("TRAVEL"), Category::Travel);
        assert_eq!(parse_category("underwater"), Category::Motivational);
        assert_eq!(parse_vibe("cinematic"), AudioVibe::Cinematic);
        assert_eq!(parse_vibe("polka"), AudioVibe::Energetic);
    }

    #[test]
    fn test_project_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        let project = Project::new(Category::Food, AudioVibe::Chill, 12.0);

        save_project(&project, &path).unwrap();
        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.id, project.id);
        assert!(load_project(&dir.path().join("missing.json")).is_err());
    }
}

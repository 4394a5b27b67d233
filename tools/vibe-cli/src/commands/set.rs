//! Edit project, media item and audio track settings.

use vibe_project_model::project::MediaUpdate;

use super::{load_project, parse_category, parse_vibe, save_project};
use crate::SetArgs;

pub fn run(args: SetArgs) -> anyhow::Result<()> {
    let mut project = load_project(&args.project)?;
    let mut changed = false;

    if let Some(category) = &args.category {
        project.category = parse_category(category);
        println!("Category: {}", project.category.label());
        changed = true;
    }
    if let Some(vibe) = &args.vibe {
        project.audio_vibe = parse_vibe(vibe);
        println!("Vibe: {}", project.audio_vibe.label());
        changed = true;
    }
    if let Some(target) = args.target {
        if target <= 0.0 {
            anyhow::bail!("Target duration must be positive, got {target}");
        }
        project.target_duration = target;
        println!("Target duration: {target}s");
        changed = true;
    }
    if let Some(volume) = args.video_volume {
        project.set_video_volume(volume);
        println!("Clip audio: {volume}%");
        changed = true;
    }

    if let Some(media_id) = &args.media {
        let update = MediaUpdate {
            trim_start: args.trim_start,
            trim_end: if args.clear_trim_end {
                Some(None)
            } else {
                args.trim_end.map(Some)
            },
            caption: args.caption.clone(),
            position: args.position,
            custom_duration: if args.clear_duration {
                Some(None)
            } else {
                args.duration.map(Some)
            },
        };
        let item = project.update_media(media_id, update)?;
        println!(
            "Media {}: trim {}s..{}, duration {}, position {}",
            item.id,
            item.trim_start,
            item.trim_end.map(|e| format!("{e}s")).unwrap_or_else(|| "end".to_string()),
            item.custom_duration
                .map(|d| format!("{d}s"))
                .unwrap_or_else(|| "auto".to_string()),
            item.position
        );
        changed = true;
    }

    if let Some(track_id) = &args.track {
        let track = project.update_audio_track(track_id, args.volume, args.role.clone())?;
        println!("Track {}: {} at {}%", track.id, track.role, track.volume);
        changed = true;
    }

    if !changed {
        anyhow::bail!("Nothing to change; see `vibe set --help`");
    }

    // Reject edits that would leave an unloadable project.
    project.validate()?;
    save_project(&project, &args.project)
}

//! Segment durations and per-stage timeouts.

use std::time::Duration;

use vibe_project_model::project::MediaItem;

/// Shortest automatically assigned segment, in seconds.
pub const MIN_AUTO_SEGMENT_SECS: f64 = 2.0;

const MIN_SEGMENT_TIMEOUT_SECS: u64 = 90;
const SEGMENT_TIMEOUT_PER_OUTPUT_SEC: f64 = 4.0;
const MIN_CONCAT_TIMEOUT_SECS: u64 = 180;
const CONCAT_TIMEOUT_PER_OUTPUT_SEC: f64 = 3.0;

/// Audio-only re-concatenation of clip audio.
pub const CLIP_AUDIO_TIMEOUT: Duration = Duration::from_secs(60);

/// Single-source fallback mux and clip trimming.
pub const DEFAULT_ENCODE_TIMEOUT: Duration = Duration::from_secs(120);

/// Length given to every item without a custom duration.
///
/// The time left after custom durations is split evenly across the
/// remaining items. When nothing is left (or every item is custom), the
/// whole target is split across all items instead. Either way the result
/// is never below [`MIN_AUTO_SEGMENT_SECS`]; overshoot is truncated later
/// by the mux step.
pub fn auto_segment_duration(items: &[MediaItem], target_secs: f64) -> f64 {
    if items.is_empty() {
        return MIN_AUTO_SEGMENT_SECS.max(target_secs);
    }

    let custom_total: f64 = items
        .iter()
        .filter_map(MediaItem::effective_custom_duration)
        .sum();
    let auto_count = items
        .iter()
        .filter(|m| m.effective_custom_duration().is_none())
        .count();

    let even_split = target_secs / items.len() as f64;
    let auto = if auto_count > 0 && custom_total < target_secs {
        (target_secs - custom_total) / auto_count as f64
    } else {
        even_split
    };
    auto.max(MIN_AUTO_SEGMENT_SECS)
}

/// Display length of every item, in timeline order.
pub fn plan_durations(items: &[MediaItem], target_secs: f64) -> Vec<f64> {
    let auto = auto_segment_duration(items, target_secs);
    items
        .iter()
        .map(|m| m.effective_custom_duration().unwrap_or(auto))
        .collect()
}

/// Timeout for one segment encode, scaled with the output length.
pub fn segment_timeout(target_secs: f64) -> Duration {
    scaled_timeout(
        target_secs,
        SEGMENT_TIMEOUT_PER_OUTPUT_SEC,
        MIN_SEGMENT_TIMEOUT_SECS,
    )
}

/// Timeout for concatenation and for the full audio mix.
pub fn concat_timeout(target_secs: f64) -> Duration {
    scaled_timeout(
        target_secs,
        CONCAT_TIMEOUT_PER_OUTPUT_SEC,
        MIN_CONCAT_TIMEOUT_SECS,
    )
}

fn scaled_timeout(target_secs: f64, per_sec: f64, floor_secs: u64) -> Duration {
    let scaled = (target_secs.max(0.0) * per_sec).floor() as u64;
    Duration::from_secs(scaled.max(floor_secs))
}

/// Seconds formatted for encoder arguments (`10`, `2.5`).
pub fn format_secs(secs: f64) -> String {
    let rounded = (secs * 1000.0).round() / 1000.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use vibe_project_model::project::MediaKind;

    fn item(custom: Option<f64>) -> MediaItem {
        MediaItem {
            id: "m".to_string(),
            kind: MediaKind::Image,
            path: PathBuf::from("/x.jpg"),
            filename: String::new(),
            position: 0,
            trim_start: 0.0,
            trim_end: None,
            custom_duration: custom,
            caption: String::new(),
        }
    }

    #[test]
    fn test_three_images_split_thirty_seconds() {
        let items = vec![item(None), item(None), item(None)];
        assert_eq!(plan_durations(&items, 30.0), vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_custom_durations_are_kept_even_past_target() {
        let items = vec![item(Some(5.0)), item(Some(8.0))];
        assert_eq!(plan_durations(&items, 10.0), vec![5.0, 8.0]);
    }

    #[test]
    fn test_remaining_time_goes_to_auto_items() {
        let items = vec![item(Some(10.0)), item(None), item(None)];
        assert_eq!(plan_durations(&items, 30.0), vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_exhausted_target_falls_back_to_even_split() {
        let items = vec![item(Some(20.0)), item(Some(15.0)), item(None), item(None)];
        // 35s of custom time already exceeds 30s; auto = 30 / 4.
        assert_eq!(auto_segment_duration(&items, 30.0), 7.5);
    }

    #[test]
    fn test_auto_duration_has_two_second_floor() {
        let items: Vec<_> = (0..20).map(|_| item(None)).collect();
        assert_eq!(auto_segment_duration(&items, 10.0), 2.0);
    }

    #[test]
    fn test_timeouts_scale_with_target() {
        assert_eq!(segment_timeout(10.0), Duration::from_secs(90));
        assert_eq!(segment_timeout(60.0), Duration::from_secs(240));
        assert_eq!(concat_timeout(30.0), Duration::from_secs(180));
        assert_eq!(concat_timeout(100.0), Duration::from_secs(300));
    }

    #[test]
    fn test_format_secs() {
        assert_eq!(format_secs(10.0), "10");
        assert_eq!(format_secs(2.5), "2.5");
        assert_eq!(format_secs(7.123456), "7.123");
    }
}

//! Progress bar presentation
//!
//! Pure helpers for the time readout and click-to-seek. No state.

/// Format seconds as `M:SS`
///
/// Minutes are unbounded and seconds are truncated, never rounded:
/// `125.0 -> "2:05"`, `59.9 -> "0:59"`. Negative or non-finite input
/// renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Map a click position on the bar to a seek target
///
/// `fraction` is the horizontal offset within the bar in `[0, 1]`; values
/// outside are clamped. Returns `None` (leave the position alone) while the
/// duration is unknown or a playback error is active.
pub fn map_click_to_seek_time(fraction: f64, duration_seconds: f64, playback_error: bool) -> Option<f64> {
    if playback_error || !duration_seconds.is_finite() || duration_seconds <= 0.0 || fraction.is_nan() {
        return None;
    }
    Some((fraction * duration_seconds).clamp(0.0, duration_seconds))
}

/// Fill ratio of the bar, in `[0, 1]`
pub fn progress_ratio(progress_seconds: f64, duration_seconds: f64) -> f64 {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 || !progress_seconds.is_finite() {
        return 0.0;
    }
    (progress_seconds / duration_seconds).clamp(0.0, 1.0)
}

/// Convert a pixel offset inside the bar to a fraction of its width
pub fn click_fraction(offset_x: f64, width: f64) -> f64 {
    if width <= 0.0 || !width.is_finite() || !offset_x.is_finite() {
        return 0.0;
    }
    (offset_x / width).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(125.0), "2:05");
        assert_eq!(format_time(3599.0), "59:59");
    }

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(119.999), "1:59");
    }

    #[test]
    fn minutes_are_unbounded() {
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(7325.0), "122:05");
    }

    #[test]
    fn bad_input_formats_as_zero() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn click_maps_across_the_bar() {
        assert_eq!(map_click_to_seek_time(0.0, 100.0, false), Some(0.0));
        assert_eq!(map_click_to_seek_time(1.0, 100.0, false), Some(100.0));
        assert_eq!(map_click_to_seek_time(0.25, 200.0, false), Some(50.0));
    }

    #[test]
    fn click_clamps_outside_the_bar() {
        assert_eq!(map_click_to_seek_time(1.4, 100.0, false), Some(100.0));
        assert_eq!(map_click_to_seek_time(-0.2, 100.0, false), Some(0.0));
    }

    #[test]
    fn click_rejected_without_duration_or_with_error() {
        assert_eq!(map_click_to_seek_time(0.5, 0.0, false), None);
        assert_eq!(map_click_to_seek_time(0.5, f64::NAN, false), None);
        assert_eq!(map_click_to_seek_time(0.5, 100.0, true), None);
    }

    #[test]
    fn ratio_is_bounded() {
        assert_eq!(progress_ratio(30.0, 120.0), 0.25);
        assert_eq!(progress_ratio(500.0, 120.0), 1.0);
        assert_eq!(progress_ratio(10.0, 0.0), 0.0);
    }

    #[test]
    fn pixel_offsets_become_fractions() {
        assert_eq!(click_fraction(50.0, 200.0), 0.25);
        assert_eq!(click_fraction(250.0, 200.0), 1.0);
        assert_eq!(click_fraction(10.0, 0.0), 0.0);
    }
}

//! Scroll position → frame index.
//!
//! The animation section is a tall block; while the viewport's top edge is
//! inside it, the distance scrolled into the section divided by the
//! scrollable distance (`section.height - window_height`) is the playback
//! progress in [0, 1].

use crate::geometry::SectionBox;

/// Progress through the animation section, or `None` when `scroll_y` lies
/// outside `[section.top, section.top + section.height]`.
///
/// A section no taller than the viewport has no scrollable distance; its
/// progress is `1.0` once scrolled past its top and `0.0` at the top itself.
pub fn scroll_progress(scroll_y: f64, section: SectionBox, window_height: f64) -> Option<f64> {
    if !scroll_y.is_finite() || !section.top.is_finite() || !section.height.is_finite() {
        return None;
    }
    if scroll_y < section.top || scroll_y > section.top + section.height {
        return None;
    }
    let into = scroll_y - section.top;
    let distance = section.height - window_height;
    if !(distance > 0.0) {
        return Some(if into > 0.0 { 1.0 } else { 0.0 });
    }
    Some((into / distance).clamp(0.0, 1.0))
}

/// Frame index for a progress value: `min(total - 1, floor(progress * total))`.
pub fn target_frame(progress: f64, total_frames: usize) -> usize {
    if total_frames == 0 {
        return 0;
    }
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    ((p * total_frames as f64).floor() as usize).min(total_frames - 1)
}

/// Convenience: both steps at once.
pub fn frame_for_scroll(
    scroll_y: f64,
    section: SectionBox,
    window_height: f64,
    total_frames: usize,
) -> Option<usize> {
    scroll_progress(scroll_y, section, window_height).map(|p| target_frame(p, total_frames))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION: SectionBox = SectionBox {
        top: 1000.0,
        height: 4000.0,
    };

    #[test]
    fn outside_section_is_none() {
        assert_eq!(scroll_progress(999.0, SECTION, 800.0), None);
        assert_eq!(scroll_progress(5000.5, SECTION, 800.0), None);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(scroll_progress(1000.0, SECTION, 800.0), Some(0.0));
        assert_eq!(scroll_progress(5000.0, SECTION, 800.0), Some(1.0));
    }

    #[test]
    fn midpoint() {
        // scrollable distance is 3200
        assert_eq!(scroll_progress(2600.0, SECTION, 800.0), Some(0.5));
        assert_eq!(frame_for_scroll(2600.0, SECTION, 800.0, 384), Some(192));
    }

    #[test]
    fn zero_distance_is_deterministic() {
        let flat = SectionBox {
            top: 0.0,
            height: 800.0,
        };
        assert_eq!(scroll_progress(0.0, flat, 800.0), Some(0.0));
        assert_eq!(scroll_progress(10.0, flat, 800.0), Some(1.0));
        // shorter than the viewport behaves the same way
        assert_eq!(scroll_progress(10.0, flat, 1200.0), Some(1.0));
    }

    #[test]
    fn last_frame_is_clamped() {
        assert_eq!(target_frame(1.0, 384), 383);
        assert_eq!(target_frame(0.0, 384), 0);
        assert_eq!(target_frame(f64::NAN, 384), 0);
        assert_eq!(target_frame(0.5, 0), 0);
    }
}

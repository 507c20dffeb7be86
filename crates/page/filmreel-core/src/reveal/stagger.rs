//! Staggered release of a fixed number of markers.

use std::ops::Range;

/// Marker `i` becomes due at `start_ms + i * step_ms` and is released once.
#[derive(Clone, Debug, PartialEq)]
pub struct StaggerSchedule {
    start_ms: f64,
    step_ms: f64,
    count: usize,
    released: usize,
}

impl StaggerSchedule {
    pub fn new(start_ms: f64, count: usize, step_ms: f64) -> Self {
        Self {
            start_ms,
            step_ms: step_ms.max(0.0),
            count,
            released: 0,
        }
    }

    /// Markers that became due since the previous call.
    pub fn due(&mut self, now_ms: f64) -> Range<usize> {
        let elapsed = now_ms - self.start_ms;
        let reached = if !(elapsed >= 0.0) {
            0
        } else if self.step_ms == 0.0 {
            self.count
        } else {
            ((elapsed / self.step_ms).floor() as usize)
                .saturating_add(1)
                .min(self.count)
        };
        let from = self.released;
        self.released = self.released.max(reached);
        from..self.released
    }

    /// When marker `i` is released.
    pub fn release_time(&self, i: usize) -> f64 {
        self.start_ms + i as f64 * self.step_ms
    }

    pub fn is_finished(&self) -> bool {
        self.released >= self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_in_steps() {
        let mut s = StaggerSchedule::new(1000.0, 4, 200.0);
        assert_eq!(s.due(999.0), 0..0);
        assert_eq!(s.due(1000.0), 0..1);
        assert_eq!(s.due(1199.9), 1..1);
        assert_eq!(s.due(1450.0), 1..3);
        assert!(!s.is_finished());
        assert_eq!(s.due(9000.0), 3..4);
        assert!(s.is_finished());
        assert_eq!(s.due(9999.0), 4..4);
    }

    #[test]
    fn empty_schedule_is_finished() {
        let mut s = StaggerSchedule::new(0.0, 0, 200.0);
        assert!(s.is_finished());
        assert_eq!(s.due(100.0), 0..0);
    }

    #[test]
    fn zero_step_releases_everything() {
        let mut s = StaggerSchedule::new(0.0, 3, 0.0);
        assert_eq!(s.due(0.0), 0..3);
    }
}

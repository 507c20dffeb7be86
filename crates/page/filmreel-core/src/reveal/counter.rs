//! Count-up tween for numeric stats.

/// Counts from 0 to `target` in fixed increments, one per animation frame.
///
/// The increment is sized so a nominal `tick_ms` frame rate finishes in
/// `duration_ms`; slower hosts simply take longer.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterTween {
    target: u32,
    increment: f64,
    current: f64,
    suffix: String,
    display: Option<String>,
    done: bool,
}

impl CounterTween {
    pub fn new(target: u32, duration_ms: f64, tick_ms: f64, suffix: &str) -> Self {
        let steps = (duration_ms / tick_ms).max(1.0);
        Self {
            target,
            increment: target as f64 / steps,
            current: 0.0,
            suffix: suffix.to_string(),
            display: None,
            done: false,
        }
    }

    /// Advance one frame. Returns the new text only when it changed.
    pub fn step(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        self.current += self.increment;
        let text = if self.current < self.target as f64 {
            format!("{}{}", self.current.ceil() as u64, self.suffix)
        } else {
            self.done = true;
            format!("{}{}", self.target, self.suffix)
        };
        if self.display.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.display = Some(text.clone());
        Some(text)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn target(&self) -> u32 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_target_finishes_immediately() {
        let mut c = CounterTween::new(0, 2000.0, 16.0, "+");
        assert_eq!(c.step().as_deref(), Some("0+"));
        assert!(c.is_done());
        assert_eq!(c.step(), None);
    }

    #[test]
    fn large_target_takes_nominal_steps() {
        let mut c = CounterTween::new(1250, 2000.0, 16.0, "+");
        let mut frames = 0;
        while !c.is_done() {
            c.step();
            frames += 1;
            assert!(frames <= 130);
        }
        assert!(frames >= 125);
        assert_eq!(c.display(), Some("1250+"));
    }
}

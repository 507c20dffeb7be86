//! Hero parallax.
//!
//! While the hero is still on screen (`scroll_y < window_height`) each
//! background layer moves at its own speed, and the hero text moves at a
//! fixed speed while fading out linearly. Past the hero nothing is computed.

use serde::{Deserialize, Serialize};

use crate::config::ParallaxCfg;

/// Styles for one scroll position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxFrame {
    /// Vertical translation per layer, in layer order.
    pub layer_offsets: Vec<f32>,
    pub text_offset: f32,
    pub text_opacity: f32,
}

/// Read a layer speed attribute. Empty or unparseable values yield `None`.
pub fn parse_speed(raw: Option<&str>) -> Option<f32> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|v| v.is_finite())
}

/// Whether the hero is still on screen. Hosts check this before reading any
/// layer from the page.
#[inline]
pub fn hero_in_view(scroll_y: f64, window_height: f64) -> bool {
    window_height > 0.0 && scroll_y < window_height
}

#[derive(Clone, Debug)]
pub struct Parallax {
    cfg: ParallaxCfg,
}

impl Parallax {
    pub fn new(cfg: &ParallaxCfg) -> Self {
        Self { cfg: *cfg }
    }

    /// Compute layer and text styles, or `None` once scrolled past the hero.
    pub fn step(
        &self,
        scroll_y: f32,
        window_height: f32,
        layer_speeds: &[Option<f32>],
    ) -> Option<ParallaxFrame> {
        if !hero_in_view(scroll_y as f64, window_height as f64) {
            return None;
        }
        let layer_offsets = layer_speeds
            .iter()
            .map(|speed| scroll_y * speed.unwrap_or(self.cfg.default_layer_speed))
            .collect();
        Some(ParallaxFrame {
            layer_offsets,
            text_offset: scroll_y * self.cfg.text_speed,
            text_opacity: 1.0 - scroll_y / window_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speeds_fall_back_to_default() {
        let p = Parallax::new(&ParallaxCfg::default());
        let f = p.step(100.0, 800.0, &[Some(0.2), None]).unwrap();
        assert_eq!(f.layer_offsets, vec![20.0, 50.0]);
        assert_eq!(f.text_offset, 40.0);
        assert_eq!(f.text_opacity, 0.875);
    }

    #[test]
    fn no_work_past_hero() {
        let p = Parallax::new(&ParallaxCfg::default());
        assert!(p.step(800.0, 800.0, &[Some(1.0)]).is_none());
        assert!(p.step(5.0, 0.0, &[]).is_none());
    }

    #[test]
    fn hero_visibility_bounds() {
        assert!(hero_in_view(0.0, 800.0));
        assert!(hero_in_view(799.5, 800.0));
        assert!(!hero_in_view(800.0, 800.0));
        assert!(!hero_in_view(5000.0, 800.0));
        assert!(!hero_in_view(0.0, 0.0));
        assert!(!hero_in_view(f64::NAN, 800.0));
    }

    #[test]
    fn parse_speed_cases() {
        assert_eq!(parse_speed(Some("0.3")), Some(0.3));
        assert_eq!(parse_speed(Some(" 0 ")), Some(0.0));
        assert_eq!(parse_speed(Some("")), None);
        assert_eq!(parse_speed(Some("fast")), None);
        assert_eq!(parse_speed(Some("NaN")), None);
        assert_eq!(parse_speed(None), None);
    }
}

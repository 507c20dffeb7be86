//! Page configuration for filmreel-core.
//!
//! Every field has a default matching the portfolio page the effects were
//! built for, so hosts usually pass `{}` or only the fields they override.

use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::frames::SequenceCfg;

/// Top-level configuration for a [`crate::PageController`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Image sequences, drawn back to back in declaration order.
    pub sequences: Vec<SequenceCfg>,
    /// Height forced onto the animation section so scroll distance maps to progress.
    pub animation_scroll_height_px: f32,
    pub render: RenderCfg,
    pub parallax: ParallaxCfg,
    pub reveal: RevealCfg,
    pub selectors: Selectors,
    /// Maximum `log` level installed by adapters ("error" .. "trace").
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sequences: vec![
                SequenceCfg::new("1", "resource/1/frame_{index}.webp", 192),
                SequenceCfg::new("2", "resource/2/frame_{index}.webp", 192),
            ],
            animation_scroll_height_px: 4000.0,
            render: RenderCfg::default(),
            parallax: ParallaxCfg::default(),
            reveal: RevealCfg::default(),
            selectors: Selectors::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, PageError> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Total number of frames across all sequences.
    pub fn total_frames(&self) -> usize {
        self.sequences.iter().map(|s| s.count).sum()
    }

    pub fn validate(&self) -> Result<(), PageError> {
        if self.sequences.is_empty() {
            return Err(PageError::invalid_config("at least one sequence is required"));
        }
        if let Some(seq) = self.sequences.iter().find(|s| s.count == 0) {
            return Err(PageError::invalid_config(format!(
                "sequence '{}' has no frames",
                seq.name
            )));
        }
        if !(self.animation_scroll_height_px > 0.0) {
            return Err(PageError::invalid_config(
                "animation_scroll_height_px must be positive",
            ));
        }
        let t = self.reveal.threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(PageError::invalid_config(format!(
                "reveal threshold {t} outside (0, 1]"
            )));
        }
        if !(self.reveal.counter_tick_ms > 0.0) || !(self.reveal.counter_duration_ms > 0.0) {
            return Err(PageError::invalid_config(
                "counter duration and tick must be positive",
            ));
        }
        Ok(())
    }
}

/// Colours and blend modes used when painting a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderCfg {
    pub letterbox_color: String,
    pub tint_color: String,
    pub tint_blend: String,
    pub restore_blend: String,
}

impl Default for RenderCfg {
    fn default() -> Self {
        Self {
            letterbox_color: "#0f0d0c".to_string(),
            tint_color: "rgba(121, 85, 72, 0.1)".to_string(),
            tint_blend: "overlay".to_string(),
            restore_blend: "source-over".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxCfg {
    /// Used for layers without a usable speed attribute.
    pub default_layer_speed: f32,
    pub text_speed: f32,
}

impl Default for ParallaxCfg {
    fn default() -> Self {
        Self {
            default_layer_speed: 0.5,
            text_speed: 0.4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealCfg {
    /// Visible fraction at which a section counts as intersecting.
    pub threshold: f32,
    pub stagger_step_ms: f64,
    pub counter_duration_ms: f64,
    /// Nominal animation-frame period used to size counter increments.
    pub counter_tick_ms: f64,
    /// Vertical offset of a section before it is revealed.
    pub hidden_offset_px: f32,
    pub transition: String,
    pub visible_class: String,
    pub counter_suffix: String,
    /// Keep observing sections after their first trigger.
    pub rearm_after_trigger: bool,
}

impl Default for RevealCfg {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            stagger_step_ms: 200.0,
            counter_duration_ms: 2000.0,
            counter_tick_ms: 16.0,
            hidden_offset_px: 50.0,
            transition: "opacity 1s ease-out, transform 1s ease-out".to_string(),
            visible_class: "visible".to_string(),
            counter_suffix: "+".to_string(),
            rearm_after_trigger: false,
        }
    }
}

/// DOM identifiers the adapters look up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub hero_id: String,
    pub layer: String,
    pub layer_speed_attr: String,
    pub hero_text: String,
    pub canvas_id: String,
    pub animation_section: String,
    pub content_section: String,
    pub skills_id: String,
    pub skill_marker: String,
    pub achievements_id: String,
    pub stat_number: String,
    pub stat_count_attr: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            hero_id: "hero".to_string(),
            layer: ".layer".to_string(),
            layer_speed_attr: "data-speed".to_string(),
            hero_text: ".name-part, .subtitle, .role-text".to_string(),
            canvas_id: "parallax-canvas".to_string(),
            animation_section: ".animation-section".to_string(),
            content_section: ".content-section".to_string(),
            skills_id: "skills".to_string(),
            skill_marker: ".skill-marker".to_string(),
            achievements_id: "achievements".to_string(),
            stat_number: ".stat-number".to_string(),
            stat_count_attr: "data-count".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page() {
        let cfg = Config::default();
        assert_eq!(cfg.total_frames(), 384);
        assert_eq!(cfg.animation_scroll_height_px, 4000.0);
        assert_eq!(cfg.reveal.threshold, 0.15);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{ "reveal": { "stagger_step_ms": 100 } }"#).unwrap();
        assert_eq!(cfg.reveal.stagger_step_ms, 100.0);
        assert_eq!(cfg.reveal.counter_duration_ms, 2000.0);
        assert_eq!(cfg.sequences.len(), 2);
    }

    #[test]
    fn rejects_empty_sequence() {
        let err = Config::from_json(
            r#"{ "sequences": [ { "name": "a", "path_template": "a/{index}.webp", "count": 0 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PageError::InvalidConfig { .. }));
    }

    #[test]
    fn rejects_bad_threshold() {
        let mut cfg = Config::default();
        cfg.reveal.threshold = 0.0;
        assert!(cfg.validate().is_err());
        cfg.reveal.threshold = 1.5;
        assert!(cfg.validate().is_err());
    }
}

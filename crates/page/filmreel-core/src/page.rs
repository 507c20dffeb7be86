//! Page controller: the three effects composed behind one update call.
//!
//! Methods:
//! - new, mount (which features exist on this page), update (events → changes), needs_tick
//!
//! Each `update` applies the queued host events in order, then runs a single
//! render step (at most one canvas draw), then advances reveal animations.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::PageError;
use crate::geometry::Size;
use crate::ids::SectionId;
use crate::inputs::{Inputs, PageEvent};
use crate::outputs::{Change, CoreEvent, Outputs};
use crate::parallax::{Parallax, ParallaxFrame};
use crate::player::FramePlayer;
use crate::reveal::{RevealObserver, SectionKind};

/// What the adapter found on the page at startup.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MountInfo {
    /// Canvas backing-store size, `None` if the canvas or its 2D context is missing.
    #[serde(default)]
    pub canvas: Option<Size>,
    #[serde(default)]
    pub animation_section: bool,
    /// Content sections in document order.
    #[serde(default)]
    pub sections: Vec<SectionKind>,
}

#[derive(Debug)]
pub struct PageController {
    cfg: Config,
    parallax: Parallax,
    player: Option<FramePlayer>,
    reveal: RevealObserver,
    canvas: Size,
    settled_reported: bool,

    // Per-tick outputs
    outputs: Outputs,
}

impl PageController {
    pub fn new(cfg: Config) -> Result<Self, PageError> {
        cfg.validate()?;
        Ok(Self {
            parallax: Parallax::new(&cfg.parallax),
            player: None,
            reveal: RevealObserver::new(&cfg.reveal),
            canvas: Size::default(),
            settled_reported: false,
            outputs: Outputs::default(),
            cfg,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Enable the features the page supports and register its sections.
    ///
    /// The frame player only exists when both the canvas (with a 2D
    /// context) and the animation section are present; that is decided
    /// once, here. Returns the ids of `info.sections` in order; the initial
    /// styles are available from [`Self::outputs`].
    pub fn mount(&mut self, info: MountInfo) -> Vec<SectionId> {
        self.outputs.clear();
        self.settled_reported = false;

        self.player = match info.canvas {
            Some(canvas) if info.animation_section => {
                self.canvas = canvas;
                self.outputs.push_change(Change::SectionHeight {
                    height_px: self.cfg.animation_scroll_height_px,
                });
                Some(FramePlayer::new(&self.cfg))
            }
            Some(_) => {
                warn!("animation section missing; frame animation disabled");
                None
            }
            None => {
                warn!("canvas or 2d context missing; frame animation disabled");
                None
            }
        };

        self.reveal = RevealObserver::new(&self.cfg.reveal);
        let ids = info
            .sections
            .into_iter()
            .map(|kind| self.reveal.observe(kind))
            .collect();
        for change in self.reveal.initial_styles() {
            self.outputs.push_change(change);
        }
        ids
    }

    /// Apply host events and produce this tick's changes.
    pub fn update(&mut self, now_ms: f64, inputs: Inputs) -> &Outputs {
        self.outputs.clear();
        let mut parallax: Option<ParallaxFrame> = None;

        for event in inputs.events {
            match event {
                PageEvent::Scroll {
                    scroll_y,
                    window_height,
                    hero,
                    section,
                } => {
                    // Only the latest applicable parallax styles matter within a tick.
                    if let Some(hero) = hero {
                        if let Some(frame) = self.parallax.step(
                            scroll_y as f32,
                            window_height as f32,
                            &hero.layer_speeds,
                        ) {
                            parallax = Some(frame);
                        }
                    }
                    if let (Some(player), Some(section)) = (self.player.as_mut(), section) {
                        let from = player.cursor().as_raw();
                        if let Some(to) =
                            player.compute_target_frame(scroll_y, section, window_height)
                        {
                            self.outputs.push_event(CoreEvent::CursorMoved { from, to });
                        }
                    }
                }
                PageEvent::Resize { canvas } => {
                    if let Some(player) = self.player.as_mut() {
                        self.canvas = canvas;
                        player.on_resize();
                    }
                }
                PageEvent::FrameLoaded {
                    index,
                    width,
                    height,
                } => self.frame_loaded(index, Size::new(width, height)),
                PageEvent::FrameFailed { index } => self.frame_failed(index),
                PageEvent::Intersection {
                    section,
                    intersecting,
                    ratio,
                    viewport_coverage,
                } => {
                    self.reveal.on_intersection(
                        section,
                        intersecting,
                        ratio,
                        viewport_coverage,
                        now_ms,
                        &mut self.outputs.changes,
                    );
                }
            }
        }

        if let Some(frame) = parallax {
            for (layer, translate_y) in frame.layer_offsets.into_iter().enumerate() {
                self.outputs
                    .push_change(Change::LayerTransform { layer, translate_y });
            }
            self.outputs.push_change(Change::HeroText {
                translate_y: frame.text_offset,
                opacity: frame.text_opacity,
            });
        }

        self.render_step();
        self.reveal.tick(now_ms, &mut self.outputs.changes);
        &self.outputs
    }

    /// True while a draw is pending or reveal animations are running.
    pub fn needs_tick(&self) -> bool {
        self.player
            .as_ref()
            .is_some_and(|p| p.pending_draw().is_some())
            || self.reveal.is_animating()
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn player(&self) -> Option<&FramePlayer> {
        self.player.as_ref()
    }

    pub fn reveal(&self) -> &RevealObserver {
        &self.reveal
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    /// Consume the pending draw request; unloaded frames are skipped silently.
    fn render_step(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let Some(index) = player.take_pending_draw() else {
            return;
        };
        if let Some(plan) = player.draw_plan(index, self.canvas) {
            self.outputs.push_change(Change::Draw(plan));
        }
    }

    fn frame_loaded(&mut self, index: usize, size: Size) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        match player.on_frame_loaded(index, size) {
            Ok(true) if index == 0 => self.outputs.push_event(CoreEvent::FirstFrameReady),
            Ok(_) => {}
            Err(e) => self.outputs.push_event(CoreEvent::Error {
                message: e.to_string(),
            }),
        }
        self.report_settled();
    }

    fn frame_failed(&mut self, index: usize) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        match player.on_frame_failed(index) {
            Ok(true) => {
                if let Some(at) = player.frames().frame_ref(index) {
                    self.outputs.push_event(CoreEvent::FrameMissing {
                        sequence: at.sequence,
                        index: at.index,
                    });
                }
            }
            Ok(false) => {}
            Err(e) => self.outputs.push_event(CoreEvent::Error {
                message: e.to_string(),
            }),
        }
        self.report_settled();
    }

    fn report_settled(&mut self) {
        let Some(player) = self.player.as_ref() else {
            return;
        };
        let frames = player.frames();
        if self.settled_reported || frames.pending_count() > 0 {
            return;
        }
        self.settled_reported = true;
        info!(
            "frames settled: {} loaded, {} failed",
            frames.loaded_count(),
            frames.failed_count()
        );
        self.outputs.push_event(CoreEvent::AllFramesSettled {
            loaded: frames.loaded_count(),
            failed: frames.failed_count(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_canvas_disables_player() {
        let mut page = PageController::new(Config::default()).unwrap();
        page.mount(MountInfo {
            canvas: None,
            animation_section: true,
            sections: vec![],
        });
        assert!(page.player().is_none());
        assert!(page.outputs().is_empty());
    }

    #[test]
    fn mount_sets_section_height() {
        let mut page = PageController::new(Config::default()).unwrap();
        let ids = page.mount(MountInfo {
            canvas: Some(Size::new(800.0, 600.0)),
            animation_section: true,
            sections: vec![SectionKind::Plain, SectionKind::Skills { markers: 3 }],
        });
        assert_eq!(ids, vec![SectionId(0), SectionId(1)]);
        assert_eq!(
            page.outputs().changes[0],
            Change::SectionHeight { height_px: 4000.0 }
        );
        assert_eq!(page.outputs().changes.len(), 3);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = Config {
            sequences: vec![],
            ..Config::default()
        };
        assert!(PageController::new(cfg).is_err());
    }
}

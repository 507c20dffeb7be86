//! Scroll-scrubbed frame player.
//!
//! Owns the preloaded frame set, the playback cursor and a single pending
//! draw request. Scroll events move the cursor; the render step consumes
//! the pending request once per tick, so any number of scroll events
//! between two ticks produce at most one draw (of the latest target).

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{Config, RenderCfg};
use crate::error::PageError;
use crate::frames::FrameSet;
use crate::geometry::{SectionBox, Size};
use crate::mapping::frame_for_scroll;
use crate::render::DrawPlan;

/// The frame currently on the canvas as far as scrolling is concerned.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Uninitialized,
    Showing(usize),
}

impl Cursor {
    /// `-1` before the first scroll-driven draw, else the frame index.
    pub fn as_raw(&self) -> i64 {
        match self {
            Cursor::Uninitialized => -1,
            Cursor::Showing(i) => *i as i64,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Cursor::Uninitialized => None,
            Cursor::Showing(i) => Some(*i),
        }
    }
}

#[derive(Debug)]
pub struct FramePlayer {
    frames: FrameSet,
    cursor: Cursor,
    pending: Option<usize>,
    render: RenderCfg,
}

impl FramePlayer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            frames: FrameSet::new(&cfg.sequences),
            cursor: Cursor::Uninitialized,
            pending: None,
            render: cfg.render.clone(),
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// Index a draw has been requested for but not yet taken.
    pub fn pending_draw(&self) -> Option<usize> {
        self.pending
    }

    /// Fraction of frames whose load has settled (loaded or failed).
    pub fn load_progress(&self) -> f32 {
        if self.frames.is_empty() {
            return 1.0;
        }
        let settled = self.frames.loaded_count() + self.frames.failed_count();
        settled as f32 / self.frames.len() as f32
    }

    /// Record a completed image load. Returns whether the frame was newly settled.
    ///
    /// Frame 0 is drawn as soon as it arrives, as long as scrolling has not
    /// already picked a frame.
    pub fn on_frame_loaded(&mut self, index: usize, size: Size) -> Result<bool, PageError> {
        let fresh = self.frames.mark_loaded(index, size)?;
        if fresh && index == 0 && self.cursor == Cursor::Uninitialized {
            self.pending = Some(0);
        }
        Ok(fresh)
    }

    /// Record a failed image load. The frame is skipped for good.
    pub fn on_frame_failed(&mut self, index: usize) -> Result<bool, PageError> {
        let fresh = self.frames.mark_failed(index)?;
        if fresh {
            if let Some(at) = self.frames.frame_ref(index) {
                warn!("Frame {}/{} missing", at.sequence + 1, at.index);
            }
        }
        Ok(fresh)
    }

    /// Map the current scroll position to a frame and schedule its draw.
    ///
    /// Returns the new target only when it differs from the cursor; outside
    /// the section the cursor stays frozen on the last drawn frame.
    pub fn compute_target_frame(
        &mut self,
        scroll_y: f64,
        section: SectionBox,
        window_height: f64,
    ) -> Option<usize> {
        let target = frame_for_scroll(scroll_y, section, window_height, self.frames.len())?;
        if self.cursor == Cursor::Showing(target) {
            return None;
        }
        debug!("cursor {} -> {}", self.cursor.as_raw(), target);
        self.cursor = Cursor::Showing(target);
        self.pending = Some(target);
        Some(target)
    }

    /// Canvas was resized: repaint whatever the cursor points at.
    pub fn on_resize(&mut self) {
        if let Cursor::Showing(i) = self.cursor {
            self.pending = Some(i);
        }
    }

    /// Consume the pending draw request, if any.
    pub fn take_pending_draw(&mut self) -> Option<usize> {
        self.pending.take()
    }

    /// Plan a repaint of `index`, or `None` if that frame is not loaded.
    pub fn draw_plan(&self, index: usize, canvas: Size) -> Option<DrawPlan> {
        let size = self.frames.get(index)?.size()?;
        DrawPlan::new(index, canvas, size, &self.render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::SequenceCfg;

    fn small_cfg() -> Config {
        Config {
            sequences: vec![
                SequenceCfg::new("1", "a/{index}.webp", 4),
                SequenceCfg::new("2", "b/{index}.webp", 4),
            ],
            ..Config::default()
        }
    }

    const SECTION: SectionBox = SectionBox {
        top: 0.0,
        height: 900.0,
    };

    #[test]
    fn starts_uninitialized() {
        let p = FramePlayer::new(&small_cfg());
        assert_eq!(p.cursor().as_raw(), -1);
        assert_eq!(p.total_frames(), 8);
        assert_eq!(p.pending_draw(), None);
    }

    #[test]
    fn frame_zero_drawn_on_arrival() {
        let mut p = FramePlayer::new(&small_cfg());
        p.on_frame_loaded(3, Size::new(10.0, 10.0)).unwrap();
        assert_eq!(p.pending_draw(), None);
        p.on_frame_loaded(0, Size::new(10.0, 10.0)).unwrap();
        assert_eq!(p.take_pending_draw(), Some(0));
        // cursor untouched by the initial draw
        assert_eq!(p.cursor(), Cursor::Uninitialized);
    }

    #[test]
    fn same_target_is_not_rescheduled() {
        let mut p = FramePlayer::new(&small_cfg());
        // scrollable distance 100, 8 frames
        assert_eq!(p.compute_target_frame(50.0, SECTION, 800.0), Some(4));
        assert_eq!(p.take_pending_draw(), Some(4));
        assert_eq!(p.compute_target_frame(50.0, SECTION, 800.0), None);
        assert_eq!(p.take_pending_draw(), None);
        assert_eq!(p.cursor(), Cursor::Showing(4));
    }

    #[test]
    fn requests_coalesce_to_latest() {
        let mut p = FramePlayer::new(&small_cfg());
        p.compute_target_frame(10.0, SECTION, 800.0);
        p.compute_target_frame(30.0, SECTION, 800.0);
        p.compute_target_frame(70.0, SECTION, 800.0);
        assert_eq!(p.take_pending_draw(), Some(5));
        assert_eq!(p.take_pending_draw(), None);
    }

    #[test]
    fn frozen_outside_section() {
        let mut p = FramePlayer::new(&small_cfg());
        p.compute_target_frame(99.0, SECTION, 800.0);
        p.take_pending_draw();
        assert_eq!(p.compute_target_frame(2000.0, SECTION, 800.0), None);
        assert_eq!(p.cursor(), Cursor::Showing(7));
    }

    #[test]
    fn resize_redraws_cursor_only_once_initialized() {
        let mut p = FramePlayer::new(&small_cfg());
        p.on_resize();
        assert_eq!(p.take_pending_draw(), None);
        p.compute_target_frame(30.0, SECTION, 800.0);
        p.take_pending_draw();
        p.on_resize();
        assert_eq!(p.take_pending_draw(), Some(2));
    }

    #[test]
    fn unloaded_frames_have_no_plan() {
        let mut p = FramePlayer::new(&small_cfg());
        let canvas = Size::new(100.0, 100.0);
        assert!(p.draw_plan(1, canvas).is_none());
        p.on_frame_failed(2).unwrap();
        assert!(p.draw_plan(2, canvas).is_none());
        p.on_frame_loaded(1, Size::new(50.0, 50.0)).unwrap();
        assert_eq!(p.draw_plan(1, canvas).unwrap().frame, 1);
        assert!(p.draw_plan(99, canvas).is_none());
    }

    #[test]
    fn load_progress_counts_failures() {
        let mut p = FramePlayer::new(&small_cfg());
        p.on_frame_loaded(0, Size::new(1.0, 1.0)).unwrap();
        p.on_frame_failed(1).unwrap();
        assert_eq!(p.load_progress(), 0.25);
    }
}

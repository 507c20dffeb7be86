//! Frame draw plans and the surface they are executed against.
//!
//! The core never touches a canvas. It produces a [`DrawPlan`] describing
//! one complete repaint, and adapters execute it on anything implementing
//! [`FrameSurface`] (a Canvas 2D context in the browser, a recorder in tests).

use serde::{Deserialize, Serialize};

use crate::config::RenderCfg;
use crate::error::PageError;
use crate::geometry::{contain_rect, DrawRect, Size};

/// Drawing primitives needed to paint one frame.
pub trait FrameSurface {
    fn fill_rect(&mut self, color: &str, rect: DrawRect) -> Result<(), PageError>;
    /// Draw the preloaded image for global frame `frame` scaled into `rect`.
    fn draw_frame(&mut self, frame: usize, rect: DrawRect) -> Result<(), PageError>;
    fn set_blend_mode(&mut self, mode: &str) -> Result<(), PageError>;
}

/// One full repaint of the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawPlan {
    pub frame: usize,
    pub canvas: Size,
    /// Where the image lands after contain-fitting.
    pub dest: DrawRect,
    pub letterbox: String,
    pub tint: String,
    pub tint_blend: String,
    pub restore_blend: String,
}

impl DrawPlan {
    /// Plan a draw of `frame` (intrinsic size `image`) onto `canvas`.
    pub fn new(frame: usize, canvas: Size, image: Size, cfg: &RenderCfg) -> Option<Self> {
        let dest = contain_rect(canvas, image)?;
        Some(Self {
            frame,
            canvas,
            dest,
            letterbox: cfg.letterbox_color.clone(),
            tint: cfg.tint_color.clone(),
            tint_blend: cfg.tint_blend.clone(),
            restore_blend: cfg.restore_blend.clone(),
        })
    }

    /// Letterbox fill, image, tint overlay, then restore the normal blend mode.
    pub fn execute<S: FrameSurface + ?Sized>(&self, surface: &mut S) -> Result<(), PageError> {
        let full = DrawRect::full(self.canvas);
        surface.fill_rect(&self.letterbox, full)?;
        surface.draw_frame(self.frame, self.dest)?;
        surface.set_blend_mode(&self.tint_blend)?;
        let tinted = surface.fill_rect(&self.tint, full);
        // restore even if the tint failed so later draws are not composited
        surface.set_blend_mode(&self.restore_blend)?;
        tinted
    }
}

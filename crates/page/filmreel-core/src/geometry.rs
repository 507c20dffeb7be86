//! Viewport and canvas geometry helpers.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Destination rectangle in canvas pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawRect {
    /// Rectangle covering the whole canvas.
    pub fn full(canvas: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: canvas.width,
            height: canvas.height,
        }
    }
}

/// Document-relative vertical extent of a section.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionBox {
    pub top: f64,
    pub height: f64,
}

/// Fit `image` inside `canvas` preserving aspect ratio ("contain"), centred.
///
/// Returns `None` when the image has no intrinsic size.
pub fn contain_rect(canvas: Size, image: Size) -> Option<DrawRect> {
    if image.is_empty() {
        return None;
    }
    let scale = (canvas.width / image.width).min(canvas.height / image.height);
    let width = image.width * scale;
    let height = image.height * scale;
    Some(DrawRect {
        x: canvas.width / 2.0 - width / 2.0,
        y: canvas.height / 2.0 - height / 2.0,
        width,
        height,
    })
}

/// Canvas backing-store size for an on-screen rectangle.
///
/// Canvas `width`/`height` are unsigned integers, so fractional CSS pixels
/// are truncated and negative sizes collapse to zero.
pub fn backing_store_size(css_width: f64, css_height: f64) -> Size {
    let trunc = |v: f64| if v.is_finite() && v > 0.0 { v.trunc() } else { 0.0 };
    Size::new(trunc(css_width), trunc(css_height))
}

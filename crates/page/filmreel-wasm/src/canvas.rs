//! Canvas 2D implementation of the core `FrameSurface`.

use filmreel_core::{backing_store_size, DrawRect, FrameSurface, PageError, Size};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

fn surface_err(e: JsValue) -> PageError {
    PageError::surface(format!("{e:?}"))
}

pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Preloaded frames indexed like the core frame set.
    images: Vec<HtmlImageElement>,
}

impl Canvas2dSurface {
    /// Look up the canvas by id and obtain its 2D context.
    pub fn find(document: &Document, canvas_id: &str) -> Result<Self, PageError> {
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| PageError::missing_element(format!("#{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| PageError::missing_element(format!("#{canvas_id} is not a canvas")))?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| PageError::MissingContext {
                what: format!("2d context for #{canvas_id}"),
            })?;
        Ok(Self {
            canvas,
            ctx,
            images: Vec::new(),
        })
    }

    /// Match the backing store to the on-screen size. Clears the canvas.
    pub fn resize_to_client_rect(&self) -> Size {
        let rect = self.canvas.get_bounding_client_rect();
        let size = backing_store_size(rect.width(), rect.height());
        self.canvas.set_width(size.width as u32);
        self.canvas.set_height(size.height as u32);
        size
    }

    pub fn set_images(&mut self, images: Vec<HtmlImageElement>) {
        self.images = images;
    }
}

impl FrameSurface for Canvas2dSurface {
    fn fill_rect(&mut self, color: &str, rect: DrawRect) -> Result<(), PageError> {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
        Ok(())
    }

    fn draw_frame(&mut self, frame: usize, rect: DrawRect) -> Result<(), PageError> {
        let img = self.images.get(frame).ok_or(PageError::FrameOutOfRange {
            index: frame,
            total: self.images.len(),
        })?;
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                img,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
            )
            .map_err(surface_err)
    }

    fn set_blend_mode(&mut self, mode: &str) -> Result<(), PageError> {
        self.ctx
            .set_global_composite_operation(mode)
            .map_err(surface_err)
    }
}

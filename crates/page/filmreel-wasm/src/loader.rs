//! Best-effort frame preloading: one image request per frame, all at once.

use filmreel_core::PageEvent;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlImageElement;

/// Owns the image elements and their callbacks. Dropping it unhooks every
/// image, so a late load never reaches a freed closure.
pub struct FrameLoader {
    images: Vec<HtmlImageElement>,
    callbacks: Vec<Closure<dyn FnMut()>>,
}

impl FrameLoader {
    /// Request every url. `notify` receives `FrameLoaded` / `FrameFailed`
    /// with the frame's position in `urls`.
    pub fn start<'a, I, F>(urls: I, notify: F) -> Result<Self, JsValue>
    where
        I: IntoIterator<Item = &'a str>,
        F: Fn(PageEvent) + Clone + 'static,
    {
        let mut loader = Self {
            images: Vec::new(),
            callbacks: Vec::new(),
        };
        for (index, url) in urls.into_iter().enumerate() {
            let img = HtmlImageElement::new()?;

            let onload = {
                let notify = notify.clone();
                let img = img.clone();
                Closure::<dyn FnMut()>::new(move || {
                    notify(PageEvent::FrameLoaded {
                        index,
                        width: img.natural_width() as f64,
                        height: img.natural_height() as f64,
                    })
                })
            };
            let onerror = {
                let notify = notify.clone();
                Closure::<dyn FnMut()>::new(move || notify(PageEvent::FrameFailed { index }))
            };
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            img.set_src(url);

            loader.images.push(img);
            loader.callbacks.push(onload);
            loader.callbacks.push(onerror);
        }
        Ok(loader)
    }

    pub fn images(&self) -> &[HtmlImageElement] {
        &self.images
    }

    /// Drop the callbacks; in-flight requests cannot be aborted but no longer report.
    pub fn detach(&mut self) {
        for img in &self.images {
            img.set_onload(None);
            img.set_onerror(None);
        }
        self.callbacks.clear();
    }
}

impl Drop for FrameLoader {
    fn drop(&mut self) {
        self.detach();
    }
}

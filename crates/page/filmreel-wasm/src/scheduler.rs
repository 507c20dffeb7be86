//! Single outstanding `requestAnimationFrame`.

use js_sys::Function;
use log::warn;
use web_sys::Window;

pub struct TickScheduler {
    window: Window,
    tick: Function,
    handle: Option<i32>,
}

impl TickScheduler {
    pub fn new(window: Window, tick: Function) -> Self {
        Self {
            window,
            tick,
            handle: None,
        }
    }

    /// Ask for a tick unless one is already scheduled.
    pub fn request(&mut self) {
        if self.handle.is_some() {
            return;
        }
        match self.window.request_animation_frame(&self.tick) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => warn!("requestAnimationFrame failed: {e:?}"),
        }
    }

    /// The scheduled tick is running.
    pub fn fired(&mut self) {
        self.handle = None;
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }
}

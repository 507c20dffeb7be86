//! Browser adapter for `filmreel-core`.
//!
//! `FilmReelPage::mount` wires the page: DOM lookups, canvas sizing, frame
//! preloading, `scroll` / `resize` listeners and an `IntersectionObserver`.
//! Every host callback only queues a `PageEvent`; the single
//! `requestAnimationFrame` tick feeds the queue to the controller and
//! applies what comes back.

mod canvas;
mod dom;
mod loader;
mod scheduler;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function};
use log::{debug, error, info, warn, Level};
use serde_wasm_bindgen as swb;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

use filmreel_core::{
    Change, Config, CoreEvent, Inputs, MountInfo, Outputs, PageController, PageEvent,
};

use canvas::Canvas2dSurface;
use dom::PageDom;
use loader::FrameLoader;
use scheduler::TickScheduler;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// State reachable from the browser callbacks.
struct Shared {
    core: PageController,
    dom: Option<PageDom>,
    surface: Option<Canvas2dSurface>,
    observer: Option<IntersectionObserver>,
    scheduler: Option<TickScheduler>,
    queue: Vec<PageEvent>,
}

impl Shared {
    fn enqueue(&mut self, event: PageEvent) {
        self.queue.push(event);
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.request();
        }
    }

    fn tick(&mut self, now_ms: f64) {
        let Shared {
            core,
            dom,
            surface,
            observer,
            scheduler,
            queue,
        } = self;
        if let Some(scheduler) = scheduler.as_mut() {
            scheduler.fired();
        }
        let inputs = Inputs::new(std::mem::take(queue));
        let outputs = core.update(now_ms, inputs);
        apply_outputs(outputs, dom.as_ref(), surface.as_mut(), observer.as_ref());
        if core.needs_tick() {
            if let Some(scheduler) = scheduler.as_mut() {
                scheduler.request();
            }
        }
    }
}

fn apply_outputs(
    outputs: &Outputs,
    dom: Option<&PageDom>,
    mut surface: Option<&mut Canvas2dSurface>,
    observer: Option<&IntersectionObserver>,
) {
    for change in &outputs.changes {
        match change {
            Change::Draw(plan) => {
                if let Some(surface) = surface.as_deref_mut() {
                    debug!("draw frame {}", plan.frame);
                    if let Err(e) = plan.execute(surface) {
                        warn!("draw of frame {} failed: {e}", plan.frame);
                    }
                }
            }
            other => {
                if let Some(dom) = dom {
                    if let Err(e) = dom.apply(other, observer) {
                        warn!("could not apply {other:?}: {e:?}");
                    }
                }
            }
        }
    }
    for event in &outputs.events {
        match event {
            CoreEvent::Error { message } => error!("{message}"),
            other => debug!("{other:?}"),
        }
    }
}

/// Everything `destroy` has to undo.
struct Listeners {
    window: Window,
    on_scroll: Closure<dyn FnMut()>,
    on_resize: Closure<dyn FnMut()>,
    // Kept alive for the scheduler's Function handle.
    _on_tick: Closure<dyn FnMut(f64)>,
    _on_intersect: Option<Closure<dyn FnMut(Array, IntersectionObserver)>>,
    loader: Option<FrameLoader>,
}

#[wasm_bindgen]
pub struct FilmReelPage {
    shared: Rc<RefCell<Shared>>,
    listeners: Option<Listeners>,
}

#[wasm_bindgen]
impl FilmReelPage {
    /// Create a page controller. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new FilmReelPage({ animation_scroll_height_px: 6000 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<FilmReelPage, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let level = cfg.log_level.parse::<Level>().unwrap_or(Level::Info);
        // A second page on the same document keeps the first logger.
        let _ = console_log::init_with_level(level);

        let core = PageController::new(cfg).map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(FilmReelPage {
            shared: Rc::new(RefCell::new(Shared {
                core,
                dom: None,
                surface: None,
                observer: None,
                scheduler: None,
                queue: Vec::new(),
            })),
            listeners: None,
        })
    }

    /// Attach to the current document and start the effects.
    ///
    /// Missing collaborators only disable the feature that needs them.
    #[wasm_bindgen]
    pub fn mount(&mut self) -> Result<(), JsError> {
        if self.listeners.is_some() {
            return Err(JsError::new("mount: already mounted"));
        }
        let window = web_sys::window().ok_or_else(|| JsError::new("mount: no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("mount: no document"))?;
        let weak = Rc::downgrade(&self.shared);

        let on_tick = Closure::<dyn FnMut(f64)>::new({
            let weak = weak.clone();
            move |now_ms: f64| {
                if let Some(shared) = weak.upgrade() {
                    shared.borrow_mut().tick(now_ms);
                }
            }
        });
        let on_scroll = Closure::<dyn FnMut()>::new({
            let weak = weak.clone();
            move || {
                if let Some(shared) = weak.upgrade() {
                    let mut s = shared.borrow_mut();
                    if let Some(event) = s.dom.as_mut().map(PageDom::scroll_event) {
                        s.enqueue(event);
                    }
                }
            }
        });
        let on_resize = Closure::<dyn FnMut()>::new({
            let weak = weak.clone();
            move || {
                if let Some(shared) = weak.upgrade() {
                    let mut s = shared.borrow_mut();
                    if let Some(canvas) = s
                        .surface
                        .as_ref()
                        .map(Canvas2dSurface::resize_to_client_rect)
                    {
                        s.enqueue(PageEvent::Resize { canvas });
                    }
                }
            }
        });

        let mut shared = self.shared.borrow_mut();
        let cfg = shared.core.config().clone();

        let mut surface = match Canvas2dSurface::find(&document, &cfg.selectors.canvas_id) {
            Ok(surface) => Some(surface),
            Err(e) => {
                warn!("{e}; frame animation disabled");
                None
            }
        };
        let canvas = surface.as_ref().map(Canvas2dSurface::resize_to_client_rect);

        let (mut page_dom, sections) = PageDom::discover(window.clone(), document, &cfg.selectors);
        let ids = shared.core.mount(MountInfo {
            canvas,
            animation_section: page_dom.has_animation_section(),
            sections,
        });
        page_dom.bind_ids(&ids);
        apply_outputs(shared.core.outputs(), Some(&page_dom), None, None);

        // Nothing below reaches `shared` until the last fallible step has
        // passed; an early return drops the closures, the observer and the
        // loader (which unhooks its images) together.
        let tick_fn: Function = on_tick.as_ref().unchecked_ref::<Function>().clone();
        let scheduler = TickScheduler::new(window.clone(), tick_fn);

        let (on_intersect, observer) = if page_dom.section_elements().next().is_some() {
            let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new({
                let weak = weak.clone();
                move |entries: Array, _observer: IntersectionObserver| {
                    let Some(shared) = weak.upgrade() else {
                        return;
                    };
                    let mut s = shared.borrow_mut();
                    for entry in entries.iter() {
                        let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                            continue;
                        };
                        let Some(section) =
                            s.dom.as_ref().and_then(|d| d.section_for(&entry.target()))
                        else {
                            continue;
                        };
                        let viewport_coverage = entry
                            .root_bounds()
                            .filter(|root| root.height() > 0.0)
                            .map(|root| (entry.intersection_rect().height() / root.height()) as f32);
                        s.enqueue(PageEvent::Intersection {
                            section,
                            intersecting: entry.is_intersecting(),
                            ratio: entry.intersection_ratio() as f32,
                            viewport_coverage,
                        });
                    }
                }
            });
            let options = IntersectionObserverInit::new();
            options.set_threshold(&JsValue::from_f64(cfg.reveal.threshold as f64));
            options.set_root_margin("0px");
            let observer =
                IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                    .map_err(|e| JsError::new(&format!("mount: observer error: {e:?}")))?;
            (Some(callback), Some(observer))
        } else {
            (None, None)
        };

        let loader = match shared.core.player() {
            Some(player) => {
                let notify = {
                    let weak = weak.clone();
                    move |event: PageEvent| {
                        if let Some(shared) = weak.upgrade() {
                            shared.borrow_mut().enqueue(event);
                        }
                    }
                };
                let urls: Vec<String> = player.frames().urls().map(str::to_string).collect();
                info!("preloading {} frames", urls.len());
                let loader = FrameLoader::start(urls.iter().map(String::as_str), notify)
                    .map_err(|e| JsError::new(&format!("mount: image creation failed: {e:?}")))?;
                if let Some(surface) = surface.as_mut() {
                    surface.set_images(loader.images().to_vec());
                }
                Some(loader)
            }
            None => {
                surface = None;
                None
            }
        };

        window
            .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("mount: scroll listener: {e:?}")))?;
        if let Err(e) = window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        {
            let _ = window
                .remove_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref());
            return Err(JsError::new(&format!("mount: resize listener: {e:?}")));
        }

        if let Some(observer) = observer.as_ref() {
            for el in page_dom.section_elements() {
                observer.observe(el);
            }
        }
        shared.scheduler = Some(scheduler);
        shared.observer = observer;
        shared.surface = surface;
        shared.dom = Some(page_dom);
        drop(shared);

        self.listeners = Some(Listeners {
            window,
            on_scroll,
            on_resize,
            _on_tick: on_tick,
            _on_intersect: on_intersect,
            loader,
        });
        Ok(())
    }

    /// Detach listeners, the observer, image callbacks and any pending tick.
    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        let Some(mut listeners) = self.listeners.take() else {
            return;
        };
        let _ = listeners.window.remove_event_listener_with_callback(
            "scroll",
            listeners.on_scroll.as_ref().unchecked_ref(),
        );
        let _ = listeners.window.remove_event_listener_with_callback(
            "resize",
            listeners.on_resize.as_ref().unchecked_ref(),
        );
        if let Some(loader) = listeners.loader.as_mut() {
            loader.detach();
        }
        let mut shared = self.shared.borrow_mut();
        if let Some(observer) = shared.observer.take() {
            observer.disconnect();
        }
        if let Some(mut scheduler) = shared.scheduler.take() {
            scheduler.cancel();
        }
        shared.queue.clear();
    }

    /// Register features without touching the DOM. `info` is a JSON `MountInfo`.
    /// Returns the section ids in order; the initial changes are available via `last_outputs`.
    #[wasm_bindgen(js_name = mount_headless)]
    pub fn mount_headless(&mut self, info: JsValue) -> Result<Vec<u32>, JsError> {
        let info: MountInfo = if jsvalue_is_undefined_or_null(&info) {
            MountInfo::default()
        } else {
            swb::from_value(info).map_err(|e| JsError::new(&format!("mount info error: {e}")))?
        };
        let ids = self.shared.borrow_mut().core.mount(info);
        Ok(ids.into_iter().map(|id| id.0).collect())
    }

    /// Outputs of the most recent `mount_headless` or `update`.
    #[wasm_bindgen(js_name = last_outputs)]
    pub fn last_outputs(&self) -> Result<JsValue, JsError> {
        let shared = self.shared.borrow();
        swb::to_value(shared.core.outputs()).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Drive the controller manually with JSON `Inputs`. Returns `Outputs` JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, now_ms: f64, inputs_json: JsValue) -> Result<JsValue, JsError> {
        let inputs: Inputs = if jsvalue_is_undefined_or_null(&inputs_json) {
            Inputs::default()
        } else {
            swb::from_value(inputs_json).map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let mut shared = self.shared.borrow_mut();
        let out: &Outputs = shared.core.update(now_ms, inputs);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Current frame cursor, `-1` before the first scroll-driven draw or without a player.
    #[wasm_bindgen]
    pub fn cursor(&self) -> i32 {
        self.shared
            .borrow()
            .core
            .player()
            .map_or(-1, |p| p.cursor().as_raw() as i32)
    }

    /// Fraction of frames settled (loaded or failed); `0` without a player.
    #[wasm_bindgen(js_name = load_progress)]
    pub fn load_progress(&self) -> f32 {
        self.shared
            .borrow()
            .core
            .player()
            .map_or(0.0, |p| p.load_progress())
    }

    /// Whether another tick would produce work.
    #[wasm_bindgen(js_name = needs_tick)]
    pub fn needs_tick(&self) -> bool {
        self.shared.borrow().core.needs_tick()
    }
}

impl Drop for FilmReelPage {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

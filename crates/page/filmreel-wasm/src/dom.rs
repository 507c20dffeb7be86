//! DOM lookup, per-scroll snapshots and applying core changes to elements.

use filmreel_core::{
    hero_in_view, parse_speed, Change, HeroSnapshot, PageEvent, SectionBox, SectionId,
    SectionKind, Selectors,
};
use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, IntersectionObserver, NodeList, Window};

fn collect_html(list: NodeList) -> Vec<HtmlElement> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn translate_y(px: f32) -> String {
    format!("translateY({px}px)")
}

/// A content section and the children its follow-up animations touch.
struct SectionDom {
    id: SectionId,
    element: HtmlElement,
    markers: Vec<HtmlElement>,
    stats: Vec<HtmlElement>,
}

pub struct PageDom {
    window: Window,
    document: Document,
    selectors: Selectors,
    animation_section: Option<HtmlElement>,
    sections: Vec<SectionDom>,
    /// Layers and hero text as of the latest scroll snapshot.
    layers: Vec<HtmlElement>,
    hero_text: Vec<HtmlElement>,
}

impl PageDom {
    /// Find the static collaborators. Returns the page plus the kind of each
    /// content section, in document order.
    pub fn discover(
        window: Window,
        document: Document,
        selectors: &Selectors,
    ) -> (Self, Vec<SectionKind>) {
        let animation_section = document
            .query_selector(&selectors.animation_section)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if animation_section.is_none() {
            warn!("no element matches '{}'", selectors.animation_section);
        }

        let mut sections = Vec::new();
        let mut kinds = Vec::new();
        let found = document
            .query_selector_all(&selectors.content_section)
            .map(collect_html)
            .unwrap_or_default();
        for (pos, element) in found.into_iter().enumerate() {
            let mut markers = Vec::new();
            let mut stats = Vec::new();
            let id = element.id();
            let kind = if id == selectors.skills_id {
                markers = element
                    .query_selector_all(&selectors.skill_marker)
                    .map(collect_html)
                    .unwrap_or_default();
                SectionKind::Skills {
                    markers: markers.len(),
                }
            } else if id == selectors.achievements_id {
                stats = element
                    .query_selector_all(&selectors.stat_number)
                    .map(collect_html)
                    .unwrap_or_default();
                let targets = stats
                    .iter()
                    .map(|s| read_count(s, &selectors.stat_count_attr))
                    .collect();
                SectionKind::Achievements { targets }
            } else {
                SectionKind::Plain
            };
            kinds.push(kind);
            sections.push(SectionDom {
                id: SectionId(pos as u32),
                element,
                markers,
                stats,
            });
        }

        let dom = Self {
            window,
            document,
            selectors: selectors.clone(),
            animation_section,
            sections,
            layers: Vec::new(),
            hero_text: Vec::new(),
        };
        (dom, kinds)
    }

    pub fn has_animation_section(&self) -> bool {
        self.animation_section.is_some()
    }

    /// Adopt the ids the controller assigned, in discovery order.
    pub fn bind_ids(&mut self, ids: &[SectionId]) {
        for (section, id) in self.sections.iter_mut().zip(ids) {
            section.id = *id;
        }
    }

    pub fn section_elements(&self) -> impl Iterator<Item = &HtmlElement> {
        self.sections.iter().map(|s| &s.element)
    }

    pub fn section_for(&self, target: &Element) -> Option<SectionId> {
        self.sections
            .iter()
            .find(|s| AsRef::<Element>::as_ref(&s.element) == target)
            .map(|s| s.id)
    }

    /// Read the scroll geometry and, while the hero is on screen, its layer speeds.
    pub fn scroll_event(&mut self) -> PageEvent {
        let scroll_y = self.window.page_y_offset().unwrap_or(0.0);
        let window_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);

        // Past the hero the layers are left alone, and so is the cached list.
        let hero = match hero_in_view(scroll_y, window_height)
            .then(|| self.document.get_element_by_id(&self.selectors.hero_id))
            .flatten()
        {
            Some(_) => {
                self.layers = self.query_all(&self.selectors.layer);
                self.hero_text = self.query_all(&self.selectors.hero_text);
                let attr = &self.selectors.layer_speed_attr;
                Some(HeroSnapshot {
                    layer_speeds: self
                        .layers
                        .iter()
                        .map(|l| parse_speed(l.get_attribute(attr).as_deref()))
                        .collect(),
                })
            }
            None => None,
        };

        let section = self.animation_section.as_ref().map(|el| SectionBox {
            top: el.offset_top() as f64,
            height: el.offset_height() as f64,
        });

        PageEvent::Scroll {
            scroll_y,
            window_height,
            hero,
            section,
        }
    }

    /// Apply one non-canvas change.
    pub fn apply(
        &self,
        change: &Change,
        observer: Option<&IntersectionObserver>,
    ) -> Result<(), JsValue> {
        match change {
            Change::LayerTransform { layer, translate_y: y } => {
                if let Some(el) = self.layers.get(*layer) {
                    el.style().set_property("transform", &translate_y(*y))?;
                }
            }
            Change::HeroText {
                translate_y: y,
                opacity,
            } => {
                for el in &self.hero_text {
                    let style = el.style();
                    style.set_property("transform", &translate_y(*y))?;
                    style.set_property("opacity", &opacity.to_string())?;
                }
            }
            Change::SectionHeight { height_px } => {
                if let Some(el) = &self.animation_section {
                    el.style().set_property("height", &format!("{height_px}px"))?;
                }
            }
            Change::SectionStyle {
                section,
                opacity,
                translate_y: y,
                transition,
            } => {
                if let Some(s) = self.section(*section) {
                    let style = s.element.style();
                    style.set_property("opacity", &opacity.to_string())?;
                    style.set_property("transform", &translate_y(*y))?;
                    if let Some(t) = transition {
                        style.set_property("transition", t)?;
                    }
                }
            }
            Change::SectionRevealed { section, class } => {
                if let Some(s) = self.section(*section) {
                    s.element.class_list().add_1(class)?;
                }
            }
            Change::SectionUnobserved { section } => {
                if let (Some(s), Some(observer)) = (self.section(*section), observer) {
                    observer.unobserve(&s.element);
                }
            }
            Change::MarkerRevealed { section, marker } => {
                if let Some(el) = self.section(*section).and_then(|s| s.markers.get(*marker)) {
                    let style = el.style();
                    style.set_property("opacity", "1")?;
                    style.set_property("transform", &translate_y(0.0))?;
                }
            }
            Change::CounterText {
                section,
                counter,
                text,
            } => {
                if let Some(el) = self.section(*section).and_then(|s| s.stats.get(*counter)) {
                    el.set_inner_text(text);
                }
            }
            // painted by the canvas surface
            Change::Draw(_) => {}
        }
        Ok(())
    }

    fn section(&self, id: SectionId) -> Option<&SectionDom> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn query_all(&self, selector: &str) -> Vec<HtmlElement> {
        self.document
            .query_selector_all(selector)
            .map(collect_html)
            .unwrap_or_default()
    }
}

fn read_count(el: &HtmlElement, attr: &str) -> u32 {
    let raw = el.get_attribute(attr).unwrap_or_default();
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.round() as u32,
        _ => {
            warn!("stat '{raw}' in {attr} is not a count; using 0");
            0
        }
    }
}

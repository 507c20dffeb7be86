//! Output contracts from the page controller.
//!
//! Outputs carry the style/text/canvas side effects for this tick and a
//! separate list of semantic events. Adapters apply changes to the DOM in
//! order and log or forward the events.

use serde::{Deserialize, Serialize};

use crate::ids::SectionId;
use crate::render::DrawPlan;

/// One side effect on the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Change {
    /// `transform: translateY(..px)` on hero layer `layer`.
    LayerTransform { layer: usize, translate_y: f32 },
    /// Same transform and opacity on every hero text element.
    HeroText { translate_y: f32, opacity: f32 },
    /// Fixed height of the animation section.
    SectionHeight { height_px: f32 },
    SectionStyle {
        section: SectionId,
        opacity: f32,
        translate_y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transition: Option<String>,
    },
    SectionRevealed { section: SectionId, class: String },
    /// Stop observing the section; it will not trigger again.
    SectionUnobserved { section: SectionId },
    MarkerRevealed { section: SectionId, marker: usize },
    CounterText {
        section: SectionId,
        counter: usize,
        text: String,
    },
    Draw(DrawPlan),
}

/// Discrete signals emitted while updating.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    FirstFrameReady,
    FrameMissing { sequence: usize, index: usize },
    CursorMoved { from: i64, to: usize },
    AllFramesSettled { loaded: usize, failed: usize },
    Error { message: String },
}

/// Outputs returned by PageController::update().
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Draw plans in this batch (at most one per tick).
    pub fn draws(&self) -> impl Iterator<Item = &DrawPlan> {
        self.changes.iter().filter_map(|c| match c {
            Change::Draw(plan) => Some(plan),
            _ => None,
        })
    }
}

//! Input contracts for the page controller.
//!
//! Adapters queue one [`PageEvent`] per host callback (scroll, resize,
//! image load, intersection) and hand the batch to
//! `PageController::update()` on the next animation-frame tick.

use serde::{Deserialize, Serialize};

use crate::geometry::{SectionBox, Size};
use crate::ids::SectionId;

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    /// Events in the order the host observed them.
    #[serde(default)]
    pub events: Vec<PageEvent>,
}

impl Inputs {
    pub fn new(events: Vec<PageEvent>) -> Self {
        Self { events }
    }
}

/// Layer speeds read from the hero section at scroll time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroSnapshot {
    /// One entry per layer; `None` where the speed attribute is missing or unusable.
    #[serde(default)]
    pub layer_speeds: Vec<Option<f32>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PageEvent {
    Scroll {
        scroll_y: f64,
        window_height: f64,
        /// `None` when the hero section is absent from the page.
        #[serde(default)]
        hero: Option<HeroSnapshot>,
        /// Current box of the animation section, if it exists.
        #[serde(default)]
        section: Option<SectionBox>,
    },
    Resize {
        canvas: Size,
    },
    FrameLoaded {
        index: usize,
        width: f64,
        height: f64,
    },
    FrameFailed {
        index: usize,
    },
    Intersection {
        section: SectionId,
        intersecting: bool,
        ratio: f32,
        /// Visible height over viewport height. Lets sections taller than
        /// the viewport reveal even though their own ratio stays small.
        #[serde(default)]
        viewport_coverage: Option<f32>,
    },
}

//! Reveal-on-intersection for content sections.
//!
//! Sections start hidden (transparent, shifted down) and are revealed the
//! first time enough of them scrolls into view. Two kinds carry follow-up
//! animations driven by [`RevealObserver::tick`]:
//! - skills: markers fade in one after another, `stagger_step_ms` apart;
//! - achievements: stat counters count up to their targets.
//!
//! Once triggered a section is unobserved unless `rearm_after_trigger` is
//! set; even then its follow-up animations never restart.

pub mod counter;
pub mod stagger;

pub use counter::CounterTween;
pub use stagger::StaggerSchedule;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::RevealCfg;
use crate::ids::{IdAllocator, SectionId};
use crate::outputs::Change;

/// Browsers report the crossing ratio with some rounding.
const RATIO_EPSILON: f32 = 1e-3;

/// What a content section does beyond fading in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SectionKind {
    Plain,
    Skills { markers: usize },
    Achievements { targets: Vec<u32> },
}

#[derive(Debug)]
struct SectionState {
    id: SectionId,
    kind: SectionKind,
    observed: bool,
    triggered_at: Option<f64>,
    stagger: Option<StaggerSchedule>,
    counters: Vec<CounterTween>,
}

#[derive(Debug)]
pub struct RevealObserver {
    cfg: RevealCfg,
    ids: IdAllocator,
    sections: Vec<SectionState>,
}

impl RevealObserver {
    pub fn new(cfg: &RevealCfg) -> Self {
        Self {
            cfg: cfg.clone(),
            ids: IdAllocator::new(),
            sections: Vec::new(),
        }
    }

    /// Start observing a section.
    pub fn observe(&mut self, kind: SectionKind) -> SectionId {
        let id = self.ids.alloc_section();
        self.sections.push(SectionState {
            id,
            kind,
            observed: true,
            triggered_at: None,
            stagger: None,
            counters: Vec::new(),
        });
        id
    }

    /// Hidden starting style for every observed section.
    pub fn initial_styles(&self) -> Vec<Change> {
        self.sections
            .iter()
            .map(|s| Change::SectionStyle {
                section: s.id,
                opacity: 0.0,
                translate_y: self.cfg.hidden_offset_px,
                transition: Some(self.cfg.transition.clone()),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn is_observed(&self, id: SectionId) -> bool {
        self.section(id).is_some_and(|s| s.observed)
    }

    pub fn is_triggered(&self, id: SectionId) -> bool {
        self.section(id).is_some_and(|s| s.triggered_at.is_some())
    }

    /// Handle an intersection report. Returns `true` if the section was revealed.
    ///
    /// A section counts as visible once `threshold` of it is in view, or,
    /// for sections taller than the viewport, once its visible part covers
    /// `threshold` of the viewport (`viewport_coverage`).
    pub fn on_intersection(
        &mut self,
        id: SectionId,
        intersecting: bool,
        ratio: f32,
        viewport_coverage: Option<f32>,
        now_ms: f64,
        out: &mut Vec<Change>,
    ) -> bool {
        let threshold = self.cfg.threshold;
        let Some(state) = self.sections.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        let reaches = |v: f32| v + RATIO_EPSILON >= threshold;
        let visible = reaches(ratio) || viewport_coverage.is_some_and(reaches);
        if !state.observed || !intersecting || !visible {
            return false;
        }

        out.push(Change::SectionRevealed {
            section: id,
            class: self.cfg.visible_class.clone(),
        });
        out.push(Change::SectionStyle {
            section: id,
            opacity: 1.0,
            translate_y: 0.0,
            transition: None,
        });

        if state.triggered_at.is_none() {
            debug!("section {} revealed at {now_ms}ms", id.0);
            state.triggered_at = Some(now_ms);
            match &state.kind {
                SectionKind::Plain => {}
                SectionKind::Skills { markers } => {
                    state.stagger = Some(StaggerSchedule::new(
                        now_ms,
                        *markers,
                        self.cfg.stagger_step_ms,
                    ));
                }
                SectionKind::Achievements { targets } => {
                    state.counters = targets
                        .iter()
                        .map(|t| {
                            CounterTween::new(
                                *t,
                                self.cfg.counter_duration_ms,
                                self.cfg.counter_tick_ms,
                                &self.cfg.counter_suffix,
                            )
                        })
                        .collect();
                }
            }
        }

        if !self.cfg.rearm_after_trigger {
            state.observed = false;
            out.push(Change::SectionUnobserved { section: id });
        }
        true
    }

    /// Release due markers and advance every running counter by one frame.
    pub fn tick(&mut self, now_ms: f64, out: &mut Vec<Change>) {
        for state in &mut self.sections {
            if let Some(stagger) = state.stagger.as_mut() {
                for marker in stagger.due(now_ms) {
                    out.push(Change::MarkerRevealed {
                        section: state.id,
                        marker,
                    });
                }
            }
            for (counter, tween) in state.counters.iter_mut().enumerate() {
                if let Some(text) = tween.step() {
                    out.push(Change::CounterText {
                        section: state.id,
                        counter,
                        text,
                    });
                }
            }
        }
    }

    /// True while any stagger or counter still has work to do.
    pub fn is_animating(&self) -> bool {
        self.sections.iter().any(|s| {
            s.stagger.as_ref().is_some_and(|st| !st.is_finished())
                || s.counters.iter().any(|c| !c.is_done())
        })
    }

    fn section(&self, id: SectionId) -> Option<&SectionState> {
        self.sections.iter().find(|s| s.id == id)
    }
}

//! filmreel core (engine-agnostic)
//!
//! Scroll-driven page effects without any browser types: a hero parallax, a
//! scroll-scrubbed frame player that plans canvas draws, and a reveal
//! observer with staggered markers and numeric counters. Adapters (wasm)
//! feed host events in through [`PageController::update`] and apply the
//! returned [`Outputs`] to the page.

pub mod config;
pub mod error;
pub mod frames;
pub mod geometry;
pub mod ids;
pub mod inputs;
pub mod mapping;
pub mod outputs;
pub mod page;
pub mod parallax;
pub mod player;
pub mod render;
pub mod reveal;

// Re-exports for consumers (adapters)
pub use config::{Config, ParallaxCfg, RenderCfg, RevealCfg, Selectors};
pub use error::PageError;
pub use frames::{frame_url, Frame, FrameRef, FrameSet, LoadState, SequenceCfg};
pub use geometry::{backing_store_size, contain_rect, DrawRect, SectionBox, Size};
pub use ids::SectionId;
pub use inputs::{HeroSnapshot, Inputs, PageEvent};
pub use mapping::{frame_for_scroll, scroll_progress, target_frame};
pub use outputs::{Change, CoreEvent, Outputs};
pub use page::{MountInfo, PageController};
pub use parallax::{hero_in_view, parse_speed, Parallax, ParallaxFrame};
pub use player::{Cursor, FramePlayer};
pub use render::{DrawPlan, FrameSurface};
pub use reveal::{CounterTween, RevealObserver, SectionKind, StaggerSchedule};

//! Frame sequences and their load state.
//!
//! Model:
//! - Each sequence is a numbered run of images at a templated path.
//! - All sequences are concatenated into one global index space, in
//!   declaration order, so sequence 2 frame 0 follows the last frame of
//!   sequence 1.
//! - A frame starts `Pending` and settles exactly once, to `Loaded` (with
//!   its intrinsic size) or `Failed`. Nothing is ever retried.

use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::geometry::Size;

/// One image sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceCfg {
    pub name: String,
    /// Path with `{index}` (zero-padded, three digits) and optionally `{sequence}`.
    pub path_template: String,
    pub count: usize,
}

impl SequenceCfg {
    pub fn new(name: &str, path_template: &str, count: usize) -> Self {
        Self {
            name: name.to_string(),
            path_template: path_template.to_string(),
            count,
        }
    }
}

/// Expand a path template for one frame.
///
/// `sequence` is 1-based, matching the resource directory names.
pub fn frame_url(template: &str, sequence: usize, index: usize) -> String {
    template
        .replace("{sequence}", &sequence.to_string())
        .replace("{index}", &format!("{index:03}"))
}

/// Position of a frame inside its own sequence.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameRef {
    /// 0-based sequence position.
    pub sequence: usize,
    pub index: usize,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded {
        width: f64,
        height: f64,
    },
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub at: FrameRef,
    pub url: String,
    pub state: LoadState,
}

impl Frame {
    /// Intrinsic size, available only once loaded.
    pub fn size(&self) -> Option<Size> {
        match self.state {
            LoadState::Loaded { width, height } => Some(Size::new(width, height)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded { .. })
    }
}

/// Every frame of every sequence, in draw order.
#[derive(Clone, Debug, Default)]
pub struct FrameSet {
    frames: Vec<Frame>,
    loaded: usize,
    failed: usize,
}

impl FrameSet {
    pub fn new(sequences: &[SequenceCfg]) -> Self {
        let total = sequences.iter().map(|s| s.count).sum();
        let mut frames = Vec::with_capacity(total);
        for (seq_pos, seq) in sequences.iter().enumerate() {
            for index in 0..seq.count {
                frames.push(Frame {
                    at: FrameRef {
                        sequence: seq_pos,
                        index,
                    },
                    url: frame_url(&seq.path_template, seq_pos + 1, index),
                    state: LoadState::Pending,
                });
            }
        }
        Self {
            frames,
            loaded: 0,
            failed: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Image URLs in request order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|f| f.url.as_str())
    }

    pub fn frame_ref(&self, index: usize) -> Option<FrameRef> {
        self.frames.get(index).map(|f| f.at)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    pub fn pending_count(&self) -> usize {
        self.frames.len() - self.loaded - self.failed
    }

    /// Record a successful load. Returns `false` if the frame had already settled.
    pub fn mark_loaded(&mut self, index: usize, size: Size) -> Result<bool, PageError> {
        let frame = self.frame_mut(index)?;
        if frame.state != LoadState::Pending {
            return Ok(false);
        }
        frame.state = LoadState::Loaded {
            width: size.width,
            height: size.height,
        };
        self.loaded += 1;
        Ok(true)
    }

    /// Record a failed load. Returns `false` if the frame had already settled.
    pub fn mark_failed(&mut self, index: usize) -> Result<bool, PageError> {
        let frame = self.frame_mut(index)?;
        if frame.state != LoadState::Pending {
            return Ok(false);
        }
        frame.state = LoadState::Failed;
        self.failed += 1;
        Ok(true)
    }

    fn frame_mut(&mut self, index: usize) -> Result<&mut Frame, PageError> {
        let total = self.frames.len();
        self.frames
            .get_mut(index)
            .ok_or(PageError::FrameOutOfRange { index, total })
    }
}

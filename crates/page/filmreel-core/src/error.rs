//! Error types for filmreel-core

use serde::{Deserialize, Serialize};

/// Everything that can go wrong while wiring or driving the page effects.
///
/// None of these reach the visitor: adapters log them and the affected
/// effect simply does not happen.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PageError {
    /// A DOM collaborator the effect depends on is absent
    #[error("Missing element: {what}")]
    MissingElement { what: String },

    /// The canvas exists but no 2D context could be obtained
    #[error("Missing rendering context: {what}")]
    MissingContext { what: String },

    /// Configuration failed validation
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// A frame index outside the preloaded set
    #[error("Frame {index} is out of range (total {total})")]
    FrameOutOfRange { index: usize, total: usize },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// The drawing surface rejected an operation
    #[error("Surface error: {reason}")]
    Surface { reason: String },
}

impl PageError {
    pub fn missing_element(what: impl Into<String>) -> Self {
        Self::MissingElement { what: what.into() }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub fn surface(reason: impl Into<String>) -> Self {
        Self::Surface {
            reason: reason.into(),
        }
    }

    /// Fatal errors abort construction; everything else only disables one effect.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. } | Self::Serialization { .. })
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingElement { .. } | Self::MissingContext { .. } => "dom",
            Self::InvalidConfig { .. } => "config",
            Self::FrameOutOfRange { .. } => "frames",
            Self::Serialization { .. } => "serialization",
            Self::Surface { .. } => "render",
        }
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

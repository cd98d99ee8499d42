//! Error types for the overlay engine
//!
//! Only construction-time misuse is an error. Everything that happens once
//! an overlay exists (listener failures, form validation, vetoed
//! transitions) is handled inside the engine and never surfaces as `Err`.

use rpt_view::NodeId;

/// Errors returned synchronously to the caller
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    /// The configuration has no id.
    #[error("overlay id must not be empty")]
    MissingId,

    /// Another overlay in the same coordinator already uses this id.
    #[error("overlay id already in use: {0}")]
    DuplicateId(String),

    /// The mount target is not a live element.
    #[error("mount target {0:?} is not an element")]
    InvalidMount(NodeId),

    /// No overlay with this id is registered with the coordinator.
    #[error("unknown overlay: {0}")]
    UnknownOverlay(String),

    /// Options could not be decoded.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for OverlayError {
    fn from(e: serde_json::Error) -> Self {
        OverlayError::InvalidOptions(e.to_string())
    }
}

/// Result alias for fallible overlay operations
pub type Result<T> = std::result::Result<T, OverlayError>;

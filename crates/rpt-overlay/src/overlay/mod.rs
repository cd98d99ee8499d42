//! Overlay model
//!
//! An overlay is one floating surface: its configuration, lifecycle state,
//! view tree, event listeners and the input controllers bound to it.

mod config;
mod event;
mod form;
#[allow(clippy::module_inception)]
mod overlay;
mod state;

use serde::{Deserialize, Serialize};

pub use config::{
    Callbacks, OverlayConfig, OverlayOptions, OverlayPatch, Position, ResizeEdge, Role, Theme,
    TOP_RIGHT_MARGIN,
};
pub use event::{
    callback, Callback, CloseReason, EventDetail, EventKind, ListenerError, ListenerResult,
    OverlayEvent, SubscriptionId,
};
pub use form::{FormId, FormOptions, SubmitFuture, SubmitHandler, Validator};
pub use overlay::Overlay;
pub use state::OverlayState;

/// Unique overlay identifier within one coordinator
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(String);

impl OverlayId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OverlayId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OverlayId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

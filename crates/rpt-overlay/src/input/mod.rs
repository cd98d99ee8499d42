//! Input handling for overlays
//!
//! Hosts report every event as `(ListenerId, Input)`. The listener id is
//! mapped back to a [`Route`] that says what the event means for the overlay
//! that installed it.

mod drag;
mod focus;
mod resize;
mod wiring;

use serde::Serialize;

pub use drag::{clamp_to_viewport, DragController};
pub use focus::{next_focus, FocusTrap};
pub use resize::{calculate_resize, ResizeController, MIN_HEIGHT, MIN_WIDTH};

pub(crate) use wiring::{Route, Wiring};

/// Result of input handling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputResult {
    /// Input was consumed; the host should suppress default and propagation
    Handled,
    /// Input was not handled (pass through)
    Unhandled,
}

impl InputResult {
    /// Check if input was handled
    #[inline]
    pub fn is_handled(&self) -> bool {
        matches!(self, InputResult::Handled)
    }

    pub(crate) fn from_bool(handled: bool) -> Self {
        if handled {
            InputResult::Handled
        } else {
            InputResult::Unhandled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_result() {
        assert!(InputResult::Handled.is_handled());
        assert!(!InputResult::Unhandled.is_handled());
        assert_eq!(InputResult::from_bool(true), InputResult::Handled);

        let json = serde_json::to_string(&InputResult::Unhandled).unwrap();
        assert_eq!(json, r#"{"type":"unhandled"}"#);
    }
}

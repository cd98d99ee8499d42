//! Overlay lifecycle state

use super::event::CloseReason;
use crate::transition::Transition;

/// Lifecycle state of an overlay
///
/// ```text
/// Closed -> Opening -> Open -> Closing -> Closed
///              \________________^
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum OverlayState {
    #[default]
    Closed,
    Opening(Transition),
    Open,
    Closing {
        transition: Transition,
        reason: CloseReason,
    },
}

impl OverlayState {
    /// True while opening or open
    pub fn is_open(&self) -> bool {
        matches!(self, OverlayState::Opening(_) | OverlayState::Open)
    }

    /// True while a transition is in flight
    pub fn is_animating(&self) -> bool {
        matches!(self, OverlayState::Opening(_) | OverlayState::Closing { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, OverlayState::Closed)
    }

    /// The view is mounted in every state except `Closed`
    pub fn is_mounted(&self) -> bool {
        !self.is_closed()
    }

    /// The in-flight transition, while opening or closing
    pub fn transition(&self) -> Option<&Transition> {
        match self {
            OverlayState::Opening(t) | OverlayState::Closing { transition: t, .. } => Some(t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayState::Closed => "closed",
            OverlayState::Opening(_) => "opening",
            OverlayState::Open => "open",
            OverlayState::Closing { .. } => "closing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        let opening = OverlayState::Opening(Transition::new(0.0, 200.0));
        assert!(opening.is_open() && opening.is_animating());
        assert_eq!(opening.transition().map(Transition::due_ms), Some(200.0));

        assert!(OverlayState::Open.is_open());
        assert!(!OverlayState::Open.is_animating());

        let closing = OverlayState::Closing {
            transition: Transition::new(10.0, 100.0),
            reason: CloseReason::Esc,
        };
        assert!(!closing.is_open() && closing.is_animating() && closing.is_mounted());
        assert_eq!(closing.transition().map(Transition::due_ms), Some(110.0));
        assert_eq!(OverlayState::Open.transition(), None);

        assert!(!OverlayState::Closed.is_mounted());
        assert_eq!(OverlayState::default().as_str(), "closed");
    }
}

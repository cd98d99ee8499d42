//! Timed transitions for overlay open/close and feedback effects
//!
//! Time is injected: every transition records the `now_ms` it started at and
//! is checked against the `now_ms` passed to `Coordinator::tick`, so tests
//! advance virtual time instead of waiting on real timers.

use serde::{Deserialize, Serialize};

/// Default open/close animation duration in milliseconds
pub const DEFAULT_DURATION_MS: f64 = 200.0;

/// How long the invalid-input shake stays applied
pub const SHAKE_DURATION_MS: f64 = 400.0;

/// Visual style of the open/close transition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Animation {
    /// No animation; transitions still complete on the next tick
    None,
    #[default]
    Fade,
    Scale,
    Slide,
}

impl Animation {
    /// All animated variants, for clearing classes
    pub const ANIMATED: [Animation; 3] = [Animation::Fade, Animation::Scale, Animation::Slide];

    /// CSS class carrying the animation on the overlay root
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            Animation::None => None,
            Animation::Fade => Some("rpt-anim-fade"),
            Animation::Scale => Some("rpt-anim-scale"),
            Animation::Slide => Some("rpt-anim-slide"),
        }
    }
}

/// A fixed-duration transition started at a known time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Start time (ms timestamp)
    pub start_ms: f64,
    /// Duration (ms)
    pub duration_ms: f64,
}

impl Transition {
    /// Create a transition; negative durations count as zero
    pub fn new(start_ms: f64, duration_ms: f64) -> Self {
        Self {
            start_ms,
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// Time at which the transition completes
    #[inline]
    pub fn due_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    /// Check if transition is complete
    #[inline]
    pub fn is_complete(&self, now_ms: f64) -> bool {
        now_ms >= self.due_ms()
    }
}

//! Overlay coordination for the report client
//!
//! This crate manages the floating surfaces of the report editor: dialogs,
//! confirmations and popups that can be modal or non-modal, draggable,
//! resizable, focus-trapped and stacked in a deterministic order.
//!
//! ## Architecture
//!
//! - [`overlay`]: Overlay configuration, lifecycle state, events and forms
//! - [`coordinator`]: Registry, stacking, Escape routing and scroll lock
//! - [`input`]: Drag, resize and focus-trap controllers
//! - [`view`]: The node tree each overlay owns
//! - [`transition`]: Timed open/close transitions
//! - [`presets`]: Confirm and alert dialogs returning futures
//!
//! ## Example
//!
//! ```rust
//! use rpt_overlay::{CloseReason, Coordinator, OverlayConfig, OverlayState};
//! use rpt_view_mock::HeadlessHost;
//!
//! let mut coordinator = Coordinator::new(HeadlessHost::new());
//! let id = coordinator
//!     .create(OverlayConfig {
//!         title: "Settings".into(),
//!         ..OverlayConfig::new("settings")
//!     })
//!     .unwrap();
//!
//! coordinator.open(&id, 0.0);
//! coordinator.tick(200.0);
//! assert_eq!(coordinator.get(&id).unwrap().state(), &OverlayState::Open);
//! assert!(coordinator.any_modal_open());
//!
//! coordinator.close(&id, CloseReason::CloseButton, 300.0);
//! coordinator.tick(500.0);
//! assert!(coordinator.stack().is_empty());
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All state lives here; the host only renders and reports input
//! 2. **Injected Time**: Operations take `now_ms` and `tick` completes transitions
//! 3. **Explicit Registry**: One [`Coordinator`] is created and passed around, never global
//! 4. **Narrow Host Seam**: Everything visual goes through [`rpt_view::ViewHost`]

pub mod coordinator;
pub mod error;
pub mod input;
pub mod overlay;
pub mod presets;
pub mod transition;
pub mod view;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::*;

// Re-export core types for convenience
pub use rpt_view::{Input, Key, ListenerId, NodeId, Rect, Size, Vec2, ViewHost};

pub use coordinator::{Coordinator, OverlayMut, ScrollLock, DEFAULT_BASE_Z};
pub use error::{OverlayError, Result};
pub use input::{
    calculate_resize, clamp_to_viewport, next_focus, InputResult, MIN_HEIGHT, MIN_WIDTH,
};
pub use overlay::{
    callback, Callbacks, CloseReason, EventDetail, EventKind, FormId, FormOptions, ListenerError,
    ListenerResult, Overlay, OverlayConfig, OverlayEvent, OverlayId, OverlayOptions, OverlayPatch,
    OverlayState, Position, ResizeEdge, Role, SubscriptionId, Theme,
};
pub use presets::{alert, confirm, Acknowledgement, AlertOptions, Confirmation, ConfirmOptions};
pub use transition::{Animation, Transition, DEFAULT_DURATION_MS, SHAKE_DURATION_MS};
pub use view::{OverlayView, SlotContent};

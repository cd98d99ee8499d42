//! Overlay events and listener dispatch

use std::rc::Rc;

use rpt_view::{Size, Vec2};
use serde::{Deserialize, Serialize};

use super::config::{Callbacks, ResizeEdge};
use super::OverlayId;

/// Error a listener may return; logged, never propagated
pub type ListenerError = Box<dyn std::error::Error>;

/// Listener return type
pub type ListenerResult = Result<(), ListenerError>;

/// Shared listener callback
pub type Callback = Rc<dyn Fn(&mut OverlayEvent) -> ListenerResult>;

/// Wrap a closure as a [`Callback`]
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&mut OverlayEvent) -> ListenerResult + 'static,
{
    Rc::new(f)
}

/// Events an overlay emits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    BeforeOpen,
    Open,
    BeforeClose,
    Close,
    Esc,
    Backdrop,
    DragStart,
    Drag,
    DragEnd,
    ResizeStart,
    Resize,
    ResizeEnd,
}

impl EventKind {
    pub const ALL: [EventKind; 12] = [
        EventKind::BeforeOpen,
        EventKind::Open,
        EventKind::BeforeClose,
        EventKind::Close,
        EventKind::Esc,
        EventKind::Backdrop,
        EventKind::DragStart,
        EventKind::Drag,
        EventKind::DragEnd,
        EventKind::ResizeStart,
        EventKind::Resize,
        EventKind::ResizeEnd,
    ];

    /// Event name as exposed to script callers
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::BeforeOpen => "beforeOpen",
            EventKind::Open => "open",
            EventKind::BeforeClose => "beforeClose",
            EventKind::Close => "close",
            EventKind::Esc => "esc",
            EventKind::Backdrop => "backdrop",
            EventKind::DragStart => "dragStart",
            EventKind::Drag => "drag",
            EventKind::DragEnd => "dragEnd",
            EventKind::ResizeStart => "resizeStart",
            EventKind::Resize => "resize",
            EventKind::ResizeEnd => "resizeEnd",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Whether a listener can veto the default action
    pub fn is_cancelable(self) -> bool {
        matches!(
            self,
            EventKind::BeforeOpen | EventKind::BeforeClose | EventKind::Esc | EventKind::Backdrop
        )
    }
}

/// Why an overlay closed
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CloseReason {
    Esc,
    Backdrop,
    CloseButton,
    Submit,
    Toggle,
    Destroy,
    Confirmed,
    Cancel,
    Ok,
    /// Caller-supplied reason
    Custom(String),
}

impl CloseReason {
    pub fn as_str(&self) -> &str {
        match self {
            CloseReason::Esc => "esc",
            CloseReason::Backdrop => "backdrop",
            CloseReason::CloseButton => "close-button",
            CloseReason::Submit => "submit",
            CloseReason::Toggle => "toggle",
            CloseReason::Destroy => "destroy",
            CloseReason::Confirmed => "confirmed",
            CloseReason::Cancel => "cancel",
            CloseReason::Ok => "ok",
            CloseReason::Custom(s) => s,
        }
    }

    /// Parse a reason name; unknown names become `Custom`
    pub fn parse(name: &str) -> Self {
        match name {
            "esc" => CloseReason::Esc,
            "backdrop" => CloseReason::Backdrop,
            "close-button" => CloseReason::CloseButton,
            "submit" => CloseReason::Submit,
            "toggle" => CloseReason::Toggle,
            "destroy" => CloseReason::Destroy,
            "confirmed" | "confirm" => CloseReason::Confirmed,
            "cancel" => CloseReason::Cancel,
            "ok" => CloseReason::Ok,
            other => CloseReason::Custom(other.to_string()),
        }
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by an event
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventDetail {
    None,
    Reason { reason: CloseReason },
    Position { x: f32, y: f32 },
    Resize { edge: ResizeEdge, width: f32, height: f32 },
}

impl EventDetail {
    pub fn reason(reason: CloseReason) -> Self {
        EventDetail::Reason { reason }
    }

    pub fn position(pos: Vec2) -> Self {
        EventDetail::Position { x: pos.x, y: pos.y }
    }

    pub fn resize(edge: ResizeEdge, size: Size) -> Self {
        EventDetail::Resize {
            edge,
            width: size.width,
            height: size.height,
        }
    }
}

/// Event record handed to listeners
#[derive(Clone, Debug)]
pub struct OverlayEvent {
    overlay: OverlayId,
    kind: EventKind,
    detail: EventDetail,
    prevented: bool,
}

impl OverlayEvent {
    pub fn new(overlay: OverlayId, kind: EventKind, detail: EventDetail) -> Self {
        Self {
            overlay,
            kind,
            detail,
            prevented: false,
        }
    }

    pub fn overlay(&self) -> &OverlayId {
        &self.overlay
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn detail(&self) -> &EventDetail {
        &self.detail
    }

    /// Close reason, for `BeforeClose` and `Close`
    pub fn reason(&self) -> Option<&CloseReason> {
        match &self.detail {
            EventDetail::Reason { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn is_cancelable(&self) -> bool {
        self.kind.is_cancelable()
    }

    /// Veto the default action; ignored on non-cancelable events
    pub fn prevent_default(&mut self) {
        if self.is_cancelable() {
            self.prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.prevented
    }
}

/// Handle returned by `add_event_listener`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    callback: Callback,
}

/// Ordered listener registry; insertion order is dispatch order
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<Subscription>,
}

impl Listeners {
    pub fn add(&mut self, kind: EventKind, callback: Callback) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push(Subscription { id, kind, callback });
        id
    }

    pub fn remove(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| !(s.id == id && s.kind == kind));
        self.entries.len() != before
    }

    /// Snapshot of callbacks for `kind`, so listeners may subscribe during dispatch
    pub fn for_kind(&self, kind: EventKind) -> Vec<Callback> {
        self.entries
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.callback.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Run every listener for the event, then the option callback
///
/// A failing listener never stops the ones after it.
pub(crate) fn dispatch(
    mut event: OverlayEvent,
    listeners: &Listeners,
    callbacks: &Callbacks,
    debug: bool,
) -> OverlayEvent {
    let mut targets = listeners.for_kind(event.kind);
    if let Some(cb) = callbacks.get(event.kind) {
        targets.push(cb.clone());
    }

    for cb in targets {
        if let Err(err) = cb(&mut event) {
            if debug {
                tracing::warn!(
                    overlay = %event.overlay,
                    event = event.kind.as_str(),
                    error = %err,
                    "overlay listener failed"
                );
            }
        }
    }

    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn event(kind: EventKind) -> OverlayEvent {
        OverlayEvent::new(OverlayId::new("dlg"), kind, EventDetail::None)
    }

    #[test]
    fn test_event_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::parse("nope"), None);
    }

    #[test]
    fn test_prevent_default_only_on_cancelable() {
        let mut ev = event(EventKind::Open);
        ev.prevent_default();
        assert!(!ev.default_prevented());

        let mut ev = event(EventKind::BeforeClose);
        ev.prevent_default();
        assert!(ev.default_prevented());
    }

    #[test]
    fn test_close_reason_parse() {
        assert_eq!(CloseReason::parse("esc"), CloseReason::Esc);
        assert_eq!(CloseReason::parse("confirm"), CloseReason::Confirmed);
        assert_eq!(
            CloseReason::parse("saved"),
            CloseReason::Custom("saved".to_string())
        );
        assert_eq!(CloseReason::CloseButton.to_string(), "close-button");
    }

    #[test]
    fn test_close_reason_names_round_trip() {
        let named = [
            CloseReason::Esc,
            CloseReason::Backdrop,
            CloseReason::CloseButton,
            CloseReason::Submit,
            CloseReason::Toggle,
            CloseReason::Destroy,
            CloseReason::Confirmed,
            CloseReason::Cancel,
            CloseReason::Ok,
        ];
        for reason in named {
            assert_eq!(CloseReason::parse(reason.as_str()), reason);
        }
        assert_eq!(CloseReason::Confirmed.as_str(), "confirmed");
        assert_eq!(CloseReason::parse("confirmed"), CloseReason::Confirmed);
    }

    #[test]
    fn test_dispatch_order_and_isolation() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();

        let l = log.clone();
        listeners.add(
            EventKind::BeforeClose,
            callback(move |_| {
                l.borrow_mut().push("first");
                Err("boom".into())
            }),
        );
        let l = log.clone();
        listeners.add(
            EventKind::BeforeClose,
            callback(move |ev| {
                l.borrow_mut().push("second");
                ev.prevent_default();
                Ok(())
            }),
        );
        let l = log.clone();
        let callbacks = Callbacks {
            on_before_close: Some(callback(move |_| {
                l.borrow_mut().push("option");
                Ok(())
            })),
            ..Default::default()
        };

        let ev = dispatch(event(EventKind::BeforeClose), &listeners, &callbacks, true);
        assert!(ev.default_prevented());
        assert_eq!(*log.borrow(), vec!["first", "second", "option"]);
    }

    #[test]
    fn test_remove_listener() {
        let mut listeners = Listeners::default();
        let id = listeners.add(EventKind::Open, callback(|_| Ok(())));
        assert!(!listeners.remove(EventKind::Close, id));
        assert!(listeners.remove(EventKind::Open, id));
        assert!(!listeners.remove(EventKind::Open, id));
        assert_eq!(listeners.len(), 0);
    }
}

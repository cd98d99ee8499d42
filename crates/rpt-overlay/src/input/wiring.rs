//! Host listeners owned by an overlay

use std::collections::BTreeMap;

use rpt_view::{ListenerId, ListenerKind, NodeId, ViewHost};

use crate::overlay::{CloseReason, FormId, ResizeEdge};

/// What a host event means to the overlay that installed the listener
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Route {
    Backdrop,
    CloseButton,
    /// Action control that closes with a fixed reason
    Action(CloseReason),
    DragStart,
    DragMove,
    DragEnd,
    ResizeStart(ResizeEdge),
    ResizeMove,
    ResizeEnd,
    FocusTrap,
    Submit(FormId),
}

/// Every host listener an overlay has installed, keyed by listener id
///
/// Destroying an overlay calls [`Wiring::detach_all`], so nothing it
/// installed outlives it.
#[derive(Debug, Default)]
pub(crate) struct Wiring {
    routes: BTreeMap<ListenerId, Route>,
}

impl Wiring {
    pub fn listen<H: ViewHost>(
        &mut self,
        host: &mut H,
        node: NodeId,
        kind: ListenerKind,
        route: Route,
    ) -> ListenerId {
        let id = host.add_listener(node, kind);
        self.routes.insert(id, route);
        id
    }

    pub fn unlisten<H: ViewHost>(&mut self, host: &mut H, id: ListenerId) {
        if self.routes.remove(&id).is_some() {
            host.remove_listener(id);
        }
    }

    pub fn route(&self, id: ListenerId) -> Option<&Route> {
        self.routes.get(&id)
    }

    pub fn detach_all<H: ViewHost>(&mut self, host: &mut H) {
        for id in std::mem::take(&mut self.routes).into_keys() {
            host.remove_listener(id);
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }
}

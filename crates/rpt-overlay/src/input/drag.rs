//! Drag controller
//!
//! Pointer-down on the handle starts a session; move and up listeners live
//! on the document only while the session is active.

use rpt_view::{ListenerId, ListenerKind, NodeId, Size, Vec2, ViewHost};

use super::wiring::{Route, Wiring};

/// Clamp a top-left corner so the panel stays inside the viewport
///
/// When the panel is larger than the viewport the lower bound wins and the
/// panel pins to the origin.
pub fn clamp_to_viewport(pos: Vec2, panel: Size, viewport: Size) -> Vec2 {
    let max = Vec2::new(viewport.width - panel.width, viewport.height - panel.height);
    pos.clamp(Vec2::ZERO, max)
}

#[derive(Clone, Debug)]
struct DragSession {
    /// Offset from panel origin to pointer
    offset: Vec2,
    move_listener: ListenerId,
    up_listener: ListenerId,
}

#[derive(Debug, Default)]
pub struct DragController {
    handle: Option<NodeId>,
    start_listener: Option<ListenerId>,
    session: Option<DragSession>,
}

impl DragController {
    /// Node that starts a drag, if bound
    pub fn handle(&self) -> Option<NodeId> {
        self.handle
    }

    pub fn is_bound(&self) -> bool {
        self.start_listener.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub(crate) fn bind<H: ViewHost>(&mut self, host: &mut H, wiring: &mut Wiring, handle: NodeId) {
        self.unbind(host, wiring);
        let listener = wiring.listen(host, handle, ListenerKind::PointerDown, Route::DragStart);
        self.handle = Some(handle);
        self.start_listener = Some(listener);
    }

    pub(crate) fn unbind<H: ViewHost>(&mut self, host: &mut H, wiring: &mut Wiring) {
        self.end(host, wiring);
        if let Some(listener) = self.start_listener.take() {
            wiring.unlisten(host, listener);
        }
        self.handle = None;
    }

    /// Start a session at `pointer`; returns the panel's current top-left
    pub(crate) fn begin<H: ViewHost>(
        &mut self,
        host: &mut H,
        wiring: &mut Wiring,
        panel: NodeId,
        pointer: Vec2,
    ) -> Vec2 {
        self.end(host, wiring);

        let origin = host.measure(panel).position();
        host.set_style(panel, "position", Some("fixed"));
        host.set_style(panel, "margin", Some("0"));
        host.set_position(panel, origin);

        let document = host.document();
        let move_listener = wiring.listen(host, document, ListenerKind::PointerMove, Route::DragMove);
        let up_listener = wiring.listen(host, document, ListenerKind::PointerUp, Route::DragEnd);
        self.session = Some(DragSession {
            offset: pointer - origin,
            move_listener,
            up_listener,
        });
        origin
    }

    /// Follow the pointer; returns the applied top-left, or `None` if idle
    pub(crate) fn update<H: ViewHost>(
        &self,
        host: &mut H,
        panel: NodeId,
        pointer: Vec2,
        keep_in_viewport: bool,
    ) -> Option<Vec2> {
        let session = self.session.as_ref()?;
        let mut pos = pointer - session.offset;
        if keep_in_viewport {
            pos = clamp_to_viewport(pos, host.measure(panel).size(), host.viewport());
        }
        host.set_position(panel, pos);
        Some(pos)
    }

    /// End the session; returns whether one was active
    pub(crate) fn end<H: ViewHost>(&mut self, host: &mut H, wiring: &mut Wiring) -> bool {
        match self.session.take() {
            Some(session) => {
                wiring.unlisten(host, session.move_listener);
                wiring.unlisten(host, session.up_listener);
                true
            }
            None => false,
        }
    }
}

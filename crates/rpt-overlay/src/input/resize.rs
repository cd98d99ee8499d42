//! Resize controller

use rpt_view::{ListenerId, ListenerKind, NodeId, Rect, Size, Vec2, ViewHost};

use super::wiring::{Route, Wiring};
use crate::overlay::ResizeEdge;
use crate::view::OverlayView;

/// Minimum panel width while resizing
pub const MIN_WIDTH: f32 = 240.0;
/// Minimum panel height while resizing
pub const MIN_HEIGHT: f32 = 160.0;

const MIN_SIZE: Size = Size::new(MIN_WIDTH, MIN_HEIGHT);

/// Calculate the new size after dragging `edge` by `delta`
///
/// Both dimensions are floored at the minimum, including the one the edge
/// does not move.
pub fn calculate_resize(edge: ResizeEdge, start_size: Size, delta: Vec2) -> Size {
    let mut size = start_size;
    if edge.affects_width() {
        size.width = start_size.width + delta.x;
    }
    if edge.affects_height() {
        size.height = start_size.height + delta.y;
    }
    size.at_least(MIN_SIZE)
}

#[derive(Clone, Debug)]
struct ResizeSession {
    edge: ResizeEdge,
    start_rect: Rect,
    start_pointer: Vec2,
    move_listener: ListenerId,
    up_listener: ListenerId,
}

#[derive(Debug, Default)]
pub struct ResizeController {
    handles: Vec<(ResizeEdge, ListenerId)>,
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn is_bound(&self) -> bool {
        !self.handles.is_empty()
    }

    pub fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    /// Install a start listener on the handle of every edge in `edges`
    pub(crate) fn bind<H: ViewHost>(
        &mut self,
        host: &mut H,
        wiring: &mut Wiring,
        view: &OverlayView,
        edges: &[ResizeEdge],
    ) {
        self.unbind(host, wiring);
        for edge in ResizeEdge::ALL {
            if !edges.contains(&edge) {
                continue;
            }
            if let Some(handle) = view.handle(edge) {
                let listener =
                    wiring.listen(host, handle, ListenerKind::PointerDown, Route::ResizeStart(edge));
                self.handles.push((edge, listener));
            }
        }
    }

    pub(crate) fn unbind<H: ViewHost>(&mut self, host: &mut H, wiring: &mut Wiring) {
        self.end(host, wiring);
        for (_, listener) in self.handles.drain(..) {
            wiring.unlisten(host, listener);
        }
    }

    pub(crate) fn begin<H: ViewHost>(
        &mut self,
        host: &mut H,
        wiring: &mut Wiring,
        panel: NodeId,
        edge: ResizeEdge,
        pointer: Vec2,
    ) {
        self.end(host, wiring);
        let document = host.document();
        let move_listener =
            wiring.listen(host, document, ListenerKind::PointerMove, Route::ResizeMove);
        let up_listener = wiring.listen(host, document, ListenerKind::PointerUp, Route::ResizeEnd);
        self.session = Some(ResizeSession {
            edge,
            start_rect: host.measure(panel),
            start_pointer: pointer,
            move_listener,
            up_listener,
        });
    }

    /// Apply the size for `pointer`; `None` if no session is active
    pub(crate) fn update<H: ViewHost>(
        &self,
        host: &mut H,
        panel: NodeId,
        pointer: Vec2,
    ) -> Option<(ResizeEdge, Size)> {
        let session = self.session.as_ref()?;
        let delta = pointer - session.start_pointer;
        let size = calculate_resize(session.edge, session.start_rect.size(), delta);
        host.set_size(panel, size);
        Some((session.edge, size))
    }

    /// End the session; returns its edge if one was active
    pub(crate) fn end<H: ViewHost>(&mut self, host: &mut H, wiring: &mut Wiring) -> Option<ResizeEdge> {
        let session = self.session.take()?;
        wiring.unlisten(host, session.move_listener);
        wiring.unlisten(host, session.up_listener);
        Some(session.edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{OverlayConfig, OverlayId};
    use rpt_view_mock::HeadlessHost;

    #[test]
    fn test_resize_right() {
        let size = calculate_resize(
            ResizeEdge::Right,
            Size::new(400.0, 300.0),
            Vec2::new(50.0, 80.0),
        );
        assert!((size.width - 450.0).abs() < 0.001);
        assert!((size.height - 300.0).abs() < 0.001);
    }

    #[test]
    fn test_resize_corner_floors_at_minimum() {
        let size = calculate_resize(
            ResizeEdge::Corner,
            Size::new(400.0, 300.0),
            Vec2::new(-1000.0, -1000.0),
        );
        assert!((size.width - MIN_WIDTH).abs() < 0.001);
        assert!((size.height - MIN_HEIGHT).abs() < 0.001);
    }

    #[test]
    fn test_resize_bottom_keeps_width() {
        let size = calculate_resize(
            ResizeEdge::Bottom,
            Size::new(500.0, 300.0),
            Vec2::new(90.0, 25.0),
        );
        assert!((size.width - 500.0).abs() < 0.001);
        assert!((size.height - 325.0).abs() < 0.001);
    }

    #[test]
    fn test_bind_only_configured_edges() {
        let mut host = HeadlessHost::new();
        let config = OverlayConfig::new("dlg");
        let view = OverlayView::build(&mut host, &OverlayId::new("dlg"), &config);
        let mut wiring = Wiring::default();
        let mut resize = ResizeController::default();

        resize.bind(&mut host, &mut wiring, &view, &[ResizeEdge::Corner]);
        assert_eq!(host.listener_count(), 1);
        let corner = view.handle(ResizeEdge::Corner).unwrap();
        assert_eq!(host.listeners_on(corner, ListenerKind::PointerDown).len(), 1);

        host.set_size(view.panel, Size::new(400.0, 300.0));
        resize.begin(&mut host, &mut wiring, view.panel, ResizeEdge::Corner, Vec2::new(500.0, 400.0));
        assert_eq!(host.listener_count(), 3);

        let applied = resize.update(&mut host, view.panel, Vec2::new(520.0, 430.0));
        assert_eq!(applied, Some((ResizeEdge::Corner, Size::new(420.0, 330.0))));
        assert_eq!(host.measure(view.panel).size(), Size::new(420.0, 330.0));

        resize.unbind(&mut host, &mut wiring);
        assert_eq!(host.listener_count(), 0);
        assert!(!resize.is_resizing());
    }
}

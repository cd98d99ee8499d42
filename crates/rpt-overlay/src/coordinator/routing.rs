//! Routing host input to overlays

use rpt_view::{Input, Key, ListenerId, Vec2, ViewHost};

use super::Coordinator;
use crate::input::{InputResult, Route};
use crate::overlay::{CloseReason, EventDetail, EventKind, FormId, Overlay, OverlayId};

impl<H: ViewHost> Coordinator<H> {
    /// Handle an event the host reported for `listener`
    ///
    /// `Handled` means the host should suppress the event's default action
    /// and stop its propagation.
    pub fn handle_input(&mut self, listener: ListenerId, input: Input, now_ms: f64) -> InputResult {
        if Some(listener) == self.escape_listener {
            return match input {
                Input::KeyDown { key: Key::Escape, .. } => self.handle_escape(now_ms),
                _ => InputResult::Unhandled,
            };
        }

        let Some((id, route)) = self.find_route(listener) else {
            return InputResult::Unhandled;
        };

        match (route, input) {
            (Route::Backdrop, Input::Click) => self.handle_backdrop(&id, now_ms),
            (Route::CloseButton, Input::Click) => {
                InputResult::from_bool(self.close(&id, CloseReason::CloseButton, now_ms))
            }
            (Route::Action(reason), Input::Click) => {
                self.close(&id, reason, now_ms);
                InputResult::Handled
            }
            (Route::DragStart, Input::PointerDown { x, y }) => {
                self.start_drag(&id, Vec2::new(x, y))
            }
            (Route::DragMove, Input::PointerMove { x, y }) => {
                let moved = self.with_overlay(&id, |o, host| o.drag_to(host, Vec2::new(x, y)));
                InputResult::from_bool(moved.unwrap_or(false))
            }
            (Route::DragEnd, Input::PointerUp) => {
                let ended = self.with_overlay(&id, |o, host| o.end_drag(host));
                InputResult::from_bool(ended.unwrap_or(false))
            }
            (Route::ResizeStart(edge), Input::PointerDown { x, y }) => {
                let allowed = self
                    .overlays
                    .get(&id)
                    .map(|o| o.is_open() && o.config.resize_enabled(edge))
                    .unwrap_or(false);
                if !allowed {
                    return InputResult::Unhandled;
                }
                self.bring_to_front(&id);
                self.with_overlay(&id, |o, host| {
                    o.begin_resize(host, edge, Vec2::new(x, y))
                });
                InputResult::Handled
            }
            (Route::ResizeMove, Input::PointerMove { x, y }) => {
                let resized =
                    self.with_overlay(&id, |o, host| o.resize_to(host, Vec2::new(x, y)));
                InputResult::from_bool(resized.unwrap_or(false))
            }
            (Route::ResizeEnd, Input::PointerUp) => {
                let ended = self.with_overlay(&id, |o, host| o.end_resize(host));
                InputResult::from_bool(ended.unwrap_or(false))
            }
            (Route::FocusTrap, Input::KeyDown { key: Key::Tab, shift }) => self
                .with_overlay(&id, |o, host| o.handle_tab(host, shift))
                .unwrap_or(InputResult::Unhandled),
            (Route::Submit(form), Input::Submit) => {
                self.submit_form(&id, form, now_ms);
                // Native submission is always suppressed
                InputResult::Handled
            }
            _ => InputResult::Unhandled,
        }
    }

    fn find_route(&self, listener: ListenerId) -> Option<(OverlayId, Route)> {
        self.overlays
            .iter()
            .find_map(|(id, o)| o.wiring.route(listener).map(|r| (id.clone(), r.clone())))
    }

    fn with_overlay<R>(
        &mut self,
        id: &OverlayId,
        f: impl FnOnce(&mut Overlay, &mut H) -> R,
    ) -> Option<R> {
        let overlay = self.overlays.get_mut(id)?;
        Some(f(overlay, &mut self.host))
    }

    /// Escape goes to the top overlay only
    fn handle_escape(&mut self, now_ms: f64) -> InputResult {
        let Some(top) = self.stack.last().cloned() else {
            return InputResult::Unhandled;
        };
        let Some(overlay) = self.overlays.get(&top) else {
            return InputResult::Unhandled;
        };
        if !overlay.is_open() || !overlay.config.esc_close {
            return InputResult::Unhandled;
        }
        if overlay
            .emit(EventKind::Esc, EventDetail::None)
            .default_prevented()
        {
            return InputResult::Unhandled;
        }
        self.close(&top, CloseReason::Esc, now_ms);
        InputResult::Handled
    }

    fn handle_backdrop(&mut self, id: &OverlayId, now_ms: f64) -> InputResult {
        let Some(overlay) = self.overlays.get(id) else {
            return InputResult::Unhandled;
        };
        if !overlay.is_open() {
            return InputResult::Unhandled;
        }
        let prevented = overlay
            .emit(EventKind::Backdrop, EventDetail::None)
            .default_prevented();
        if !prevented && overlay.config.backdrop_close {
            self.close(id, CloseReason::Backdrop, now_ms);
        }
        InputResult::Handled
    }

    fn start_drag(&mut self, id: &OverlayId, pointer: Vec2) -> InputResult {
        let allowed = self
            .overlays
            .get(id)
            .map(|o| o.is_open() && o.config.draggable)
            .unwrap_or(false);
        if !allowed {
            return InputResult::Unhandled;
        }
        self.bring_to_front(id);
        self.with_overlay(id, |o, host| o.begin_drag(host, pointer));
        InputResult::Handled
    }

    fn submit_form(&mut self, id: &OverlayId, form: FormId, now_ms: f64) {
        let close = self
            .with_overlay(id, |o, host| {
                if !o.is_open() {
                    return false;
                }
                let outcome = o.forms.submit(host, form);
                o.apply_submit_outcome(host, outcome, now_ms)
            })
            .unwrap_or(false);
        if close {
            self.close(id, CloseReason::Submit, now_ms);
        }
    }
}

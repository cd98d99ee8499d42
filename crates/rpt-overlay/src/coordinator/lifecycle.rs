//! Open, close, destroy and the tick that completes transitions

use std::cmp::Ordering;

use rpt_view::ViewHost;

use super::Coordinator;
use crate::overlay::{CloseReason, EventDetail, EventKind, OverlayId, OverlayState};
use crate::transition::Transition;

impl<H: ViewHost> Coordinator<H> {
    /// Start opening a closed overlay; returns whether it started
    pub fn open(&mut self, id: &OverlayId, now_ms: f64) -> bool {
        let Some(overlay) = self.overlays.get_mut(id) else {
            return false;
        };
        if !overlay.state.is_closed() {
            return false;
        }
        if overlay
            .emit(EventKind::BeforeOpen, EventDetail::None)
            .default_prevented()
        {
            tracing::debug!(overlay = %id, "open prevented");
            return false;
        }

        if overlay.config.restore_focus {
            overlay.saved_focus = self.host.focused();
        }
        let mount = overlay.config.mount.unwrap_or_else(|| self.host.body());
        overlay.view.mount(&mut self.host, mount);
        overlay.prepare_open(&mut self.host);
        let duration = overlay.config.effective_duration_ms();
        overlay.state = OverlayState::Opening(Transition::new(now_ms, duration));

        self.register(id);
        self.bring_to_front(id);

        if let Some(overlay) = self.overlays.get_mut(id) {
            overlay.view.set_open(&mut self.host, true);
            if overlay.config.trap_focus {
                overlay.focus_pending = true;
                let panel = overlay.view.panel;
                overlay.trap.enable(&mut self.host, &mut overlay.wiring, panel);
            }
        }
        tracing::debug!(overlay = %id, duration_ms = duration, "overlay opening");
        true
    }

    /// Start closing an opening or open overlay; returns whether it started
    pub fn close(&mut self, id: &OverlayId, reason: CloseReason, now_ms: f64) -> bool {
        let Some(overlay) = self.overlays.get_mut(id) else {
            return false;
        };
        if !overlay.state.is_open() {
            return false;
        }
        if overlay
            .emit(EventKind::BeforeClose, EventDetail::reason(reason.clone()))
            .default_prevented()
        {
            tracing::debug!(overlay = %id, reason = %reason, "close prevented");
            return false;
        }

        overlay.view.set_open(&mut self.host, false);
        overlay.trap.disable(&mut self.host, &mut overlay.wiring);
        overlay.focus_pending = false;
        overlay.cancel_interactions(&mut self.host);
        let duration = overlay.config.effective_duration_ms();
        tracing::debug!(overlay = %id, reason = %reason, "overlay closing");
        overlay.state = OverlayState::Closing {
            transition: Transition::new(now_ms, duration),
            reason,
        };

        self.recompute_lock();
        true
    }

    /// Close if open, otherwise open
    pub fn toggle(&mut self, id: &OverlayId, now_ms: f64) -> bool {
        let open = self.overlays.get(id).map(|o| o.is_open()).unwrap_or(false);
        if open {
            self.close(id, CloseReason::Toggle, now_ms)
        } else {
            self.open(id, now_ms)
        }
    }

    /// Tear an overlay down immediately
    ///
    /// `BeforeClose` is still emitted for an open overlay but cannot veto.
    /// A close already in flight finishes with its own reason. Returns
    /// `false` for unknown ids.
    pub fn destroy(&mut self, id: &OverlayId, _now_ms: f64) -> bool {
        let Some(overlay) = self.overlays.get_mut(id) else {
            return false;
        };

        if matches!(overlay.state, OverlayState::Closing { .. }) {
            self.complete_close(id);
            self.dispose(id);
            tracing::debug!(overlay = %id, "overlay destroyed");
            return true;
        }

        let was_mounted = overlay.state.is_mounted();
        if overlay.is_open() {
            overlay.emit(EventKind::BeforeClose, EventDetail::reason(CloseReason::Destroy));
        }
        overlay.cancel_interactions(&mut self.host);
        if was_mounted {
            overlay.view.set_open(&mut self.host, false);
            overlay.view.unmount(&mut self.host);
        }
        overlay.state = OverlayState::Closed;

        self.unregister(id);

        if was_mounted {
            if let Some(overlay) = self.overlays.get(id) {
                overlay.emit(EventKind::Close, EventDetail::reason(CloseReason::Destroy));
            }
            self.restore_focus(id);
        }
        self.dispose(id);
        tracing::debug!(overlay = %id, "overlay destroyed");
        true
    }

    /// Advance time: complete due transitions, run scheduled focus, clear
    /// expired effects and poll pending form submissions
    ///
    /// Returns the number of state changes applied.
    pub fn tick(&mut self, now_ms: f64) -> usize {
        let mut changes = 0;

        for id in self.stack.clone() {
            if let Some(overlay) = self.overlays.get_mut(&id) {
                if overlay.focus_pending && overlay.is_open() {
                    overlay.focus_pending = false;
                    overlay.focus_first_element(&mut self.host);
                    changes += 1;
                }
            }
        }

        let mut due: Vec<(f64, usize, OverlayId)> = self
            .overlays
            .iter()
            .filter_map(|(id, o)| {
                let transition = o.state.transition().filter(|t| t.is_complete(now_ms))?;
                let pos = self.stack_position(id).unwrap_or(usize::MAX);
                Some((transition.due_ms(), pos, id.clone()))
            })
            .collect();
        due.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        for (_, _, id) in due {
            let opening = matches!(
                self.overlays.get(&id).map(|o| &o.state),
                Some(OverlayState::Opening(_))
            );
            if opening {
                self.complete_open(&id);
            } else {
                self.complete_close(&id);
            }
            changes += 1;
        }

        for overlay in self.overlays.values_mut() {
            if overlay.clear_expired_shake(&mut self.host, now_ms) {
                changes += 1;
            }
        }

        changes + self.poll_forms(now_ms)
    }

    fn complete_open(&mut self, id: &OverlayId) {
        if let Some(overlay) = self.overlays.get_mut(id) {
            overlay.state = OverlayState::Open;
            overlay.emit(EventKind::Open, EventDetail::None);
            tracing::debug!(overlay = %id, "overlay open");
        }
    }

    fn complete_close(&mut self, id: &OverlayId) {
        let Some(overlay) = self.overlays.get_mut(id) else {
            return;
        };
        let reason = match &overlay.state {
            OverlayState::Closing { reason, .. } => reason.clone(),
            _ => return,
        };
        overlay.view.unmount(&mut self.host);
        overlay.state = OverlayState::Closed;

        self.unregister(id);

        let dispose = match self.overlays.get(id) {
            Some(overlay) => {
                overlay.emit(EventKind::Close, EventDetail::reason(reason.clone()));
                overlay.config.dispose_on_close
            }
            None => false,
        };
        self.restore_focus(id);
        tracing::debug!(overlay = %id, reason = %reason, "overlay closed");

        if dispose {
            self.dispose(id);
        }
    }

    fn restore_focus(&mut self, id: &OverlayId) {
        let Some(overlay) = self.overlays.get_mut(id) else {
            return;
        };
        let Some(target) = overlay.saved_focus.take() else {
            return;
        };
        if overlay.config.restore_focus && self.host.is_attached(target) {
            self.host.focus(target);
        }
    }

    /// Remove an overlay and everything it installed
    fn dispose(&mut self, id: &OverlayId) {
        if let Some(mut overlay) = self.overlays.remove(id) {
            overlay.teardown(&mut self.host);
        }
        self.stack.retain(|s| s != id);
    }

    /// Poll in-flight form submissions; successful ones close their overlay
    fn poll_forms(&mut self, now_ms: f64) -> usize {
        let pending: Vec<OverlayId> = self
            .overlays
            .iter()
            .filter(|(_, o)| o.forms.has_pending())
            .map(|(id, _)| id.clone())
            .collect();

        let mut changes = 0;
        for id in pending {
            let Some(overlay) = self.overlays.get_mut(&id) else {
                continue;
            };
            let mut close = false;
            for outcome in overlay.forms.poll(&mut self.host) {
                close |= overlay.apply_submit_outcome(&mut self.host, outcome, now_ms);
                changes += 1;
            }
            if close {
                self.close(&id, CloseReason::Submit, now_ms);
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{callback, OverlayConfig};
    use crate::view::CLASS_OPEN;
    use rpt_view_mock::HeadlessHost;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn coordinator() -> Coordinator<HeadlessHost> {
        Coordinator::new(HeadlessHost::new())
    }

    #[test]
    fn test_open_then_tick_completes() {
        let mut c = coordinator();
        let id = c.create(OverlayConfig::new("dlg")).unwrap();

        assert!(c.open(&id, 0.0));
        assert!(matches!(c.get(&id).unwrap().state(), OverlayState::Opening(_)));
        let root = c.get(&id).unwrap().view().root;
        assert!(c.host().is_attached(root));
        assert!(c.host().has_class(root, CLASS_OPEN));

        c.tick(199.0);
        assert!(matches!(c.get(&id).unwrap().state(), OverlayState::Opening(_)));
        c.tick(200.0);
        assert_eq!(c.get(&id).unwrap().state(), &OverlayState::Open);
    }

    #[test]
    fn test_close_unmounts_after_duration() {
        let mut c = coordinator();
        let id = c.create(OverlayConfig::new("dlg")).unwrap();
        c.open(&id, 0.0);
        c.tick(200.0);

        assert!(c.close(&id, CloseReason::CloseButton, 300.0));
        let root = c.get(&id).unwrap().view().root;
        assert!(c.host().is_attached(root));
        assert!(!c.host().has_class(root, CLASS_OPEN));

        c.tick(500.0);
        assert!(!c.host().is_attached(root));
        assert!(c.get(&id).unwrap().state().is_closed());
        assert!(c.stack().is_empty());
    }

    #[test]
    fn test_open_prevented_by_listener() {
        let mut c = coordinator();
        let config = OverlayConfig {
            callbacks: crate::overlay::Callbacks {
                on_before_open: Some(callback(|ev| {
                    ev.prevent_default();
                    Ok(())
                })),
                ..Default::default()
            },
            ..OverlayConfig::new("dlg")
        };
        let id = c.create(config).unwrap();

        assert!(!c.open(&id, 0.0));
        assert!(c.get(&id).unwrap().state().is_closed());
        assert!(c.stack().is_empty());
    }

    #[test]
    fn test_close_reason_reaches_listener() {
        let mut c = coordinator();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let config = OverlayConfig {
            callbacks: crate::overlay::Callbacks {
                on_close: Some(callback(move |ev| {
                    s.borrow_mut().push(ev.reason().cloned());
                    Ok(())
                })),
                ..Default::default()
            },
            ..OverlayConfig::new("dlg")
        };
        let id = c.create(config).unwrap();
        c.open(&id, 0.0);
        c.tick(200.0);
        c.close(&id, CloseReason::Custom("saved".into()), 200.0);
        c.tick(400.0);

        assert_eq!(
            *seen.borrow(),
            vec![Some(CloseReason::Custom("saved".into()))]
        );
    }

    #[test]
    fn test_toggle() {
        let mut c = coordinator();
        let id = c.create(OverlayConfig::new("dlg")).unwrap();

        assert!(c.toggle(&id, 0.0));
        assert!(c.get(&id).unwrap().is_open());
        assert!(c.toggle(&id, 10.0));
        assert!(matches!(
            c.get(&id).unwrap().state(),
            OverlayState::Closing { reason: CloseReason::Toggle, .. }
        ));
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut c = coordinator();
        let id = c.create(OverlayConfig::new("dlg")).unwrap();
        c.open(&id, 0.0);

        assert!(c.destroy(&id, 10.0));
        assert!(!c.contains(&id));
        assert!(!c.destroy(&id, 20.0));
    }

    #[test]
    fn test_zero_duration_completes_on_next_tick() {
        let mut c = coordinator();
        let config = OverlayConfig {
            animation: crate::transition::Animation::None,
            ..OverlayConfig::new("dlg")
        };
        let id = c.create(config).unwrap();
        c.open(&id, 5.0);
        assert!(matches!(c.get(&id).unwrap().state(), OverlayState::Opening(_)));
        c.tick(5.0);
        assert_eq!(c.get(&id).unwrap().state(), &OverlayState::Open);
    }
}

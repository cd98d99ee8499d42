//! Focus trap
//!
//! While enabled, Tab and Shift+Tab wrap within the panel's focusable
//! descendants. The list is asked of the host on every key press, so
//! controls added or hidden after open are picked up.

use rpt_view::{ListenerId, ListenerKind, NodeId, ViewHost};

use super::wiring::{Route, Wiring};
use super::InputResult;

/// Where focus should move for a Tab press, or `None` to let the host handle it
pub fn next_focus(focusables: &[NodeId], current: Option<NodeId>, backwards: bool) -> Option<NodeId> {
    let first = *focusables.first()?;
    let last = *focusables.last()?;
    let index = current.and_then(|c| focusables.iter().position(|n| *n == c));

    match (backwards, index) {
        (false, None) => Some(first),
        (true, None) | (true, Some(0)) => Some(last),
        (false, Some(i)) if i + 1 == focusables.len() => Some(first),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct FocusTrap {
    listener: Option<ListenerId>,
}

impl FocusTrap {
    pub fn is_enabled(&self) -> bool {
        self.listener.is_some()
    }

    pub(crate) fn enable<H: ViewHost>(&mut self, host: &mut H, wiring: &mut Wiring, panel: NodeId) {
        if self.listener.is_none() {
            self.listener = Some(wiring.listen(host, panel, ListenerKind::KeyDown, Route::FocusTrap));
        }
    }

    pub(crate) fn disable<H: ViewHost>(&mut self, host: &mut H, wiring: &mut Wiring) {
        if let Some(listener) = self.listener.take() {
            wiring.unlisten(host, listener);
        }
    }

    /// Handle a Tab press inside `panel`
    pub(crate) fn handle_tab<H: ViewHost>(&self, host: &mut H, panel: NodeId, backwards: bool) -> InputResult {
        let focusables = host.focusable_within(panel);
        if focusables.is_empty() {
            host.focus(panel);
            return InputResult::Handled;
        }
        match next_focus(&focusables, host.focused(), backwards) {
            Some(target) => {
                host.focus(target);
                InputResult::Handled
            }
            None => InputResult::Unhandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpt_view::{ElementKind, FocusOracle};
    use rpt_view_mock::HeadlessHost;

    fn ids(n: u64) -> Vec<NodeId> {
        (1..=n).map(NodeId::new).collect()
    }

    #[test]
    fn test_next_focus_wraps() {
        let list = ids(3);
        assert_eq!(next_focus(&list, Some(list[2]), false), Some(list[0]));
        assert_eq!(next_focus(&list, Some(list[0]), true), Some(list[2]));
        assert_eq!(next_focus(&list, Some(list[0]), false), None);
        assert_eq!(next_focus(&list, Some(list[1]), true), None);
    }

    #[test]
    fn test_next_focus_from_outside() {
        let list = ids(3);
        assert_eq!(next_focus(&list, None, false), Some(list[0]));
        assert_eq!(next_focus(&list, Some(NodeId::new(99)), true), Some(list[2]));
        assert_eq!(next_focus(&[], None, false), None);
    }

    #[test]
    fn test_trap_focuses_panel_when_empty() {
        let mut host = HeadlessHost::new();
        let panel = host.create_element(ElementKind::Block);
        let mut wiring = Wiring::default();
        let mut trap = FocusTrap::default();

        trap.enable(&mut host, &mut wiring, panel);
        trap.enable(&mut host, &mut wiring, panel);
        assert_eq!(host.listener_count(), 1);

        assert_eq!(trap.handle_tab(&mut host, panel, false), InputResult::Handled);
        assert_eq!(host.focused(), Some(panel));

        trap.disable(&mut host, &mut wiring);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_trap_wraps_and_passes_through() {
        let mut host = HeadlessHost::new();
        let panel = host.create_element(ElementKind::Block);
        let a = host.add_focusable(panel);
        let b = host.add_focusable(panel);
        let trap = FocusTrap::default();

        host.focus(b);
        assert_eq!(trap.handle_tab(&mut host, panel, false), InputResult::Handled);
        assert_eq!(host.focused(), Some(a));

        assert_eq!(trap.handle_tab(&mut host, panel, false), InputResult::Unhandled);
        assert_eq!(host.focused(), Some(a));
    }
}

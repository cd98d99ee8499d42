//! Borrowed handle exposing one overlay's operations

use rpt_view::{ListenerId, NodeId, ViewHost};

use super::Coordinator;
use crate::overlay::{
    CloseReason, EventKind, FormId, FormOptions, ListenerResult, Overlay, OverlayEvent, OverlayId,
    OverlayPatch, SubscriptionId,
};
use crate::view::{Slot, SlotContent};

/// Mutable access to one overlay through its coordinator
///
/// Obtained from [`Coordinator::overlay`]. Lifecycle calls go through the
/// coordinator so stacking and the scroll lock stay consistent.
pub struct OverlayMut<'a, H: ViewHost> {
    coordinator: &'a mut Coordinator<H>,
    id: OverlayId,
}

impl<'a, H: ViewHost> OverlayMut<'a, H> {
    pub(crate) fn new(coordinator: &'a mut Coordinator<H>, id: OverlayId) -> Self {
        Self { coordinator, id }
    }

    pub fn id(&self) -> &OverlayId {
        &self.id
    }

    pub fn get(&self) -> Option<&Overlay> {
        self.coordinator.get(&self.id)
    }

    pub fn is_open(&self) -> bool {
        self.get().map(Overlay::is_open).unwrap_or(false)
    }

    fn with<R>(&mut self, f: impl FnOnce(&mut Overlay, &mut H) -> R) -> Option<R> {
        let coordinator = &mut *self.coordinator;
        let overlay = coordinator.overlays.get_mut(&self.id)?;
        Some(f(overlay, &mut coordinator.host))
    }

    // === Lifecycle ===

    pub fn open(&mut self, now_ms: f64) -> bool {
        self.coordinator.open(&self.id, now_ms)
    }

    pub fn close(&mut self, reason: CloseReason, now_ms: f64) -> bool {
        self.coordinator.close(&self.id, reason, now_ms)
    }

    pub fn toggle(&mut self, now_ms: f64) -> bool {
        self.coordinator.toggle(&self.id, now_ms)
    }

    pub fn destroy(self, now_ms: f64) -> bool {
        self.coordinator.destroy(&self.id, now_ms)
    }

    pub fn bring_to_front(&mut self) {
        self.coordinator.bring_to_front(&self.id);
    }

    // === Focus and feedback ===

    pub fn focus_first_element(&mut self) {
        self.with(|o, host| o.focus_first_element(host));
    }

    pub fn shake(&mut self, now_ms: f64) {
        self.with(|o, host| o.shake(host, now_ms));
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.with(|o, host| o.set_loading(host, loading));
    }

    /// Show an error line, or hide it with `None`
    pub fn set_error(&mut self, error: Option<SlotContent>) {
        self.with(|o, host| o.set_error(host, error));
    }

    // === Content ===

    pub fn set_title(&mut self, content: impl Into<SlotContent>) {
        let content = content.into();
        self.with(|o, host| o.set_slot(host, Slot::Title, content));
    }

    pub fn set_content(&mut self, content: impl Into<SlotContent>) {
        let content = content.into();
        self.with(|o, host| o.set_slot(host, Slot::Content, content));
    }

    pub fn set_footer(&mut self, content: impl Into<SlotContent>) {
        let content = content.into();
        self.with(|o, host| o.set_slot(host, Slot::Footer, content));
    }

    /// Merge options and re-apply presentation
    pub fn update_options(&mut self, patch: OverlayPatch) {
        self.with(|o, host| o.update_options(host, patch));
        self.coordinator.recompute_lock();
    }

    // === Wiring ===

    /// Route submits of `form` through validation and the submit handler
    pub fn attach_form(&mut self, form: NodeId, options: FormOptions) -> Option<FormId> {
        self.with(|o, host| o.forms.attach(host, &mut o.wiring, form, options))
    }

    pub fn detach_form(&mut self, form: FormId) -> bool {
        self.with(|o, host| o.forms.detach(host, &mut o.wiring, form))
            .unwrap_or(false)
    }

    pub fn attach_drag_handle(&mut self, node: NodeId) {
        self.with(|o, host| o.attach_drag_handle(host, node));
    }

    /// Close with `reason` when `node` is clicked
    pub fn add_action(&mut self, node: NodeId, reason: CloseReason) -> Option<ListenerId> {
        self.with(|o, host| o.add_action(host, node, reason))
    }

    // === Events ===

    pub fn add_event_listener<F>(&mut self, kind: EventKind, f: F) -> Option<SubscriptionId>
    where
        F: Fn(&mut OverlayEvent) -> ListenerResult + 'static,
    {
        self.with(|o, _| o.listeners.add(kind, std::rc::Rc::new(f)))
    }

    pub fn remove_event_listener(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        self.with(|o, _| o.listeners.remove(kind, id))
            .unwrap_or(false)
    }
}

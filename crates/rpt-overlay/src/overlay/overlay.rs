//! Overlay state and per-overlay operations
//!
//! Anything that only touches one overlay and the host lives here. The
//! coordinator drives lifecycle transitions and stacking on top of it.

use rpt_view::{ListenerId, ListenerKind, NodeId, Size, Vec2, ViewHost};

use super::event::{dispatch, EventDetail, EventKind, Listeners, OverlayEvent};
use super::form::{Forms, SubmitOutcome};
use super::{CloseReason, OverlayConfig, OverlayId, OverlayPatch, OverlayState, ResizeEdge};
use crate::error::{OverlayError, Result};
use crate::input::{DragController, FocusTrap, InputResult, ResizeController, Route, Wiring};
use crate::transition::{Transition, SHAKE_DURATION_MS};
use crate::view::{
    OverlayView, Slot, SlotContent, CLASS_DRAGGING, CLASS_LOADING, CLASS_RESIZING, CLASS_SHAKE,
};

/// One floating surface
pub struct Overlay {
    pub(crate) id: OverlayId,
    pub(crate) config: OverlayConfig,
    pub(crate) state: OverlayState,
    pub(crate) view: OverlayView,
    /// Focus to restore after close; checked for attachment before use
    pub(crate) saved_focus: Option<NodeId>,
    pub(crate) listeners: Listeners,
    pub(crate) wiring: Wiring,
    pub(crate) drag: DragController,
    pub(crate) resize: ResizeController,
    pub(crate) trap: FocusTrap,
    pub(crate) forms: Forms,
    /// First-focus scheduled for the next tick
    pub(crate) focus_pending: bool,
    loading: bool,
    error: Option<SlotContent>,
    shake: Option<Transition>,
    z_index: Option<i32>,
    position: Option<Vec2>,
    size: Option<Size>,
}

impl Overlay {
    /// Validate the config and build the detached view
    pub(crate) fn new<H: ViewHost>(host: &mut H, config: OverlayConfig) -> Result<Self> {
        if config.id.trim().is_empty() {
            return Err(OverlayError::MissingId);
        }
        if let Some(mount) = config.mount {
            if !host.is_element(mount) {
                return Err(OverlayError::InvalidMount(mount));
            }
        }

        let id = OverlayId::new(config.id.clone());
        let view = OverlayView::build(host, &id, &config);
        let size = config.size;
        let mut overlay = Self {
            id,
            config,
            state: OverlayState::Closed,
            view,
            saved_focus: None,
            listeners: Listeners::default(),
            wiring: Wiring::default(),
            drag: DragController::default(),
            resize: ResizeController::default(),
            trap: FocusTrap::default(),
            forms: Forms::default(),
            focus_pending: false,
            loading: false,
            error: None,
            shake: None,
            z_index: None,
            position: None,
            size,
        };

        let backdrop = overlay.view.backdrop;
        let close_button = overlay.view.close_button;
        overlay.wiring.listen(host, backdrop, ListenerKind::Click, Route::Backdrop);
        overlay.wiring.listen(host, close_button, ListenerKind::Click, Route::CloseButton);
        overlay.rebind_controllers(host);
        Ok(overlay)
    }

    // === Accessors ===

    pub fn id(&self) -> &OverlayId {
        &self.id
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    pub fn is_modal(&self) -> bool {
        self.config.modal
    }

    pub fn view(&self) -> &OverlayView {
        &self.view
    }

    /// Panel z-index while stacked
    pub fn z_index(&self) -> Option<i32> {
        self.z_index
    }

    /// Last applied top-left corner
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Last applied size
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&SlotContent> {
        self.error.as_ref()
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_resizing()
    }

    pub fn is_focus_trapped(&self) -> bool {
        self.trap.is_enabled()
    }

    /// Number of registered event listeners
    pub fn subscription_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of host listeners this overlay has installed
    pub fn host_listener_count(&self) -> usize {
        self.wiring.len()
    }

    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    // === Events ===

    pub(crate) fn emit(&self, kind: EventKind, detail: EventDetail) -> OverlayEvent {
        let event = OverlayEvent::new(self.id.clone(), kind, detail);
        dispatch(event, &self.listeners, &self.config.callbacks, self.config.debug)
    }

    // === Wiring ===

    pub(crate) fn drag_handle(&self) -> NodeId {
        self.config.drag_handle.unwrap_or(self.view.header)
    }

    /// Bind drag and resize controllers to match the config
    pub(crate) fn rebind_controllers<H: ViewHost>(&mut self, host: &mut H) {
        if self.config.draggable {
            let handle = self.drag_handle();
            if self.drag.handle() != Some(handle) || !self.drag.is_bound() {
                self.drag.bind(host, &mut self.wiring, handle);
            }
        } else {
            self.drag.unbind(host, &mut self.wiring);
        }

        if self.config.resizable {
            self.resize.bind(host, &mut self.wiring, &self.view, &self.config.resize_edges);
        } else {
            self.resize.unbind(host, &mut self.wiring);
        }
    }

    pub(crate) fn attach_drag_handle<H: ViewHost>(&mut self, host: &mut H, node: NodeId) {
        self.config.drag_handle = Some(node);
        self.rebind_controllers(host);
    }

    pub(crate) fn add_action<H: ViewHost>(
        &mut self,
        host: &mut H,
        node: NodeId,
        reason: CloseReason,
    ) -> ListenerId {
        self.wiring.listen(host, node, ListenerKind::Click, Route::Action(reason))
    }

    /// End drag/resize sessions without emitting events
    pub(crate) fn cancel_interactions<H: ViewHost>(&mut self, host: &mut H) {
        if self.drag.end(host, &mut self.wiring) {
            host.set_class(self.view.panel, CLASS_DRAGGING, false);
        }
        if self.resize.end(host, &mut self.wiring).is_some() {
            host.set_class(self.view.panel, CLASS_RESIZING, false);
        }
    }

    /// Remove every host listener and release the view
    pub(crate) fn teardown<H: ViewHost>(&mut self, host: &mut H) {
        self.drag.unbind(host, &mut self.wiring);
        self.resize.unbind(host, &mut self.wiring);
        self.trap.disable(host, &mut self.wiring);
        self.forms.detach_all(host, &mut self.wiring);
        self.wiring.detach_all(host);
        self.view.release(host);
    }

    // === Presentation ===

    pub(crate) fn set_slot<H: ViewHost>(&mut self, host: &mut H, slot: Slot, content: SlotContent) {
        self.view.render_slot(host, slot, &content, self.config.sanitize_html);
        match slot {
            Slot::Title => self.config.title = content,
            Slot::Content => self.config.content = content,
            Slot::Footer => self.config.footer = content,
        }
    }

    pub(crate) fn set_loading<H: ViewHost>(&mut self, host: &mut H, loading: bool) {
        self.loading = loading;
        host.set_class(self.view.panel, CLASS_LOADING, loading);
        host.set_attribute(self.view.panel, "aria-busy", if loading { "true" } else { "false" });
        if loading {
            self.set_error(host, None);
        }
    }

    pub(crate) fn set_error<H: ViewHost>(&mut self, host: &mut H, error: Option<SlotContent>) {
        self.view.render_error(host, error.as_ref(), self.config.sanitize_html);
        self.error = error;
    }

    pub(crate) fn shake<H: ViewHost>(&mut self, host: &mut H, now_ms: f64) {
        host.set_class(self.view.panel, CLASS_SHAKE, true);
        self.shake = Some(Transition::new(now_ms, SHAKE_DURATION_MS));
    }

    /// Remove the shake class once it has run; returns whether it was cleared
    pub(crate) fn clear_expired_shake<H: ViewHost>(&mut self, host: &mut H, now_ms: f64) -> bool {
        match self.shake {
            Some(shake) if shake.is_complete(now_ms) => {
                host.set_class(self.view.panel, CLASS_SHAKE, false);
                self.shake = None;
                true
            }
            _ => false,
        }
    }

    /// Focus the first focusable descendant, or the panel itself
    pub(crate) fn focus_first_element<H: ViewHost>(&self, host: &mut H) {
        let target = host
            .focusable_within(self.view.panel)
            .first()
            .copied()
            .unwrap_or(self.view.panel);
        host.focus(target);
    }

    /// Apply theme, role, size and position for an open
    pub(crate) fn prepare_open<H: ViewHost>(&mut self, host: &mut H) {
        self.view.apply_presentation(host, &self.config);
        self.position = Some(self.view.place(host, self.config.position));
        self.size = Some(self.view.panel_size(host));
    }

    pub(crate) fn update_options<H: ViewHost>(&mut self, host: &mut H, patch: OverlayPatch) {
        let previous_class = self.config.class_name.clone();
        let geometry = patch.affects_geometry();
        patch.apply(&mut self.config);

        if previous_class != self.config.class_name {
            if let Some(class) = previous_class {
                host.set_class(self.view.root, &class, false);
            }
        }
        self.view.apply_presentation(host, &self.config);

        if self.state.is_mounted() {
            if geometry {
                self.prepare_open(host);
            }
            if self.is_open() && self.config.trap_focus {
                self.trap.enable(host, &mut self.wiring, self.view.panel);
            } else {
                self.trap.disable(host, &mut self.wiring);
            }
        } else if let Some(size) = self.config.size {
            self.size = Some(size);
        }
        self.rebind_controllers(host);
    }

    pub(crate) fn apply_z<H: ViewHost>(&mut self, host: &mut H, z: i32) {
        self.view.apply_z(host, z);
        self.z_index = Some(z);
    }

    pub(crate) fn clear_z(&mut self) {
        self.z_index = None;
    }

    // === Drag and resize ===

    pub(crate) fn begin_drag<H: ViewHost>(&mut self, host: &mut H, pointer: Vec2) {
        let panel = self.view.panel;
        let origin = self.drag.begin(host, &mut self.wiring, panel, pointer);
        host.set_class(panel, CLASS_DRAGGING, true);
        self.position = Some(origin);
        self.emit(EventKind::DragStart, EventDetail::position(origin));
    }

    pub(crate) fn drag_to<H: ViewHost>(&mut self, host: &mut H, pointer: Vec2) -> bool {
        let keep = self.config.keep_in_viewport;
        match self.drag.update(host, self.view.panel, pointer, keep) {
            Some(pos) => {
                self.position = Some(pos);
                self.emit(EventKind::Drag, EventDetail::position(pos));
                true
            }
            None => false,
        }
    }

    pub(crate) fn end_drag<H: ViewHost>(&mut self, host: &mut H) -> bool {
        if !self.drag.end(host, &mut self.wiring) {
            return false;
        }
        host.set_class(self.view.panel, CLASS_DRAGGING, false);
        let pos = self.position.unwrap_or(Vec2::ZERO);
        self.emit(EventKind::DragEnd, EventDetail::position(pos));
        true
    }

    pub(crate) fn begin_resize<H: ViewHost>(&mut self, host: &mut H, edge: ResizeEdge, pointer: Vec2) {
        let panel = self.view.panel;
        self.resize.begin(host, &mut self.wiring, panel, edge, pointer);
        host.set_class(panel, CLASS_RESIZING, true);
        let size = self.view.panel_size(host);
        self.emit(EventKind::ResizeStart, EventDetail::resize(edge, size));
    }

    pub(crate) fn resize_to<H: ViewHost>(&mut self, host: &mut H, pointer: Vec2) -> bool {
        match self.resize.update(host, self.view.panel, pointer) {
            Some((edge, size)) => {
                self.size = Some(size);
                self.emit(EventKind::Resize, EventDetail::resize(edge, size));
                true
            }
            None => false,
        }
    }

    pub(crate) fn end_resize<H: ViewHost>(&mut self, host: &mut H) -> bool {
        let Some(edge) = self.resize.end(host, &mut self.wiring) else {
            return false;
        };
        host.set_class(self.view.panel, CLASS_RESIZING, false);
        let size = self.view.panel_size(host);
        self.emit(EventKind::ResizeEnd, EventDetail::resize(edge, size));
        true
    }

    pub(crate) fn handle_tab<H: ViewHost>(&self, host: &mut H, backwards: bool) -> InputResult {
        if !self.trap.is_enabled() {
            return InputResult::Unhandled;
        }
        self.trap.handle_tab(host, self.view.panel, backwards)
    }

    // === Forms ===

    /// Apply a submit outcome; returns whether the overlay should close
    pub(crate) fn apply_submit_outcome<H: ViewHost>(
        &mut self,
        host: &mut H,
        outcome: SubmitOutcome,
        now_ms: f64,
    ) -> bool {
        match outcome {
            SubmitOutcome::Rejected => {
                self.shake(host, now_ms);
                false
            }
            SubmitOutcome::Invalid(message) => {
                self.set_error(host, Some(SlotContent::Text(message)));
                self.shake(host, now_ms);
                false
            }
            SubmitOutcome::Failed(message) => {
                if self.config.debug {
                    tracing::warn!(overlay = %self.id, error = %message, "form submission failed");
                }
                self.set_error(host, Some(SlotContent::Text(message)));
                false
            }
            SubmitOutcome::Succeeded => true,
            SubmitOutcome::Pending | SubmitOutcome::Busy => false,
        }
    }
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("id", &self.id)
            .field("state", &self.state.as_str())
            .field("z_index", &self.z_index)
            .field("listeners", &self.listeners.len())
            .field("host_listeners", &self.wiring.len())
            .finish()
    }
}

//! Overlay coordinator
//!
//! Owns the host, every overlay created through it, the stacking order, the
//! page-wide Escape listener and the background scroll lock.
//!
//! # Stacking
//!
//! `stack` holds registered overlays from bottom to top. The panel at stack
//! position `i` gets `z = base_z + 2 * i` and its backdrop `z - 1`, so every
//! backdrop sits above everything beneath its own panel.

mod handle;
mod lifecycle;
mod routing;
mod scroll_lock;

use std::collections::HashMap;

use rpt_view::{ListenerId, ListenerKind, ViewHost};

use crate::error::{OverlayError, Result};
use crate::overlay::{Overlay, OverlayConfig, OverlayId};

pub use handle::OverlayMut;
pub use scroll_lock::{ScrollLock, LOCKED_OVERFLOW};

/// Default z-index of the bottom-most panel
pub const DEFAULT_BASE_Z: i32 = 1000;

/// Overlay coordinator
pub struct Coordinator<H: ViewHost> {
    host: H,
    overlays: HashMap<OverlayId, Overlay>,
    /// Registered overlays, bottom to top
    stack: Vec<OverlayId>,
    base_z: i32,
    scroll_lock: ScrollLock,
    /// Page-wide Escape listener, installed on first register
    escape_listener: Option<ListenerId>,
    /// Counter for generated preset ids
    next_generated: u64,
}

impl<H: ViewHost> Coordinator<H> {
    /// Create a coordinator over `host`
    pub fn new(host: H) -> Self {
        Self::with_base_z(host, DEFAULT_BASE_Z)
    }

    pub fn with_base_z(host: H, base_z: i32) -> Self {
        Self {
            host,
            overlays: HashMap::new(),
            stack: Vec::new(),
            base_z,
            scroll_lock: ScrollLock::default(),
            escape_listener: None,
            next_generated: 1,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn base_z(&self) -> i32 {
        self.base_z
    }

    // === Overlays ===

    /// Create a closed overlay
    pub fn create(&mut self, config: OverlayConfig) -> Result<OverlayId> {
        let id = OverlayId::new(config.id.clone());
        if self.overlays.contains_key(&id) {
            return Err(OverlayError::DuplicateId(config.id));
        }
        let overlay = Overlay::new(&mut self.host, config)?;
        tracing::debug!(overlay = %id, "overlay created");
        self.overlays.insert(id.clone(), overlay);
        Ok(id)
    }

    /// Mutable handle to an overlay
    pub fn overlay(&mut self, id: &OverlayId) -> Option<OverlayMut<'_, H>> {
        if self.overlays.contains_key(id) {
            Some(OverlayMut::new(self, id.clone()))
        } else {
            None
        }
    }

    /// Like [`Coordinator::overlay`], failing with `UnknownOverlay`
    pub fn try_overlay(&mut self, id: &OverlayId) -> Result<OverlayMut<'_, H>> {
        let missing = OverlayError::UnknownOverlay(id.to_string());
        self.overlay(id).ok_or(missing)
    }

    pub fn get(&self, id: &OverlayId) -> Option<&Overlay> {
        self.overlays.get(id)
    }

    pub fn contains(&self, id: &OverlayId) -> bool {
        self.overlays.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Generate an unused id with the given prefix
    pub(crate) fn generate_id(&mut self, prefix: &str) -> OverlayId {
        loop {
            let id = OverlayId::new(format!("{prefix}-{}", self.next_generated));
            self.next_generated += 1;
            if !self.overlays.contains_key(&id) {
                return id;
            }
        }
    }

    // === Stacking ===

    /// Add an overlay to the top of the stack if absent
    pub fn register(&mut self, id: &OverlayId) {
        if !self.overlays.contains_key(id) {
            return;
        }
        self.ensure_escape_listener();
        if !self.stack.contains(id) {
            self.stack.push(id.clone());
        }
        self.reflow();
        self.recompute_lock();
    }

    pub fn unregister(&mut self, id: &OverlayId) {
        self.stack.retain(|s| s != id);
        if let Some(overlay) = self.overlays.get_mut(id) {
            overlay.clear_z();
        }
        self.reflow();
        self.recompute_lock();
    }

    /// Move a registered overlay to the top; ordering only
    pub fn bring_to_front(&mut self, id: &OverlayId) {
        let Some(pos) = self.stack.iter().position(|s| s == id) else {
            return;
        };
        if pos + 1 != self.stack.len() {
            let id = self.stack.remove(pos);
            self.stack.push(id);
            self.reflow();
        }
    }

    /// Registered overlays, bottom to top
    pub fn stack(&self) -> &[OverlayId] {
        &self.stack
    }

    pub fn top(&self) -> Option<&OverlayId> {
        self.stack.last()
    }

    pub fn z_index_of(&self, id: &OverlayId) -> Option<i32> {
        self.overlays.get(id).and_then(Overlay::z_index)
    }

    /// Whether any stacked overlay is open and modal
    pub fn any_modal_open(&self) -> bool {
        self.modal_open_count() > 0
    }

    pub fn scroll_lock_count(&self) -> usize {
        self.scroll_lock.count()
    }

    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.scroll_lock
    }

    /// The page-wide Escape listener, once installed
    pub fn escape_listener(&self) -> Option<ListenerId> {
        self.escape_listener
    }

    fn modal_open_count(&self) -> usize {
        self.stack
            .iter()
            .filter_map(|id| self.overlays.get(id))
            .filter(|o| o.is_open() && o.is_modal())
            .count()
    }

    /// Apply z-indices to the whole stack
    fn reflow(&mut self) {
        for (pos, id) in self.stack.iter().enumerate() {
            let z = self.base_z + 2 * pos as i32;
            if let Some(overlay) = self.overlays.get_mut(id) {
                overlay.apply_z(&mut self.host, z);
            }
        }
    }

    pub(crate) fn recompute_lock(&mut self) {
        let count = self.modal_open_count();
        self.scroll_lock.update(&mut self.host, count);
    }

    fn ensure_escape_listener(&mut self) {
        if self.escape_listener.is_none() {
            let document = self.host.document();
            self.escape_listener = Some(self.host.add_listener(document, ListenerKind::KeyDown));
        }
    }

    fn stack_position(&self, id: &OverlayId) -> Option<usize> {
        self.stack.iter().position(|s| s == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpt_view_mock::HeadlessHost;

    fn coordinator() -> Coordinator<HeadlessHost> {
        Coordinator::new(HeadlessHost::new())
    }

    #[test]
    fn test_create_rejects_duplicates() {
        let mut c = coordinator();
        let id = c.create(OverlayConfig::new("a")).unwrap();
        assert_eq!(id.as_str(), "a");
        assert_eq!(
            c.create(OverlayConfig::new("a")).unwrap_err(),
            OverlayError::DuplicateId("a".to_string())
        );
        assert_eq!(
            c.create(OverlayConfig::default()).unwrap_err(),
            OverlayError::MissingId
        );
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_register_reflows_z() {
        let mut c = coordinator();
        let a = c.create(OverlayConfig::new("a")).unwrap();
        let b = c.create(OverlayConfig::new("b")).unwrap();

        c.register(&a);
        c.register(&b);
        c.register(&a);
        assert_eq!(c.stack(), &[a.clone(), b.clone()]);
        assert_eq!(c.z_index_of(&a), Some(1000));
        assert_eq!(c.z_index_of(&b), Some(1002));

        c.bring_to_front(&a);
        assert_eq!(c.top(), Some(&a));
        assert_eq!(c.z_index_of(&b), Some(1000));
        assert_eq!(c.z_index_of(&a), Some(1002));

        c.unregister(&b);
        assert_eq!(c.z_index_of(&a), Some(1000));
        assert_eq!(c.z_index_of(&b), None);
    }

    #[test]
    fn test_escape_listener_installed_once() {
        let mut c = coordinator();
        let a = c.create(OverlayConfig::new("a")).unwrap();
        assert!(c.escape_listener().is_none());

        c.register(&a);
        c.unregister(&a);
        c.register(&a);
        let doc = c.host().document();
        assert_eq!(c.host().listeners_on(doc, ListenerKind::KeyDown).len(), 1);
    }

    #[test]
    fn test_register_unknown_is_ignored() {
        let mut c = coordinator();
        c.register(&OverlayId::new("ghost"));
        assert!(c.stack().is_empty());
        c.bring_to_front(&OverlayId::new("ghost"));
        assert!(c.stack().is_empty());
    }

    #[test]
    fn test_custom_base_z() {
        let mut c = Coordinator::with_base_z(HeadlessHost::new(), 50);
        let a = c.create(OverlayConfig::new("a")).unwrap();
        c.register(&a);
        assert_eq!(c.z_index_of(&a), Some(50));
        let backdrop = c.get(&a).unwrap().view().backdrop;
        assert_eq!(c.host().z_index(backdrop), Some(49));
    }

    #[test]
    fn test_generate_id_skips_taken() {
        let mut c = coordinator();
        c.create(OverlayConfig::new("confirm-1")).unwrap();
        assert_eq!(c.generate_id("confirm").as_str(), "confirm-2");
        assert_eq!(c.generate_id("alert").as_str(), "alert-3");
    }
}

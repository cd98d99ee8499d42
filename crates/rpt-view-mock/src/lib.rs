//! Headless view host for testing the overlay engine
//!
//! This provides an in-memory implementation of the `ViewHost` trait that
//! records the node tree, attributes, classes, styles, focus and listeners,
//! so the engine can be exercised without a browser.

use std::collections::{BTreeMap, BTreeSet};

use rpt_view::{
    ElementKind, FocusOracle, ListenerId, ListenerKind, NodeId, Rect, Size, Vec2, ViewHost,
};

/// Default viewport for a fresh host
pub const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 800.0);

/// Simulated node state
#[derive(Clone, Debug)]
struct MockNode {
    kind: Option<ElementKind>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: Option<String>,
    markup: Option<String>,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    rect: Rect,
    z_index: Option<i32>,
    disabled: bool,
    focusable: bool,
    visible: bool,
}

impl MockNode {
    fn new(kind: Option<ElementKind>) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            text: None,
            markup: None,
            attributes: BTreeMap::new(),
            classes: BTreeSet::new(),
            styles: BTreeMap::new(),
            rect: Rect::ZERO,
            z_index: None,
            disabled: false,
            focusable: matches!(kind, Some(ElementKind::Button)),
            visible: true,
        }
    }
}

/// Headless view host
///
/// The document is node 0 and the body node 1. Every other node starts
/// detached with a zero rect; tests give panels a size with
/// [`HeadlessHost::set_rect`] or through the engine's `set_size`.
pub struct HeadlessHost {
    nodes: BTreeMap<NodeId, MockNode>,
    next_node: u64,
    listeners: BTreeMap<ListenerId, (NodeId, ListenerKind)>,
    next_listener: u64,
    document: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
    viewport: Size,
    overflow: String,
    overflow_writes: usize,
    debug_log: Vec<String>,
}

impl HeadlessHost {
    /// Create a host with the default viewport
    pub fn new() -> Self {
        Self::with_viewport(DEFAULT_VIEWPORT)
    }

    /// Create a host with a specific viewport
    pub fn with_viewport(viewport: Size) -> Self {
        let document = NodeId::new(0);
        let body = NodeId::new(1);
        let mut nodes = BTreeMap::new();
        nodes.insert(document, MockNode::new(None));
        let mut body_node = MockNode::new(Some(ElementKind::Block));
        body_node.parent = Some(document);
        nodes.insert(body, body_node);
        if let Some(doc) = nodes.get_mut(&document) {
            doc.children.push(body);
        }

        Self {
            nodes,
            next_node: 2,
            listeners: BTreeMap::new(),
            next_listener: 1,
            document,
            body,
            focused: None,
            viewport,
            overflow: String::new(),
            overflow_writes: 0,
            debug_log: Vec::new(),
        }
    }

    // === Test setup helpers ===

    /// Change the viewport size
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Overwrite a node's bounding box
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.rect = rect;
        }
    }

    /// Create a focusable control appended under `parent`
    pub fn add_focusable(&mut self, parent: NodeId) -> NodeId {
        let node = self.create_element(ElementKind::Button);
        self.append_child(parent, node);
        node
    }

    /// Toggle whether a node counts as visible for focus discovery
    pub fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.visible = visible;
        }
    }

    /// Toggle whether a node can take focus
    pub fn set_focusable(&mut self, node: NodeId, focusable: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.focusable = focusable;
        }
    }

    /// Simulate the page's own code writing the background overflow
    pub fn write_overflow_externally(&mut self, value: &str) {
        self.overflow = value.to_string();
    }

    // === Inspection helpers ===

    /// Listener ids installed on a node for an event kind, in install order
    pub fn listeners_on(&self, node: NodeId, kind: ListenerKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, (n, k))| *n == node && *k == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Total number of installed listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether a listener id is still installed
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Number of live nodes, including document and body
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    pub fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn text_of(&self, node: NodeId) -> Option<String> {
        self.nodes.get(&node).and_then(|n| n.text.clone())
    }

    pub fn markup_of(&self, node: NodeId) -> Option<String> {
        self.nodes.get(&node).and_then(|n| n.markup.clone())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes
            .get(&node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(&node)
            .map(|n| n.classes.contains(class))
            .unwrap_or(false)
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes
            .get(&node)
            .and_then(|n| n.styles.get(property).cloned())
    }

    pub fn z_index(&self, node: NodeId) -> Option<i32> {
        self.nodes.get(&node).and_then(|n| n.z_index)
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.nodes.get(&node).map(|n| n.disabled).unwrap_or(false)
    }

    /// How many times the engine wrote the background overflow
    pub fn overflow_writes(&self) -> usize {
        self.overflow_writes
    }

    /// Get all captured debug messages
    pub fn get_debug_log(&self) -> Vec<String> {
        self.debug_log.clone()
    }

    /// Check if a specific message was logged
    pub fn has_log_containing(&self, substr: &str) -> bool {
        self.debug_log.iter().any(|msg| msg.contains(substr))
    }

    // === Internals ===

    fn detach(&mut self, node: NodeId) {
        let parent = match self.nodes.get_mut(&node) {
            Some(n) => n.parent.take(),
            None => return,
        };
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|&c| c != node);
            }
        }
    }

    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            if let Some(n) = self.nodes.get(&node) {
                out.push(node);
                // Reverse so the pop order stays in tree order
                pending.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    fn drop_children(&mut self, node: NodeId) {
        let children = self.children_of(node);
        for child in children {
            // Children the engine did not create survive detachment
            self.detach(child);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.text = None;
            n.markup = None;
        }
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusOracle for HeadlessHost {
    fn focusable_within(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending: Vec<NodeId> = self.children_of(root).into_iter().rev().collect();
        while let Some(id) = pending.pop() {
            let Some(n) = self.nodes.get(&id) else {
                continue;
            };
            // Hidden nodes hide their whole subtree
            if !n.visible || n.attributes.contains_key("hidden") {
                continue;
            }
            if n.focusable && !n.disabled {
                out.push(id);
            }
            pending.extend(n.children.iter().rev().copied());
        }
        out
    }
}

impl ViewHost for HeadlessHost {
    fn document(&self) -> NodeId {
        self.document
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn create_element(&mut self, kind: ElementKind) -> NodeId {
        let id = NodeId::new(self.next_node);
        self.next_node += 1;
        self.nodes.insert(id, MockNode::new(Some(kind)));
        id
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        self.detach(child);
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
    }

    fn unmount(&mut self, node: NodeId) {
        self.detach(node);
        self.debug_log.push(format!("[headless] unmounted node {}", node.raw()));
    }

    fn release(&mut self, node: NodeId) {
        self.detach(node);
        for id in self.subtree(node) {
            self.nodes.remove(&id);
            if self.focused == Some(id) {
                self.focused = None;
            }
        }
        self.debug_log.push(format!("[headless] released node {}", node.raw()));
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.document {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.nodes
            .get(&node)
            .map(|n| n.kind.is_some())
            .unwrap_or(false)
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.drop_children(node);
        if let Some(n) = self.nodes.get_mut(&node) {
            n.text = Some(text.to_string());
        }
    }

    fn set_markup(&mut self, node: NodeId, markup: &str) {
        self.drop_children(node);
        if let Some(n) = self.nodes.get_mut(&node) {
            n.markup = Some(markup.to_string());
        }
    }

    fn set_child(&mut self, node: NodeId, child: NodeId) {
        self.drop_children(node);
        self.append_child(node, child);
    }

    fn clear(&mut self, node: NodeId) {
        self.drop_children(node);
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.attributes.remove(name);
        }
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            if on {
                n.classes.insert(class.to_string());
            } else {
                n.classes.remove(class);
            }
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: Option<&str>) {
        if let Some(n) = self.nodes.get_mut(&node) {
            match value {
                Some(v) => {
                    n.styles.insert(property.to_string(), v.to_string());
                }
                None => {
                    n.styles.remove(property);
                }
            }
        }
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.disabled = disabled;
        }
    }

    fn set_z_index(&mut self, node: NodeId, z: i32) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.z_index = Some(z);
        }
    }

    fn set_position(&mut self, node: NodeId, position: Vec2) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.rect.x = position.x;
            n.rect.y = position.y;
        }
    }

    fn set_size(&mut self, node: NodeId, size: Size) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.rect.width = size.width;
            n.rect.height = size.height;
        }
    }

    fn measure(&self, node: NodeId) -> Rect {
        self.nodes.get(&node).map(|n| n.rect).unwrap_or(Rect::ZERO)
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    fn focus(&mut self, node: NodeId) {
        if self.nodes.contains_key(&node) {
            self.focused = Some(node);
        }
    }

    fn background_overflow(&self) -> String {
        self.overflow.clone()
    }

    fn set_background_overflow(&mut self, value: &str) {
        self.overflow = value.to_string();
        self.overflow_writes += 1;
    }

    fn add_listener(&mut self, node: NodeId, kind: ListenerKind) -> ListenerId {
        let id = ListenerId::new(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, (node, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_attached_to_document() {
        let host = HeadlessHost::new();
        assert!(host.is_attached(host.body()));
        assert!(host.is_element(host.body()));
        assert!(!host.is_element(host.document()));
    }

    #[test]
    fn test_mount_and_unmount() {
        let mut host = HeadlessHost::new();
        let node = host.create_element(ElementKind::Block);
        assert!(!host.is_attached(node));

        let body = host.body();
        host.mount(node, body);
        assert!(host.is_attached(node));
        assert_eq!(host.parent_of(node), Some(body));

        host.unmount(node);
        assert!(!host.is_attached(node));
        assert!(host.contains(node));
    }

    #[test]
    fn test_release_drops_subtree_and_focus() {
        let mut host = HeadlessHost::new();
        let root = host.create_element(ElementKind::Block);
        let button = host.add_focusable(root);
        host.focus(button);

        host.release(root);
        assert!(!host.contains(root));
        assert!(!host.contains(button));
        assert_eq!(host.focused(), None);
        assert!(host.has_log_containing("released"));
    }

    #[test]
    fn test_focusable_within_tree_order() {
        let mut host = HeadlessHost::new();
        let root = host.create_element(ElementKind::Block);
        let a = host.add_focusable(root);
        let inner = host.create_element(ElementKind::Block);
        host.append_child(root, inner);
        let b = host.add_focusable(inner);
        let c = host.add_focusable(root);

        assert_eq!(host.focusable_within(root), vec![a, b, c]);

        host.set_visible(b, false);
        host.set_disabled(c, true);
        assert_eq!(host.focusable_within(root), vec![a]);
    }

    #[test]
    fn test_hidden_attribute_hides_subtree() {
        let mut host = HeadlessHost::new();
        let root = host.create_element(ElementKind::Block);
        let group = host.create_element(ElementKind::Block);
        host.append_child(root, group);
        let inner = host.add_focusable(group);
        let outer = host.add_focusable(root);

        host.set_attribute(group, "hidden", "");
        assert_eq!(host.focusable_within(root), vec![outer]);

        host.remove_attribute(group, "hidden");
        assert_eq!(host.focusable_within(root), vec![inner, outer]);
    }

    #[test]
    fn test_listeners_install_and_remove() {
        let mut host = HeadlessHost::new();
        let node = host.create_element(ElementKind::Button);
        let l1 = host.add_listener(node, ListenerKind::Click);
        let l2 = host.add_listener(node, ListenerKind::Click);

        assert_eq!(host.listeners_on(node, ListenerKind::Click), vec![l1, l2]);
        host.remove_listener(l1);
        assert_eq!(host.listener_count(), 1);
        assert!(!host.has_listener(l1));
    }

    #[test]
    fn test_set_child_replaces_content() {
        let mut host = HeadlessHost::new();
        let slot = host.create_element(ElementKind::Block);
        host.set_text(slot, "hello");
        assert_eq!(host.text_of(slot), Some("hello".to_string()));

        let child = host.create_element(ElementKind::Paragraph);
        host.set_child(slot, child);
        assert_eq!(host.text_of(slot), None);
        assert_eq!(host.children_of(slot), vec![child]);
    }

    #[test]
    fn test_geometry_follows_position_and_size() {
        let mut host = HeadlessHost::new();
        let node = host.create_element(ElementKind::Block);
        host.set_position(node, Vec2::new(10.0, 20.0));
        host.set_size(node, Size::new(300.0, 200.0));
        assert_eq!(host.measure(node), Rect::new(10.0, 20.0, 300.0, 200.0));
    }
}

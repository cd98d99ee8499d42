//! View host abstraction for the report client overlay engine
//!
//! This crate defines the narrow interface the overlay engine uses to talk
//! to whatever renders it: a browser DOM, a headless test double, or any
//! other tree of visual nodes.
//!
//! # Host Implementations
//!
//! - **Browser**: `rpt_overlay::DomHost` (behind the `wasm` feature) maps
//!   nodes to `web_sys::Element`s and listeners to DOM event closures
//! - **Headless**: `rpt_view_mock::HeadlessHost` keeps an in-memory tree for
//!   unit tests
//!
//! The engine never holds host objects directly. Everything is addressed
//! through copyable [`NodeId`] and [`ListenerId`] handles, so a stale handle
//! can be checked with [`ViewHost::is_attached`] instead of keeping the
//! underlying node alive.

pub mod math;
mod escape;

use serde::{Deserialize, Serialize};

pub use escape::escape_html;
pub use math::{Rect, Size, Vec2};

/// Handle to a node owned by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw host identifier
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw identifier
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Handle to an event listener installed through the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw host identifier
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw identifier
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Kind of element the engine asks the host to create
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Generic block container
    Block,
    /// Header bar
    Header,
    /// Title heading
    Heading,
    /// Clickable button
    Button,
    /// Footer bar
    Footer,
    /// Paragraph of text
    Paragraph,
}

impl ElementKind {
    /// HTML tag used by DOM hosts
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Block => "div",
            ElementKind::Header => "header",
            ElementKind::Heading => "h2",
            ElementKind::Button => "button",
            ElementKind::Footer => "footer",
            ElementKind::Paragraph => "p",
        }
    }
}

/// Event category a listener subscribes to
///
/// Pointer kinds cover both mouse and touch input on DOM hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListenerKind {
    Click,
    PointerDown,
    PointerMove,
    PointerUp,
    /// Key presses; listeners on the document node run in the capture phase
    KeyDown,
    Submit,
}

/// Keys the engine distinguishes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Tab,
    Enter,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Input delivered by the host to a listener
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Input {
    Click,
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    KeyDown { key: Key, shift: bool },
    Submit,
}

/// Answers which descendants can currently take keyboard focus
///
/// Kept separate from [`ViewHost`] because the answer depends on live
/// visibility, which only the host can judge.
pub trait FocusOracle {
    /// Focusable, visible, enabled descendants of `root` in tree order
    fn focusable_within(&self, root: NodeId) -> Vec<NodeId>;
}

/// View host trait
///
/// Implementations own the real visual tree. The overlay engine builds and
/// mutates its nodes exclusively through this interface.
pub trait ViewHost: FocusOracle {
    // === Tree ===

    /// The document node (target for page-wide listeners)
    fn document(&self) -> NodeId;

    /// The default mount point
    fn body(&self) -> NodeId;

    /// Create a detached element
    fn create_element(&mut self, kind: ElementKind) -> NodeId;

    /// Append `child` as the last child of `parent`
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Attach a detached subtree under `parent`
    fn mount(&mut self, node: NodeId, parent: NodeId) {
        self.append_child(parent, node);
    }

    /// Detach a subtree from its parent, keeping it alive
    fn unmount(&mut self, node: NodeId);

    /// Drop a subtree; its handles become stale
    fn release(&mut self, node: NodeId);

    /// Whether the node is connected to the document
    fn is_attached(&self, node: NodeId) -> bool;

    /// Whether the handle refers to a live element that can hold children
    fn is_element(&self, node: NodeId) -> bool;

    // === Content ===

    /// Replace children with a text node
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Replace children with parsed markup
    fn set_markup(&mut self, node: NodeId, markup: &str);

    /// Replace children with an existing node
    fn set_child(&mut self, node: NodeId, child: NodeId);

    /// Remove all children
    fn clear(&mut self, node: NodeId);

    // === Presentation ===

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    /// Add or remove a class
    fn set_class(&mut self, node: NodeId, class: &str, on: bool);

    /// Set (`Some`) or clear (`None`) an inline style property
    fn set_style(&mut self, node: NodeId, property: &str, value: Option<&str>);

    fn set_disabled(&mut self, node: NodeId, disabled: bool);

    fn set_z_index(&mut self, node: NodeId, z: i32);

    /// Place the node's top-left corner in viewport coordinates
    fn set_position(&mut self, node: NodeId, position: Vec2);

    fn set_size(&mut self, node: NodeId, size: Size);

    // === Geometry ===

    /// Bounding box in viewport coordinates
    fn measure(&self, node: NodeId) -> Rect;

    /// Viewport dimensions
    fn viewport(&self) -> Size;

    // === Focus ===

    fn focused(&self) -> Option<NodeId>;

    fn focus(&mut self, node: NodeId);

    // === Page scroll ===

    /// Current background overflow style of the page
    fn background_overflow(&self) -> String;

    fn set_background_overflow(&mut self, value: &str);

    // === Listeners ===

    /// Install a listener; the host reports events as `(ListenerId, Input)`
    fn add_listener(&mut self, node: NodeId, kind: ListenerKind) -> ListenerId;

    /// Remove a listener; unknown ids are ignored
    fn remove_listener(&mut self, id: ListenerId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("Tab"), Key::Tab);
        assert_eq!(Key::from_dom("a"), Key::Other("a".to_string()));
    }

    #[test]
    fn test_input_serializes_tagged() {
        let json = serde_json::to_string(&Input::PointerMove { x: 1.0, y: 2.0 }).unwrap();
        assert!(json.contains("\"type\":\"pointerMove\""));
    }

    #[test]
    fn test_element_tags() {
        assert_eq!(ElementKind::Button.tag(), "button");
        assert_eq!(ElementKind::Block.tag(), "div");
    }
}

//! Slot content for title, body, footer and error line

use std::rc::Rc;

use rpt_view::{escape_html, NodeId, ViewHost};

/// Content placed into one of the panel's slots
#[derive(Clone, Default)]
pub enum SlotContent {
    #[default]
    Empty,
    /// Plain text, never parsed
    Text(String),
    /// Markup; escaped unless the overlay disables sanitizing
    Markup(String),
    /// An existing host node, moved into the slot
    Node(NodeId),
    /// Produced on demand each time the slot is rendered
    Lazy(Rc<dyn Fn() -> SlotContent>),
}

impl SlotContent {
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn() -> SlotContent + 'static,
    {
        SlotContent::Lazy(Rc::new(f))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SlotContent::Empty)
    }

    /// Write this content into `node`, replacing what was there
    pub fn render<H: ViewHost>(&self, host: &mut H, node: NodeId, sanitize: bool) {
        match self {
            SlotContent::Empty => host.clear(node),
            SlotContent::Text(text) => host.set_text(node, text),
            SlotContent::Markup(markup) if sanitize => host.set_markup(node, &escape_html(markup)),
            SlotContent::Markup(markup) => host.set_markup(node, markup),
            SlotContent::Node(child) => host.set_child(node, *child),
            SlotContent::Lazy(produce) => produce().render(host, node, sanitize),
        }
    }
}

impl std::fmt::Debug for SlotContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotContent::Empty => f.write_str("Empty"),
            SlotContent::Text(t) => f.debug_tuple("Text").field(t).finish(),
            SlotContent::Markup(m) => f.debug_tuple("Markup").field(m).finish(),
            SlotContent::Node(n) => f.debug_tuple("Node").field(n).finish(),
            SlotContent::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<&str> for SlotContent {
    fn from(text: &str) -> Self {
        SlotContent::Text(text.to_string())
    }
}

impl From<String> for SlotContent {
    fn from(text: String) -> Self {
        SlotContent::Text(text)
    }
}

impl From<NodeId> for SlotContent {
    fn from(node: NodeId) -> Self {
        SlotContent::Node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpt_view::ElementKind;
    use rpt_view_mock::HeadlessHost;

    #[test]
    fn test_markup_escaped_when_sanitizing() {
        let mut host = HeadlessHost::new();
        let slot = host.create_element(ElementKind::Block);

        SlotContent::Markup("<b>x</b>".into()).render(&mut host, slot, true);
        assert_eq!(host.markup_of(slot).as_deref(), Some("&lt;b&gt;x&lt;/b&gt;"));

        SlotContent::Markup("<b>x</b>".into()).render(&mut host, slot, false);
        assert_eq!(host.markup_of(slot).as_deref(), Some("<b>x</b>"));
    }

    #[test]
    fn test_text_and_node() {
        let mut host = HeadlessHost::new();
        let slot = host.create_element(ElementKind::Block);

        SlotContent::from("<i>").render(&mut host, slot, false);
        assert_eq!(host.text_of(slot).as_deref(), Some("<i>"));

        let child = host.create_element(ElementKind::Paragraph);
        SlotContent::from(child).render(&mut host, slot, true);
        assert_eq!(host.children_of(slot), vec![child]);

        SlotContent::Empty.render(&mut host, slot, true);
        assert!(host.children_of(slot).is_empty());
    }

    #[test]
    fn test_lazy_produced_on_render() {
        let mut host = HeadlessHost::new();
        let slot = host.create_element(ElementKind::Block);
        let content = SlotContent::lazy(|| SlotContent::Text("late".into()));

        content.render(&mut host, slot, true);
        assert_eq!(host.text_of(slot).as_deref(), Some("late"));
        assert_eq!(format!("{content:?}"), "Lazy(..)");
    }
}

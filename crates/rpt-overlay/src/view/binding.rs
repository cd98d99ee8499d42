//! Overlay view tree
//!
//! Every overlay owns one tree built at construction:
//!
//! ```text
//! root
//! ├── backdrop
//! └── panel
//!     ├── header
//!     │   ├── title
//!     │   └── close button
//!     ├── body
//!     ├── error line
//!     ├── footer
//!     └── resize handles (right, bottom, corner)
//! ```
//!
//! Optional parts are always created and toggled with the `hidden`
//! attribute, so `update_options` never has to rebuild the tree.

use rpt_view::{ElementKind, NodeId, Size, Vec2, ViewHost};

use super::slot::SlotContent;
use crate::overlay::{OverlayConfig, OverlayId, Position, ResizeEdge};
use crate::transition::Animation;

pub const CLASS_ROOT: &str = "rpt-overlay";
pub const CLASS_OPEN: &str = "is-open";
pub const CLASS_SHAKE: &str = "is-shaking";
pub const CLASS_LOADING: &str = "is-loading";
pub const CLASS_DRAGGING: &str = "is-dragging";
pub const CLASS_RESIZING: &str = "is-resizing";
pub const CLASS_DRAGGABLE: &str = "is-draggable";

/// CSS custom property carrying the transition duration
const DURATION_PROPERTY: &str = "--rpt-overlay-duration";

/// Which content slot to fill
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Title,
    Content,
    Footer,
}

/// Node handles of one overlay's tree
#[derive(Clone, Debug)]
pub struct OverlayView {
    pub root: NodeId,
    pub backdrop: NodeId,
    pub panel: NodeId,
    pub header: NodeId,
    pub title: NodeId,
    pub close_button: NodeId,
    pub body: NodeId,
    pub error: NodeId,
    pub footer: NodeId,
    pub handles: Vec<(ResizeEdge, NodeId)>,
}

fn element<H: ViewHost>(host: &mut H, kind: ElementKind, class: &str) -> NodeId {
    let node = host.create_element(kind);
    host.set_class(node, class, true);
    node
}

fn set_hidden<H: ViewHost>(host: &mut H, node: NodeId, hidden: bool) {
    if hidden {
        host.set_attribute(node, "hidden", "");
    } else {
        host.remove_attribute(node, "hidden");
    }
}

fn px(value: f32) -> String {
    format!("{value}px")
}

impl OverlayView {
    /// Build the detached tree and fill it from `config`
    pub fn build<H: ViewHost>(host: &mut H, id: &OverlayId, config: &OverlayConfig) -> Self {
        let root = element(host, ElementKind::Block, CLASS_ROOT);
        host.set_attribute(root, "data-overlay-id", id.as_str());

        let backdrop = element(host, ElementKind::Block, "rpt-overlay__backdrop");
        host.append_child(root, backdrop);

        let panel = element(host, ElementKind::Block, "rpt-overlay__panel");
        host.set_attribute(panel, "tabindex", "-1");
        host.append_child(root, panel);

        let header = element(host, ElementKind::Header, "rpt-overlay__header");
        host.append_child(panel, header);

        let title = element(host, ElementKind::Heading, "rpt-overlay__title");
        host.set_attribute(title, "id", &format!("{id}-title"));
        host.append_child(header, title);

        let close_button = element(host, ElementKind::Button, "rpt-overlay__close");
        host.set_attribute(close_button, "aria-label", "Close");
        host.set_text(close_button, "\u{00d7}");
        host.append_child(header, close_button);

        let body = element(host, ElementKind::Block, "rpt-overlay__body");
        host.append_child(panel, body);

        let error = element(host, ElementKind::Paragraph, "rpt-overlay__error");
        host.set_attribute(error, "role", "alert");
        set_hidden(host, error, true);
        host.append_child(panel, error);

        let footer = element(host, ElementKind::Footer, "rpt-overlay__footer");
        host.append_child(panel, footer);

        let handles = ResizeEdge::ALL
            .into_iter()
            .map(|edge| {
                let handle = element(host, ElementKind::Block, "rpt-overlay__handle");
                host.set_class(handle, &format!("rpt-overlay__handle--{}", edge.as_str()), true);
                host.append_child(panel, handle);
                (edge, handle)
            })
            .collect();

        let view = Self {
            root,
            backdrop,
            panel,
            header,
            title,
            close_button,
            body,
            error,
            footer,
            handles,
        };

        view.render_slot(host, Slot::Title, &config.title, config.sanitize_html);
        view.render_slot(host, Slot::Content, &config.content, config.sanitize_html);
        view.render_slot(host, Slot::Footer, &config.footer, config.sanitize_html);
        view.apply_presentation(host, config);
        view
    }

    pub fn slot_node(&self, slot: Slot) -> NodeId {
        match slot {
            Slot::Title => self.title,
            Slot::Content => self.body,
            Slot::Footer => self.footer,
        }
    }

    pub fn handle(&self, edge: ResizeEdge) -> Option<NodeId> {
        self.handles
            .iter()
            .find(|(e, _)| *e == edge)
            .map(|(_, node)| *node)
    }

    pub fn render_slot<H: ViewHost>(
        &self,
        host: &mut H,
        slot: Slot,
        content: &SlotContent,
        sanitize: bool,
    ) {
        let node = self.slot_node(slot);
        content.render(host, node, sanitize);
        if slot == Slot::Footer {
            set_hidden(host, node, content.is_empty());
        }
    }

    /// Show (`Some`) or hide (`None`) the error line
    pub fn render_error<H: ViewHost>(
        &self,
        host: &mut H,
        content: Option<&SlotContent>,
        sanitize: bool,
    ) {
        match content {
            Some(content) => {
                content.render(host, self.error, sanitize);
                set_hidden(host, self.error, false);
            }
            None => {
                host.clear(self.error);
                set_hidden(host, self.error, true);
            }
        }
    }

    /// Apply theme, role, size limits, animation and optional parts
    pub fn apply_presentation<H: ViewHost>(&self, host: &mut H, config: &OverlayConfig) {
        host.set_attribute(self.panel, "data-theme", config.theme.as_str());
        host.set_attribute(self.panel, "role", config.role.as_str());
        host.set_attribute(
            self.panel,
            "aria-modal",
            if config.modal { "true" } else { "false" },
        );
        host.set_attribute(self.panel, "aria-labelledby", &format!("{}-title", config.id));

        set_hidden(host, self.backdrop, !config.modal);
        set_hidden(host, self.close_button, !config.close_button);

        if let Some(size) = config.size {
            host.set_size(self.panel, size);
        }
        let max_width = config.max_width.map(px);
        host.set_style(self.panel, "max-width", max_width.as_deref());
        let max_height = config.max_height.map(px);
        host.set_style(self.panel, "max-height", max_height.as_deref());

        for anim in Animation::ANIMATED {
            if let Some(class) = anim.class_name() {
                host.set_class(self.root, class, anim == config.animation);
            }
        }
        let duration = format!("{}ms", config.effective_duration_ms());
        host.set_style(self.root, DURATION_PROPERTY, Some(&duration));

        if let Some(class) = &config.class_name {
            host.set_class(self.root, class, true);
        }

        host.set_class(self.header, CLASS_DRAGGABLE, config.draggable);
        for (edge, handle) in &self.handles {
            set_hidden(host, *handle, !config.resize_enabled(*edge));
        }
    }

    pub fn mount<H: ViewHost>(&self, host: &mut H, parent: NodeId) {
        host.mount(self.root, parent);
    }

    pub fn unmount<H: ViewHost>(&self, host: &mut H) {
        host.unmount(self.root);
    }

    /// Place the panel at its configured position; returns the top-left corner
    pub fn place<H: ViewHost>(&self, host: &mut H, position: Position) -> Vec2 {
        let panel = host.measure(self.panel).size();
        let pos = position.resolve(panel, host.viewport());
        host.set_position(self.panel, pos);
        pos
    }

    pub fn panel_size<H: ViewHost>(&self, host: &H) -> Size {
        host.measure(self.panel).size()
    }

    /// Stack the panel at `z` with the backdrop just beneath it
    pub fn apply_z<H: ViewHost>(&self, host: &mut H, z: i32) {
        host.set_z_index(self.backdrop, z - 1);
        host.set_z_index(self.panel, z);
    }

    pub fn set_open<H: ViewHost>(&self, host: &mut H, open: bool) {
        host.set_class(self.root, CLASS_OPEN, open);
        host.set_attribute(self.root, "aria-hidden", if open { "false" } else { "true" });
    }

    /// Drop the whole tree
    pub fn release<H: ViewHost>(&self, host: &mut H) {
        host.release(self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpt_view_mock::HeadlessHost;

    fn build(config: &OverlayConfig) -> (HeadlessHost, OverlayView) {
        let mut host = HeadlessHost::new();
        let view = OverlayView::build(&mut host, &OverlayId::new(config.id.clone()), config);
        (host, view)
    }

    #[test]
    fn test_build_structure() {
        let (host, view) = build(&OverlayConfig::new("dlg"));

        assert_eq!(host.children_of(view.root), vec![view.backdrop, view.panel]);
        assert_eq!(host.parent_of(view.title), Some(view.header));
        assert_eq!(host.parent_of(view.close_button), Some(view.header));
        assert_eq!(view.handles.len(), 3);
        assert_eq!(host.attribute(view.title, "id").as_deref(), Some("dlg-title"));
        assert_eq!(host.attribute(view.panel, "role").as_deref(), Some("dialog"));
        assert_eq!(host.attribute(view.panel, "aria-modal").as_deref(), Some("true"));
        assert!(!host.is_attached(view.root));
    }

    #[test]
    fn test_optional_parts_hidden() {
        let config = OverlayConfig {
            modal: false,
            close_button: false,
            resizable: true,
            resize_edges: vec![ResizeEdge::Corner],
            ..OverlayConfig::new("dlg")
        };
        let (host, view) = build(&config);

        assert!(host.attribute(view.backdrop, "hidden").is_some());
        assert!(host.attribute(view.close_button, "hidden").is_some());
        assert!(host.attribute(view.error, "hidden").is_some());
        let corner = view.handle(ResizeEdge::Corner).unwrap();
        let right = view.handle(ResizeEdge::Right).unwrap();
        assert!(host.attribute(corner, "hidden").is_none());
        assert!(host.attribute(right, "hidden").is_some());
    }

    #[test]
    fn test_presentation_classes_and_styles() {
        let config = OverlayConfig {
            max_width: Some(600.0),
            class_name: Some("wide".into()),
            animation: Animation::Scale,
            ..OverlayConfig::new("dlg")
        };
        let (host, view) = build(&config);

        assert!(host.has_class(view.root, "wide"));
        assert!(host.has_class(view.root, "rpt-anim-scale"));
        assert!(!host.has_class(view.root, "rpt-anim-fade"));
        assert_eq!(host.style(view.panel, "max-width").as_deref(), Some("600px"));
        assert_eq!(host.style(view.panel, "max-height"), None);
        assert_eq!(
            host.style(view.root, DURATION_PROPERTY).as_deref(),
            Some("200ms")
        );
    }

    #[test]
    fn test_place_and_z() {
        let config = OverlayConfig {
            size: Some(Size::new(400.0, 200.0)),
            ..OverlayConfig::new("dlg")
        };
        let (mut host, view) = build(&config);

        let pos = view.place(&mut host, Position::Center);
        assert_eq!(pos, Vec2::new(440.0, 300.0));
        assert_eq!(host.measure(view.panel).position(), pos);

        view.apply_z(&mut host, 1002);
        assert_eq!(host.z_index(view.panel), Some(1002));
        assert_eq!(host.z_index(view.backdrop), Some(1001));
    }

    #[test]
    fn test_error_line_toggle() {
        let (mut host, view) = build(&OverlayConfig::new("dlg"));

        view.render_error(&mut host, Some(&SlotContent::from("Required")), true);
        assert_eq!(host.text_of(view.error).as_deref(), Some("Required"));
        assert!(host.attribute(view.error, "hidden").is_none());

        view.render_error(&mut host, None, true);
        assert!(host.attribute(view.error, "hidden").is_some());
        assert_eq!(host.text_of(view.error), None);
    }
}

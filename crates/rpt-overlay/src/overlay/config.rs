//! Overlay configuration

use rpt_view::{NodeId, Size, Vec2};
use serde::{Deserialize, Serialize};

use super::event::{Callback, EventKind};
use crate::error::{OverlayError, Result};
use crate::transition::{Animation, DEFAULT_DURATION_MS};
use crate::view::SlotContent;

/// Gap kept between a `TopRight` overlay and the viewport edges
pub const TOP_RIGHT_MARGIN: f32 = 16.0;

/// Accessibility role of the panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    #[default]
    Dialog,
    AlertDialog,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Dialog => "dialog",
            Role::AlertDialog => "alertdialog",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Auto => "auto",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Initial placement of the panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Position {
    #[default]
    Center,
    /// Pinned to the top-right corner with a fixed margin
    TopRight,
    /// Explicit top-left corner
    At { x: f32, y: f32 },
    /// Offset from the right viewport edge
    FromRight { right: f32, y: f32 },
}

impl Position {
    /// Top-left corner for a panel of `panel` size in `viewport`
    pub fn resolve(&self, panel: Size, viewport: Size) -> Vec2 {
        match *self {
            Position::Center => Vec2::new(
                ((viewport.width - panel.width) / 2.0).max(0.0),
                ((viewport.height - panel.height) / 2.0).max(0.0),
            ),
            Position::TopRight => Vec2::new(
                (viewport.width - panel.width - TOP_RIGHT_MARGIN).max(0.0),
                TOP_RIGHT_MARGIN,
            ),
            Position::At { x, y } => Vec2::new(x, y),
            Position::FromRight { right, y } => {
                Vec2::new((viewport.width - panel.width - right).max(0.0), y)
            }
        }
    }
}

/// Panel edge that carries a resize handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeEdge {
    Right,
    Bottom,
    Corner,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 3] = [ResizeEdge::Right, ResizeEdge::Bottom, ResizeEdge::Corner];

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeEdge::Right => "right",
            ResizeEdge::Bottom => "bottom",
            ResizeEdge::Corner => "corner",
        }
    }

    #[inline]
    pub fn affects_width(self) -> bool {
        matches!(self, ResizeEdge::Right | ResizeEdge::Corner)
    }

    #[inline]
    pub fn affects_height(self) -> bool {
        matches!(self, ResizeEdge::Bottom | ResizeEdge::Corner)
    }
}

/// Single-slot option callbacks, invoked after registered listeners
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_before_open: Option<Callback>,
    pub on_open: Option<Callback>,
    pub on_before_close: Option<Callback>,
    pub on_close: Option<Callback>,
    pub on_esc: Option<Callback>,
    pub on_backdrop: Option<Callback>,
    pub on_drag_start: Option<Callback>,
    pub on_drag: Option<Callback>,
    pub on_drag_end: Option<Callback>,
    pub on_resize_start: Option<Callback>,
    pub on_resize: Option<Callback>,
    pub on_resize_end: Option<Callback>,
}

impl Callbacks {
    pub fn get(&self, kind: EventKind) -> Option<&Callback> {
        match kind {
            EventKind::BeforeOpen => self.on_before_open.as_ref(),
            EventKind::Open => self.on_open.as_ref(),
            EventKind::BeforeClose => self.on_before_close.as_ref(),
            EventKind::Close => self.on_close.as_ref(),
            EventKind::Esc => self.on_esc.as_ref(),
            EventKind::Backdrop => self.on_backdrop.as_ref(),
            EventKind::DragStart => self.on_drag_start.as_ref(),
            EventKind::Drag => self.on_drag.as_ref(),
            EventKind::DragEnd => self.on_drag_end.as_ref(),
            EventKind::ResizeStart => self.on_resize_start.as_ref(),
            EventKind::Resize => self.on_resize.as_ref(),
            EventKind::ResizeEnd => self.on_resize_end.as_ref(),
        }
    }

    fn configured(&self) -> Vec<&'static str> {
        EventKind::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_some())
            .map(EventKind::as_str)
            .collect()
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.configured()).finish()
    }
}

/// Overlay configuration
#[derive(Clone, Debug)]
pub struct OverlayConfig {
    /// Unique id within the coordinator; must not be empty
    pub id: String,
    pub modal: bool,
    /// Mount point; `None` mounts into the host body
    pub mount: Option<NodeId>,
    pub esc_close: bool,
    pub backdrop_close: bool,
    pub close_button: bool,
    pub trap_focus: bool,
    pub restore_focus: bool,
    pub role: Role,
    /// Explicit panel size; `None` keeps the host's natural size
    pub size: Option<Size>,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    pub position: Position,
    pub theme: Theme,
    pub animation: Animation,
    pub duration_ms: f64,
    pub title: SlotContent,
    pub content: SlotContent,
    pub footer: SlotContent,
    /// Escape `SlotContent::Markup` instead of injecting it
    pub sanitize_html: bool,
    pub draggable: bool,
    /// Drag handle; `None` uses the header
    pub drag_handle: Option<NodeId>,
    pub resizable: bool,
    pub resize_edges: Vec<ResizeEdge>,
    pub keep_in_viewport: bool,
    /// Extra class on the overlay root
    pub class_name: Option<String>,
    /// Release the overlay once its close completes
    pub dispose_on_close: bool,
    /// Log listener failures
    pub debug: bool,
    pub callbacks: Callbacks,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            modal: true,
            mount: None,
            esc_close: true,
            backdrop_close: true,
            close_button: true,
            trap_focus: true,
            restore_focus: true,
            role: Role::Dialog,
            size: None,
            max_width: None,
            max_height: None,
            position: Position::Center,
            theme: Theme::Auto,
            animation: Animation::Fade,
            duration_ms: DEFAULT_DURATION_MS,
            title: SlotContent::Empty,
            content: SlotContent::Empty,
            footer: SlotContent::Empty,
            sanitize_html: true,
            draggable: true,
            drag_handle: None,
            resizable: false,
            resize_edges: ResizeEdge::ALL.to_vec(),
            keep_in_viewport: true,
            class_name: None,
            dispose_on_close: false,
            debug: false,
            callbacks: Callbacks::default(),
        }
    }
}

impl OverlayConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Duration actually used for open/close; zero without animation
    pub fn effective_duration_ms(&self) -> f64 {
        match self.animation {
            Animation::None => 0.0,
            _ => self.duration_ms.max(0.0),
        }
    }

    /// Whether a resize handle is active for `edge`
    pub fn resize_enabled(&self, edge: ResizeEdge) -> bool {
        self.resizable && self.resize_edges.contains(&edge)
    }
}

/// Partial update applied by `update_options`
#[derive(Clone, Debug, Default)]
pub struct OverlayPatch {
    pub modal: Option<bool>,
    pub esc_close: Option<bool>,
    pub backdrop_close: Option<bool>,
    pub close_button: Option<bool>,
    pub trap_focus: Option<bool>,
    pub restore_focus: Option<bool>,
    pub role: Option<Role>,
    pub size: Option<Size>,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    pub position: Option<Position>,
    pub theme: Option<Theme>,
    pub animation: Option<Animation>,
    pub duration_ms: Option<f64>,
    pub sanitize_html: Option<bool>,
    pub draggable: Option<bool>,
    pub resizable: Option<bool>,
    pub resize_edges: Option<Vec<ResizeEdge>>,
    pub keep_in_viewport: Option<bool>,
    pub class_name: Option<String>,
    pub debug: Option<bool>,
}

impl OverlayPatch {
    /// Whether the patch changes where or how large the panel is
    pub fn affects_geometry(&self) -> bool {
        self.size.is_some()
            || self.position.is_some()
            || self.max_width.is_some()
            || self.max_height.is_some()
    }

    pub fn apply(self, config: &mut OverlayConfig) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field { config.$field = v; })*
            };
        }
        merge!(
            modal,
            esc_close,
            backdrop_close,
            close_button,
            trap_focus,
            restore_focus,
            role,
            position,
            theme,
            animation,
            duration_ms,
            sanitize_html,
            draggable,
            resizable,
            resize_edges,
            keep_in_viewport,
            debug,
        );
        if self.size.is_some() {
            config.size = self.size;
        }
        if self.max_width.is_some() {
            config.max_width = self.max_width;
        }
        if self.max_height.is_some() {
            config.max_height = self.max_height;
        }
        if self.class_name.is_some() {
            config.class_name = self.class_name;
        }
    }
}

/// Data-only options accepted as JSON at the script boundary
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayOptions {
    pub id: String,
    pub modal: Option<bool>,
    pub esc_close: Option<bool>,
    pub backdrop_close: Option<bool>,
    pub close_button: Option<bool>,
    pub trap_focus: Option<bool>,
    pub restore_focus: Option<bool>,
    pub role: Option<Role>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    pub position: Option<Position>,
    pub theme: Option<Theme>,
    pub animation: Option<Animation>,
    pub duration: Option<f64>,
    pub title: Option<String>,
    /// Markup, escaped unless `sanitize_html` is false
    pub content: Option<String>,
    pub footer: Option<String>,
    pub sanitize_html: Option<bool>,
    pub draggable: Option<bool>,
    pub resizable: Option<bool>,
    pub resize_edges: Option<Vec<ResizeEdge>>,
    pub keep_in_viewport: Option<bool>,
    pub class_name: Option<String>,
    pub debug: Option<bool>,
}

impl OverlayOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: OverlayOptions = serde_json::from_str(json)?;
        if let (Some(w), Some(h)) = (options.width, options.height) {
            if w <= 0.0 || h <= 0.0 {
                return Err(OverlayError::InvalidOptions(format!(
                    "size must be positive, got {w}x{h}"
                )));
            }
        }
        Ok(options)
    }

    pub fn into_config(self) -> OverlayConfig {
        let defaults = OverlayConfig::default();
        let size = match (self.width, self.height) {
            (Some(width), Some(height)) => Some(Size::new(width, height)),
            _ => None,
        };

        OverlayConfig {
            id: self.id,
            modal: self.modal.unwrap_or(defaults.modal),
            esc_close: self.esc_close.unwrap_or(defaults.esc_close),
            backdrop_close: self.backdrop_close.unwrap_or(defaults.backdrop_close),
            close_button: self.close_button.unwrap_or(defaults.close_button),
            trap_focus: self.trap_focus.unwrap_or(defaults.trap_focus),
            restore_focus: self.restore_focus.unwrap_or(defaults.restore_focus),
            role: self.role.unwrap_or(defaults.role),
            size,
            max_width: self.max_width,
            max_height: self.max_height,
            position: self.position.unwrap_or(defaults.position),
            theme: self.theme.unwrap_or(defaults.theme),
            animation: self.animation.unwrap_or(defaults.animation),
            duration_ms: self.duration.unwrap_or(defaults.duration_ms),
            title: self.title.map(SlotContent::Text).unwrap_or_default(),
            content: self.content.map(SlotContent::Markup).unwrap_or_default(),
            footer: self.footer.map(SlotContent::Markup).unwrap_or_default(),
            sanitize_html: self.sanitize_html.unwrap_or(defaults.sanitize_html),
            draggable: self.draggable.unwrap_or(defaults.draggable),
            resizable: self.resizable.unwrap_or(defaults.resizable),
            resize_edges: self.resize_edges.unwrap_or(defaults.resize_edges),
            keep_in_viewport: self.keep_in_viewport.unwrap_or(defaults.keep_in_viewport),
            class_name: self.class_name,
            debug: self.debug.unwrap_or(defaults.debug),
            ..defaults
        }
    }
}

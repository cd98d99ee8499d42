//! WASM exports for the overlay coordinator
//!
//! [`DomHost`] renders overlays into the page through web-sys, and
//! [`OverlayController`] exposes the coordinator to JavaScript.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent,
};

use rpt_view::{
    ElementKind, FocusOracle, Input, Key, ListenerId, ListenerKind, NodeId, Rect, Size, Vec2,
    ViewHost,
};

use crate::coordinator::{Coordinator, OverlayMut};
use crate::input::InputResult;
use crate::overlay::{
    CloseReason, EventKind, ListenerResult, OverlayEvent, OverlayId, OverlayOptions,
};
use crate::presets::{self, AlertOptions, ConfirmOptions};
use crate::view::SlotContent;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);

    #[wasm_bindgen(js_namespace = Date, js_name = now)]
    fn date_now() -> f64;
}

const DOCUMENT: NodeId = NodeId::new(0);
const BODY: NodeId = NodeId::new(1);

/// Attribute mapping a DOM element back to its node id
const NODE_ATTRIBUTE: &str = "data-rpt-node";

const FOCUSABLE_SELECTOR: &str = "a[href], area[href], button:not([disabled]), \
    input:not([disabled]):not([type=hidden]), select:not([disabled]), \
    textarea:not([disabled]), iframe, [tabindex]:not([tabindex='-1']), \
    [contenteditable=true]";

/// Receives every DOM event a listener captured
type Sink = Rc<RefCell<Option<Box<dyn FnMut(ListenerId, Input) -> InputResult>>>>;

struct DomListener {
    target: EventTarget,
    capture: bool,
    closures: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

// =============================================================================
// DOM host
// =============================================================================

/// [`ViewHost`] backed by the browser DOM
pub struct DomHost {
    document: Document,
    nodes: RefCell<HashMap<NodeId, Element>>,
    /// Ids handed out by `adopt`; dropped once their element leaves the page
    adopted: RefCell<HashSet<NodeId>>,
    next_node: Cell<u64>,
    listeners: HashMap<ListenerId, DomListener>,
    next_listener: u64,
    sink: Sink,
}

impl DomHost {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("no document body"))?;

        let host = Self {
            document,
            nodes: RefCell::new(HashMap::new()),
            adopted: RefCell::new(HashSet::new()),
            next_node: Cell::new(BODY.raw() + 1),
            listeners: HashMap::new(),
            next_listener: 1,
            sink: Rc::new(RefCell::new(None)),
        };
        let body: Element = body.into();
        let _ = body.set_attribute(NODE_ATTRIBUTE, &BODY.raw().to_string());
        host.nodes.borrow_mut().insert(BODY, body);
        Ok(host)
    }

    /// Node id for an element created outside the engine
    ///
    /// Adopting a new element first forgets previously adopted elements that
    /// are no longer connected, so their ids stop resolving.
    pub fn adopt(&self, element: &Element) -> NodeId {
        if let Some(raw) = element
            .get_attribute(NODE_ATTRIBUTE)
            .and_then(|value| value.parse::<u64>().ok())
        {
            let node = NodeId::new(raw);
            if self.nodes.borrow().contains_key(&node) {
                return node;
            }
        }
        self.prune_adopted();
        let node = self.allocate();
        let _ = element.set_attribute(NODE_ATTRIBUTE, &node.raw().to_string());
        self.nodes.borrow_mut().insert(node, element.clone());
        self.adopted.borrow_mut().insert(node);
        node
    }

    /// Number of adopted elements still tracked
    pub fn adopted_count(&self) -> usize {
        self.adopted.borrow().len()
    }

    fn prune_adopted(&self) {
        let mut nodes = self.nodes.borrow_mut();
        self.adopted.borrow_mut().retain(|node| {
            let connected = nodes.get(node).is_some_and(|el| el.is_connected());
            if !connected {
                nodes.remove(node);
            }
            connected
        });
    }

    /// Element behind a node id
    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(&node).cloned()
    }

    fn allocate(&self) -> NodeId {
        let raw = self.next_node.get();
        self.next_node.set(raw + 1);
        NodeId::new(raw)
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn target(&self, node: NodeId) -> Option<EventTarget> {
        if node == DOCUMENT {
            return Some(self.document.clone().into());
        }
        self.element(node).map(Into::into)
    }

    fn style(&self, node: NodeId, property: &str, value: Option<&str>) {
        let Some(el) = self.html(node) else { return };
        let style = el.style();
        let _ = match value {
            Some(value) => style.set_property(property, value),
            None => style.remove_property(property).map(|_| ()),
        };
    }

    fn sink(&self) -> Sink {
        self.sink.clone()
    }
}

fn event_names(kind: ListenerKind) -> &'static [&'static str] {
    match kind {
        ListenerKind::Click => &["click"],
        ListenerKind::PointerDown => &["mousedown", "touchstart"],
        ListenerKind::PointerMove => &["mousemove", "touchmove"],
        ListenerKind::PointerUp => &["mouseup", "touchend", "touchcancel"],
        ListenerKind::KeyDown => &["keydown"],
        ListenerKind::Submit => &["submit"],
    }
}

fn pointer_position(event: &Event) -> Option<(f32, f32)> {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return Some((mouse.client_x() as f32, mouse.client_y() as f32));
    }
    let touch_event = event.dyn_ref::<TouchEvent>()?;
    let touch = touch_event
        .touches()
        .get(0)
        .or_else(|| touch_event.changed_touches().get(0))?;
    Some((touch.client_x() as f32, touch.client_y() as f32))
}

fn to_input(kind: ListenerKind, event: &Event) -> Option<Input> {
    match kind {
        ListenerKind::Click => Some(Input::Click),
        ListenerKind::PointerDown => {
            pointer_position(event).map(|(x, y)| Input::PointerDown { x, y })
        }
        ListenerKind::PointerMove => {
            pointer_position(event).map(|(x, y)| Input::PointerMove { x, y })
        }
        ListenerKind::PointerUp => Some(Input::PointerUp),
        ListenerKind::KeyDown => event.dyn_ref::<KeyboardEvent>().map(|key| Input::KeyDown {
            key: Key::from_dom(&key.key()),
            shift: key.shift_key(),
        }),
        ListenerKind::Submit => Some(Input::Submit),
    }
}

impl FocusOracle for DomHost {
    fn focusable_within(&self, root: NodeId) -> Vec<NodeId> {
        let Some(root) = self.element(root) else {
            return Vec::new();
        };
        let Ok(list) = root.query_selector_all(FOCUSABLE_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .filter(|el| !el.hidden() && (el.offset_width() > 0 || el.offset_height() > 0))
            .map(|el| self.adopt(&el))
            .collect()
    }
}

impl ViewHost for DomHost {
    fn document(&self) -> NodeId {
        DOCUMENT
    }

    fn body(&self) -> NodeId {
        BODY
    }

    fn create_element(&mut self, kind: ElementKind) -> NodeId {
        let node = self.allocate();
        match self.document.create_element(kind.tag()) {
            Ok(el) => {
                let _ = el.set_attribute(NODE_ATTRIBUTE, &node.raw().to_string());
                if kind == ElementKind::Button {
                    let _ = el.set_attribute("type", "button");
                }
                self.nodes.borrow_mut().insert(node, el);
            }
            Err(err) => log(&format!("[overlay] create_element failed: {err:?}")),
        }
        node
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let (Some(parent), Some(child)) = (self.element(parent), self.element(child)) {
            let _ = parent.append_child(&child);
        }
    }

    fn unmount(&mut self, node: NodeId) {
        if let Some(el) = self.element(node) {
            el.remove();
        }
    }

    fn release(&mut self, node: NodeId) {
        let Some(root) = self.element(node) else { return };
        root.remove();
        self.nodes
            .borrow_mut()
            .retain(|id, el| {
                let el: &web_sys::Node = el;
                *id != node && !root.contains(Some(el))
            });
        self.prune_adopted();
    }

    fn is_attached(&self, node: NodeId) -> bool {
        node == DOCUMENT || self.element(node).is_some_and(|el| el.is_connected())
    }

    fn is_element(&self, node: NodeId) -> bool {
        node != DOCUMENT && self.nodes.borrow().contains_key(&node)
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.element(node) {
            el.set_text_content(Some(text));
        }
    }

    fn set_markup(&mut self, node: NodeId, markup: &str) {
        if let Some(el) = self.element(node) {
            el.set_inner_html(markup);
        }
    }

    fn set_child(&mut self, node: NodeId, child: NodeId) {
        if let (Some(el), Some(child)) = (self.element(node), self.element(child)) {
            el.set_inner_html("");
            let _ = el.append_child(&child);
        }
    }

    fn clear(&mut self, node: NodeId) {
        if let Some(el) = self.element(node) {
            el.set_inner_html("");
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.set_attribute(name, value);
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.remove_attribute(name);
        }
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: Option<&str>) {
        self.style(node, property, value);
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if disabled {
            self.set_attribute(node, "disabled", "");
        } else {
            self.remove_attribute(node, "disabled");
        }
    }

    fn set_z_index(&mut self, node: NodeId, z: i32) {
        self.style(node, "z-index", Some(&z.to_string()));
    }

    fn set_position(&mut self, node: NodeId, position: Vec2) {
        self.style(node, "left", Some(&format!("{}px", position.x)));
        self.style(node, "top", Some(&format!("{}px", position.y)));
    }

    fn set_size(&mut self, node: NodeId, size: Size) {
        self.style(node, "width", Some(&format!("{}px", size.width)));
        self.style(node, "height", Some(&format!("{}px", size.height)));
    }

    fn measure(&self, node: NodeId) -> Rect {
        let Some(el) = self.element(node) else {
            return Rect::ZERO;
        };
        let rect = el.get_bounding_client_rect();
        Rect::new(
            rect.x() as f32,
            rect.y() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    fn viewport(&self) -> Size {
        let Some(window) = web_sys::window() else {
            return Size::new(0.0, 0.0);
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Size::new(width as f32, height as f32)
    }

    fn focused(&self) -> Option<NodeId> {
        self.document.active_element().map(|el| self.adopt(&el))
    }

    fn focus(&mut self, node: NodeId) {
        if let Some(el) = self.html(node) {
            let _ = el.focus();
        }
    }

    fn background_overflow(&self) -> String {
        self.html(BODY)
            .and_then(|body| body.style().get_property_value("overflow").ok())
            .unwrap_or_default()
    }

    fn set_background_overflow(&mut self, value: &str) {
        let value = (!value.is_empty()).then_some(value);
        self.style(BODY, "overflow", value);
    }

    fn add_listener(&mut self, node: NodeId, kind: ListenerKind) -> ListenerId {
        let id = ListenerId::new(self.next_listener);
        self.next_listener += 1;

        let Some(target) = self.target(node) else {
            return id;
        };
        let capture = node == DOCUMENT && kind == ListenerKind::KeyDown;

        let mut closures = Vec::new();
        for &name in event_names(kind) {
            let sink = self.sink();
            let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                if kind == ListenerKind::Submit {
                    event.prevent_default();
                }
                let Some(input) = to_input(kind, &event) else {
                    return;
                };
                // A nested event while the sink is busy goes unhandled
                let result = match sink.try_borrow_mut() {
                    Ok(mut slot) => match slot.as_mut() {
                        Some(deliver) => deliver(id, input),
                        None => InputResult::Unhandled,
                    },
                    Err(_) => InputResult::Unhandled,
                };
                if result.is_handled() {
                    event.prevent_default();
                    event.stop_propagation();
                }
            });
            let _ = target.add_event_listener_with_callback_and_bool(
                name,
                closure.as_ref().unchecked_ref(),
                capture,
            );
            closures.push((name, closure));
        }

        self.listeners.insert(
            id,
            DomListener {
                target,
                capture,
                closures,
            },
        );
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        let Some(listener) = self.listeners.remove(&id) else {
            return;
        };
        for (name, closure) in &listener.closures {
            let _ = listener.target.remove_event_listener_with_callback_and_bool(
                name,
                closure.as_ref().unchecked_ref(),
                listener.capture,
            );
        }
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Overlay controller for WASM - wraps the coordinator with a JS-friendly API
///
/// Overlay callbacks registered with `on` run while the controller is
/// dispatching. Calling back into the controller from inside one of them
/// fails with an `"overlay controller is busy"` error; defer such calls with
/// `queueMicrotask` or `setTimeout`.
#[wasm_bindgen]
pub struct OverlayController {
    inner: Rc<RefCell<Coordinator<DomHost>>>,
}

#[wasm_bindgen]
impl OverlayController {
    /// Create a controller rendering into the current document
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<OverlayController, JsValue> {
        console_error_panic_hook::set_once();

        let host = DomHost::new()?;
        let sink = host.sink();
        let inner = Rc::new(RefCell::new(Coordinator::new(host)));

        let weak: Weak<RefCell<Coordinator<DomHost>>> = Rc::downgrade(&inner);
        *sink.borrow_mut() = Some(Box::new(move |listener, input| {
            let Some(inner) = weak.upgrade() else {
                return InputResult::Unhandled;
            };
            let Ok(mut coordinator) = inner.try_borrow_mut() else {
                return InputResult::Unhandled;
            };
            coordinator.handle_input(listener, input, date_now())
        }));

        log("[overlay] controller ready");
        Ok(Self { inner })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create an overlay from JSON options, returning its id
    #[wasm_bindgen]
    pub fn create(&self, options_json: &str) -> Result<String, JsValue> {
        let config = OverlayOptions::from_json(options_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?
            .into_config();
        self.with(|c| c.create(config))?
            .map(|id| id.to_string())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn open(&self, id: &str) -> Result<bool, JsValue> {
        self.with(|c| c.open(&OverlayId::from(id), date_now()))
    }

    /// Close with a reason such as `"esc"` or `"close-button"`
    #[wasm_bindgen]
    pub fn close(&self, id: &str, reason: Option<String>) -> Result<bool, JsValue> {
        let reason = reason
            .map(|r| CloseReason::parse(&r))
            .unwrap_or(CloseReason::Custom("api".to_string()));
        self.with(|c| c.close(&OverlayId::from(id), reason, date_now()))
    }

    #[wasm_bindgen]
    pub fn toggle(&self, id: &str) -> Result<bool, JsValue> {
        self.with(|c| c.toggle(&OverlayId::from(id), date_now()))
    }

    #[wasm_bindgen]
    pub fn destroy(&self, id: &str) -> Result<bool, JsValue> {
        self.with(|c| c.destroy(&OverlayId::from(id), date_now()))
    }

    /// Complete due transitions; call once per animation frame
    #[wasm_bindgen]
    pub fn tick(&self) -> Result<u32, JsValue> {
        self.with(|c| c.tick(date_now()) as u32)
    }

    #[wasm_bindgen]
    pub fn bring_to_front(&self, id: &str) -> Result<(), JsValue> {
        self.with(|c| c.bring_to_front(&OverlayId::from(id)))
    }

    // =========================================================================
    // Content and feedback
    // =========================================================================

    #[wasm_bindgen]
    pub fn set_title(&self, id: &str, text: &str) -> Result<(), JsValue> {
        self.with_overlay(id, |o| o.set_title(text))
    }

    /// Replace the body with markup (escaped when the overlay sanitizes)
    #[wasm_bindgen]
    pub fn set_content_html(&self, id: &str, html: &str) -> Result<(), JsValue> {
        self.with_overlay(id, |o| o.set_content(SlotContent::Markup(html.to_string())))
    }

    #[wasm_bindgen]
    pub fn set_loading(&self, id: &str, loading: bool) -> Result<(), JsValue> {
        self.with_overlay(id, |o| o.set_loading(loading))
    }

    /// Show an error line, or hide it with `undefined`
    #[wasm_bindgen]
    pub fn set_error(&self, id: &str, message: Option<String>) -> Result<(), JsValue> {
        self.with_overlay(id, |o| o.set_error(message.map(SlotContent::Text)))
    }

    #[wasm_bindgen]
    pub fn shake(&self, id: &str) -> Result<(), JsValue> {
        self.with_overlay(id, |o| o.shake(date_now()))
    }

    /// Root element of an overlay, for styling or custom content
    #[wasm_bindgen]
    pub fn root_element(&self, id: &str) -> Result<Option<Element>, JsValue> {
        self.with(|c| {
            let root = c.get(&OverlayId::from(id))?.view().root;
            c.host().element(root)
        })
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe `callback` to an event such as `"beforeClose"`
    ///
    /// The callback receives `{ overlay, type, detail }`; returning `false`
    /// cancels cancelable events. The controller is busy while the callback
    /// runs, so controller calls made from it return an error.
    #[wasm_bindgen]
    pub fn on(&self, id: &str, event: &str, callback: js_sys::Function) -> Result<u32, JsValue> {
        let kind = EventKind::parse(event)
            .ok_or_else(|| JsValue::from_str(&format!("unknown event: {event}")))?;
        let subscription = self.with(|c| {
            c.overlay(&OverlayId::from(id))?
                .add_event_listener(kind, move |event| call_listener(&callback, event))
        })?;
        subscription
            .map(|s| s.raw() as u32)
            .ok_or_else(|| JsValue::from_str(&format!("unknown overlay: {id}")))
    }

    // =========================================================================
    // Presets
    // =========================================================================

    /// Ask a yes/no question; the promise resolves to a boolean
    #[wasm_bindgen]
    pub fn confirm(&self, message: String, title: Option<String>) -> js_sys::Promise {
        let answer = self.with(|c| {
            presets::confirm(
                c,
                ConfirmOptions {
                    title,
                    message,
                    ..Default::default()
                },
                date_now(),
            )
        });
        match answer {
            Ok(Ok(answer)) => wasm_bindgen_futures::future_to_promise(async move {
                Ok(JsValue::from_bool(answer.await))
            }),
            Ok(Err(err)) => js_sys::Promise::reject(&JsValue::from_str(&err.to_string())),
            Err(err) => js_sys::Promise::reject(&err),
        }
    }

    /// Show a message; the promise resolves once it is dismissed
    #[wasm_bindgen]
    pub fn alert(&self, message: String, title: Option<String>) -> js_sys::Promise {
        let ack = self.with(|c| {
            presets::alert(
                c,
                AlertOptions {
                    title,
                    message,
                    ..Default::default()
                },
                date_now(),
            )
        });
        match ack {
            Ok(Ok(ack)) => wasm_bindgen_futures::future_to_promise(async move {
                ack.await;
                Ok(JsValue::UNDEFINED)
            }),
            Ok(Err(err)) => js_sys::Promise::reject(&JsValue::from_str(&err.to_string())),
            Err(err) => js_sys::Promise::reject(&err),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Stack bottom to top with z-index and state as JSON
    #[wasm_bindgen]
    pub fn get_stack_json(&self) -> Result<String, JsValue> {
        self.with(|c| {
            let stack: Vec<_> = c
                .stack()
                .iter()
                .filter_map(|id| c.get(id))
                .map(|o| {
                    serde_json::json!({
                        "id": o.id().as_str(),
                        "state": o.state().as_str(),
                        "zIndex": o.z_index(),
                        "modal": o.is_modal(),
                    })
                })
                .collect();
            serde_json::to_string(&stack).unwrap_or_else(|_| "[]".to_string())
        })
    }

    #[wasm_bindgen]
    pub fn any_modal_open(&self) -> Result<bool, JsValue> {
        self.with(|c| c.any_modal_open())
    }

    #[wasm_bindgen]
    pub fn is_open(&self, id: &str) -> Result<bool, JsValue> {
        self.with(|c| c.get(&OverlayId::from(id)).is_some_and(|o| o.is_open()))
    }

    /// Whether a dispatch is in progress; other calls would fail right now
    #[wasm_bindgen]
    pub fn is_busy(&self) -> bool {
        self.inner.try_borrow_mut().is_err()
    }
}

impl OverlayController {
    /// Run `f` on the coordinator; errors while a dispatch holds it
    fn with<R>(&self, f: impl FnOnce(&mut Coordinator<DomHost>) -> R) -> Result<R, JsValue> {
        let mut coordinator = self
            .inner
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("overlay controller is busy"))?;
        Ok(f(&mut coordinator))
    }

    fn with_overlay(
        &self,
        id: &str,
        f: impl FnOnce(&mut OverlayMut<'_, DomHost>),
    ) -> Result<(), JsValue> {
        self.with(|c| {
            let mut overlay = c
                .try_overlay(&OverlayId::from(id))
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            f(&mut overlay);
            Ok(())
        })?
    }
}

/// Forward an overlay event to a JS callback
fn call_listener(callback: &js_sys::Function, event: &mut OverlayEvent) -> ListenerResult {
    let payload = serde_json::json!({
        "overlay": event.overlay().as_str(),
        "type": event.kind().as_str(),
        "detail": event.detail(),
    })
    .to_string();
    let arg = js_sys::JSON::parse(&payload).unwrap_or(JsValue::NULL);
    let returned = callback
        .call1(&JsValue::NULL, &arg)
        .map_err(|err| format!("listener threw: {err:?}"))?;
    if returned == JsValue::FALSE {
        event.prevent_default();
    }
    Ok(())
}

//! Browser tests for the DOM host
//!
//! Run with `wasm-pack test --headless --firefox -- --features wasm`.

#![cfg(all(target_arch = "wasm32", feature = "wasm"))]

use rpt_overlay::{Coordinator, DomHost, OverlayConfig, OverlayController, ViewHost};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_open_mounts_into_body() {
    let mut c = Coordinator::new(DomHost::new().unwrap());
    let id = c.create(OverlayConfig::new("web-dlg")).unwrap();
    let root = c.get(&id).unwrap().view().root;
    assert!(!c.host().is_attached(root));

    c.open(&id, 0.0);
    assert!(c.host().is_attached(root));
    assert_eq!(c.host().background_overflow(), "hidden");

    c.destroy(&id, 10.0);
    assert!(c.host().element(root).is_none());
    assert_eq!(c.host().background_overflow(), "");
}

#[wasm_bindgen_test]
fn test_controller_round_trip() {
    let controller = OverlayController::new().unwrap();
    assert!(!controller.is_busy());
    let id = controller
        .create(r#"{"id":"web-json","modal":false,"title":"Hello"}"#)
        .unwrap();
    assert!(controller.open(&id).unwrap());
    assert!(controller.is_open(&id).unwrap());
    assert!(!controller.any_modal_open().unwrap());
    assert!(controller.get_stack_json().unwrap().contains("web-json"));
    assert!(controller.destroy(&id).unwrap());
}

#[wasm_bindgen_test]
fn test_adopted_elements_forgotten_after_removal() {
    let host = DomHost::new().unwrap();
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();

    let first = document.create_element("button").unwrap();
    body.append_child(&first).unwrap();
    let first_id = host.adopt(&first);
    assert_eq!(host.adopt(&first), first_id);
    assert_eq!(host.adopted_count(), 1);

    first.remove();
    let second = document.create_element("button").unwrap();
    body.append_child(&second).unwrap();
    let second_id = host.adopt(&second);

    assert_ne!(second_id, first_id);
    assert!(host.element(first_id).is_none());
    assert!(host.element(second_id).is_some());
    assert_eq!(host.adopted_count(), 1);
    second.remove();
}

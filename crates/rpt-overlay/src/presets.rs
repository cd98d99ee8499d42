//! Confirm and alert dialogs
//!
//! Both build a message and a row of buttons, open a generated overlay and
//! hand back a future that resolves when the dialog closes. The overlay is
//! disposed once its close completes.
//!
//! ```ignore
//! let answer = confirm(&mut coordinator, ConfirmOptions {
//!     message: "Discard changes?".into(),
//!     ..Default::default()
//! }, now)?;
//! // ... drive input and tick ...
//! if answer.await { discard(); }
//! ```

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use rpt_view::{ElementKind, NodeId, ViewHost};

use crate::coordinator::Coordinator;
use crate::error::{OverlayError, Result};
use crate::overlay::{CloseReason, EventKind, OverlayConfig, OverlayId, Role};
use crate::view::SlotContent;

/// Base config for preset dialogs
fn preset_config() -> OverlayConfig {
    OverlayConfig {
        role: Role::AlertDialog,
        close_button: false,
        draggable: false,
        ..Default::default()
    }
}

#[derive(Clone, Debug)]
pub struct ConfirmOptions {
    pub title: Option<String>,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    /// Base overlay options; id, content, footer and disposal are overridden
    pub overlay: OverlayConfig,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            title: None,
            message: String::new(),
            confirm_text: "OK".to_string(),
            cancel_text: "Cancel".to_string(),
            overlay: preset_config(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AlertOptions {
    pub title: Option<String>,
    pub message: String,
    pub ok_text: String,
    pub overlay: OverlayConfig,
}

impl Default for AlertOptions {
    fn default() -> Self {
        Self {
            title: None,
            message: String::new(),
            ok_text: "OK".to_string(),
            overlay: preset_config(),
        }
    }
}

/// Resolves to `true` only if the dialog closed through its confirm button
#[must_use = "the answer is only available by awaiting the confirmation"]
pub struct Confirmation {
    overlay: OverlayId,
    receiver: oneshot::Receiver<bool>,
}

impl Confirmation {
    pub fn overlay(&self) -> &OverlayId {
        &self.overlay
    }
}

impl Future for Confirmation {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|answer| answer.unwrap_or(false))
    }
}

/// Resolves once the alert closes for any reason
#[must_use = "futures do nothing unless polled"]
pub struct Acknowledgement {
    overlay: OverlayId,
    receiver: oneshot::Receiver<()>,
}

impl Acknowledgement {
    pub fn overlay(&self) -> &OverlayId {
        &self.overlay
    }
}

impl Future for Acknowledgement {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        Pin::new(&mut self.receiver).poll(cx).map(|_| ())
    }
}

/// One button of a preset dialog
struct Action<'a> {
    label: &'a str,
    class: &'static str,
    reason: CloseReason,
}

/// What a preset dialog shows
struct Preset<'a> {
    prefix: &'static str,
    config: OverlayConfig,
    title: Option<String>,
    message: &'a str,
    actions: Vec<Action<'a>>,
}

/// Build message + button row, create and open the dialog
fn open_preset<H, F>(
    coordinator: &mut Coordinator<H>,
    preset: Preset<'_>,
    on_close: F,
    now_ms: f64,
) -> Result<OverlayId>
where
    H: ViewHost,
    F: Fn(&CloseReason) + 'static,
{
    let id = coordinator.generate_id(preset.prefix);
    let host = coordinator.host_mut();

    let body = host.create_element(ElementKind::Paragraph);
    host.set_class(body, "rpt-overlay__message", true);
    host.set_text(body, preset.message);

    let actions = host.create_element(ElementKind::Block);
    host.set_class(actions, "rpt-overlay__actions", true);
    let buttons: Vec<(NodeId, CloseReason)> = preset
        .actions
        .into_iter()
        .map(|action| {
            let node = host.create_element(ElementKind::Button);
            host.set_class(node, action.class, true);
            host.set_text(node, action.label);
            host.append_child(actions, node);
            (node, action.reason)
        })
        .collect();

    let mut config = preset.config;
    config.id = id.to_string();
    if let Some(title) = preset.title {
        config.title = SlotContent::Text(title);
    }
    config.content = SlotContent::Node(body);
    config.footer = SlotContent::Node(actions);
    config.dispose_on_close = true;

    let id = match coordinator.create(config) {
        Ok(id) => id,
        Err(err) => {
            let host = coordinator.host_mut();
            host.release(body);
            host.release(actions);
            return Err(err);
        }
    };

    let mut overlay = coordinator
        .overlay(&id)
        .ok_or_else(|| OverlayError::UnknownOverlay(id.to_string()))?;
    for (node, reason) in buttons {
        overlay.add_action(node, reason);
    }
    overlay.add_event_listener(EventKind::Close, move |event| {
        if let Some(reason) = event.reason() {
            on_close(reason);
        }
        Ok(())
    });
    overlay.open(now_ms);
    Ok(id)
}

/// Ask a yes/no question
pub fn confirm<H: ViewHost>(
    coordinator: &mut Coordinator<H>,
    options: ConfirmOptions,
    now_ms: f64,
) -> Result<Confirmation> {
    let (tx, receiver) = oneshot::channel();
    let sender = Cell::new(Some(tx));

    let preset = Preset {
        prefix: "confirm",
        config: options.overlay,
        title: options.title,
        message: &options.message,
        actions: vec![
            Action {
                label: &options.cancel_text,
                class: "rpt-overlay__cancel",
                reason: CloseReason::Cancel,
            },
            Action {
                label: &options.confirm_text,
                class: "rpt-overlay__confirm",
                reason: CloseReason::Confirmed,
            },
        ],
    };
    let overlay = open_preset(
        coordinator,
        preset,
        move |reason| {
            if let Some(tx) = sender.take() {
                let _ = tx.send(*reason == CloseReason::Confirmed);
            }
        },
        now_ms,
    )?;
    tracing::debug!(overlay = %overlay, "confirm opened");
    Ok(Confirmation { overlay, receiver })
}

/// Show a message with a single acknowledge button
pub fn alert<H: ViewHost>(
    coordinator: &mut Coordinator<H>,
    options: AlertOptions,
    now_ms: f64,
) -> Result<Acknowledgement> {
    let (tx, receiver) = oneshot::channel();
    let sender = Cell::new(Some(tx));

    let preset = Preset {
        prefix: "alert",
        config: options.overlay,
        title: options.title,
        message: &options.message,
        actions: vec![Action {
            label: &options.ok_text,
            class: "rpt-overlay__ok",
            reason: CloseReason::Ok,
        }],
    };
    let overlay = open_preset(
        coordinator,
        preset,
        move |_| {
            if let Some(tx) = sender.take() {
                let _ = tx.send(());
            }
        },
        now_ms,
    )?;
    tracing::debug!(overlay = %overlay, "alert opened");
    Ok(Acknowledgement { overlay, receiver })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use rpt_view::{FocusOracle, Input, ListenerKind};
    use rpt_view_mock::HeadlessHost;

    fn coordinator() -> Coordinator<HeadlessHost> {
        Coordinator::new(HeadlessHost::new())
    }

    fn click_button(c: &mut Coordinator<HeadlessHost>, id: &OverlayId, index: usize, now: f64) {
        let footer = c.get(id).unwrap().view().footer;
        let buttons = c.host().focusable_within(footer);
        let listener = c.host().listeners_on(buttons[index], ListenerKind::Click)[0];
        c.handle_input(listener, Input::Click, now);
    }

    #[test]
    fn test_confirm_resolves_true_on_confirm() {
        let mut c = coordinator();
        let answer = confirm(
            &mut c,
            ConfirmOptions {
                message: "Discard?".into(),
                ..Default::default()
            },
            0.0,
        )
        .unwrap();
        let id = answer.overlay().clone();
        assert_eq!(id.as_str(), "confirm-1");
        assert_eq!(
            c.get(&id).unwrap().config().role,
            Role::AlertDialog
        );

        c.tick(200.0);
        click_button(&mut c, &id, 1, 300.0);
        c.tick(500.0);

        assert!(block_on(answer));
        assert!(!c.contains(&id));
    }

    #[test]
    fn test_confirm_resolves_false_on_cancel_and_esc() {
        let mut c = coordinator();
        let answer = confirm(&mut c, ConfirmOptions::default(), 0.0).unwrap();
        let id = answer.overlay().clone();
        click_button(&mut c, &id, 0, 10.0);
        c.tick(300.0);
        assert!(!block_on(answer));

        let answer = confirm(&mut c, ConfirmOptions::default(), 400.0).unwrap();
        let escape = c.escape_listener().unwrap();
        c.handle_input(
            escape,
            Input::KeyDown {
                key: rpt_view::Key::Escape,
                shift: false,
            },
            500.0,
        );
        c.tick(800.0);
        assert!(!block_on(answer));
    }

    #[test]
    fn test_confirm_resolves_true_on_named_close() {
        let mut c = coordinator();
        let answer = confirm(&mut c, ConfirmOptions::default(), 0.0).unwrap();
        let id = answer.overlay().clone();
        c.tick(200.0);

        assert!(c.close(&id, CloseReason::parse("confirmed"), 300.0));
        c.tick(500.0);
        assert!(block_on(answer));
    }

    #[test]
    fn test_confirm_resolves_false_on_destroy() {
        let mut c = coordinator();
        let answer = confirm(&mut c, ConfirmOptions::default(), 0.0).unwrap();
        let id = answer.overlay().clone();
        c.destroy(&id, 10.0);
        assert!(!block_on(answer));
        assert_eq!(c.host().listener_count(), 1);
    }

    #[test]
    fn test_alert_resolves_on_ok() {
        let mut c = coordinator();
        let ack = alert(
            &mut c,
            AlertOptions {
                title: Some("Saved".into()),
                message: "Report saved".into(),
                ..Default::default()
            },
            0.0,
        )
        .unwrap();
        let id = ack.overlay().clone();
        assert!(id.as_str().starts_with("alert-"));
        let title = c.get(&id).unwrap().view().title;
        assert_eq!(c.host().text_of(title).as_deref(), Some("Saved"));

        click_button(&mut c, &id, 0, 50.0);
        c.tick(300.0);
        block_on(ack);
        assert!(c.stack().is_empty());
    }

    #[test]
    fn test_preset_focuses_first_button() {
        let mut c = coordinator();
        let answer = confirm(&mut c, ConfirmOptions::default(), 0.0).unwrap();
        let id = answer.overlay().clone();
        c.tick(0.0);

        let footer = c.get(&id).unwrap().view().footer;
        let cancel = c.host().focusable_within(footer)[0];
        assert_eq!(c.host().focused(), Some(cancel));
    }
}

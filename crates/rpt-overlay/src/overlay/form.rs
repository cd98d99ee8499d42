//! Form submission wiring
//!
//! A form attached to an overlay goes through validate, then an async submit
//! handler. The handler's future is polled once on submit and then on every
//! `Coordinator::tick` until it resolves.

use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::LocalBoxFuture;
use futures::task::noop_waker_ref;
use futures::FutureExt;
use rpt_view::{ListenerId, ListenerKind, NodeId, ViewHost};

use crate::input::{Route, Wiring};

/// Synchronous validator: `Ok(true)` passes, `Ok(false)` rejects silently,
/// `Err(message)` rejects with a message
pub type Validator = Rc<dyn Fn() -> Result<bool, String>>;

/// Future produced by a submit handler
pub type SubmitFuture = LocalBoxFuture<'static, Result<(), String>>;

/// Async submit handler
pub type SubmitHandler = Rc<dyn Fn() -> SubmitFuture>;

#[derive(Clone)]
pub struct FormOptions {
    /// Control disabled while a submission is in flight
    pub submit_control: Option<NodeId>,
    pub validate: Option<Validator>,
    pub on_submit: Option<SubmitHandler>,
    pub disable_while_submit: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            submit_control: None,
            validate: None,
            on_submit: None,
            disable_while_submit: true,
        }
    }
}

/// Handle returned by `attach_form`; pass to `detach_form` to unwire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormId(u64);

/// Result of a submit attempt or a completed submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SubmitOutcome {
    /// Validator returned `Ok(false)`
    Rejected,
    /// Validator returned a message
    Invalid(String),
    /// Handler future still running
    Pending,
    /// Previous submission still running; ignored
    Busy,
    Succeeded,
    Failed(String),
}

struct FormBinding {
    id: FormId,
    form: NodeId,
    options: FormOptions,
    listener: ListenerId,
    pending: Option<SubmitFuture>,
}

impl FormBinding {
    fn set_busy<H: ViewHost>(&self, host: &mut H, busy: bool) {
        if !self.options.disable_while_submit {
            return;
        }
        if let Some(control) = self.options.submit_control {
            host.set_disabled(control, busy);
        }
        host.set_attribute(self.form, "aria-busy", if busy { "true" } else { "false" });
    }

    /// Poll the pending submission once
    fn poll<H: ViewHost>(&mut self, host: &mut H) -> SubmitOutcome {
        let Some(future) = self.pending.as_mut() else {
            return SubmitOutcome::Succeeded;
        };
        let mut cx = Context::from_waker(noop_waker_ref());
        match future.poll_unpin(&mut cx) {
            Poll::Pending => SubmitOutcome::Pending,
            Poll::Ready(result) => {
                self.pending = None;
                self.set_busy(host, false);
                match result {
                    Ok(()) => SubmitOutcome::Succeeded,
                    Err(message) => SubmitOutcome::Failed(message),
                }
            }
        }
    }
}

/// Forms attached to one overlay
#[derive(Default)]
pub(crate) struct Forms {
    next_id: u64,
    bindings: Vec<FormBinding>,
}

impl Forms {
    pub fn attach<H: ViewHost>(
        &mut self,
        host: &mut H,
        wiring: &mut Wiring,
        form: NodeId,
        options: FormOptions,
    ) -> FormId {
        self.next_id += 1;
        let id = FormId(self.next_id);
        let listener = wiring.listen(host, form, ListenerKind::Submit, Route::Submit(id));
        self.bindings.push(FormBinding {
            id,
            form,
            options,
            listener,
            pending: None,
        });
        id
    }

    pub fn detach<H: ViewHost>(&mut self, host: &mut H, wiring: &mut Wiring, id: FormId) -> bool {
        let Some(index) = self.bindings.iter().position(|b| b.id == id) else {
            return false;
        };
        let binding = self.bindings.remove(index);
        wiring.unlisten(host, binding.listener);
        if binding.pending.is_some() {
            binding.set_busy(host, false);
        }
        true
    }

    pub fn detach_all<H: ViewHost>(&mut self, host: &mut H, wiring: &mut Wiring) {
        let ids: Vec<FormId> = self.bindings.iter().map(|b| b.id).collect();
        for id in ids {
            self.detach(host, wiring, id);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.bindings.iter().any(|b| b.pending.is_some())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Run validation and start the submit handler
    pub fn submit<H: ViewHost>(&mut self, host: &mut H, id: FormId) -> SubmitOutcome {
        let Some(binding) = self.bindings.iter_mut().find(|b| b.id == id) else {
            return SubmitOutcome::Busy;
        };
        if binding.pending.is_some() {
            return SubmitOutcome::Busy;
        }

        if let Some(validate) = binding.options.validate.clone() {
            match validate() {
                Ok(true) => {}
                Ok(false) => return SubmitOutcome::Rejected,
                Err(message) => return SubmitOutcome::Invalid(message),
            }
        }

        let Some(handler) = binding.options.on_submit.clone() else {
            return SubmitOutcome::Succeeded;
        };
        binding.set_busy(host, true);
        binding.pending = Some(handler());
        binding.poll(host)
    }

    /// Poll every in-flight submission; returns the ones that finished
    pub fn poll<H: ViewHost>(&mut self, host: &mut H) -> Vec<SubmitOutcome> {
        self.bindings
            .iter_mut()
            .filter(|b| b.pending.is_some())
            .map(|b| b.poll(host))
            .filter(|outcome| *outcome != SubmitOutcome::Pending)
            .collect()
    }
}

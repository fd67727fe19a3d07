use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use futures_timer::Delay;

use super::{
    ConfirmationSnapshot, FeedbackError, FeedbackOptions, FeedbackSnapshot, MessageSnapshot,
};
use crate::notify::ChangeNotifier;

pub type MessageCallback = Box<dyn FnOnce() + Send>;
pub type ConfirmationCallback = Box<dyn FnOnce(bool) + Send>;

struct PendingMessage {
    snapshot: MessageSnapshot,
    callback: Option<MessageCallback>,
}

struct PendingConfirmation {
    snapshot: ConfirmationSnapshot,
    callback: ConfirmationCallback,
}

#[derive(Default)]
struct FeedbackState {
    loading: bool,
    message: Option<PendingMessage>,
    confirmation: Option<PendingConfirmation>,
    toast: Option<String>,
    toast_calls: usize,
}

/// Loading overlay, alert, confirmation and toast state for one screen.
///
/// Every visible change fires `on_change`. Callbacks and listeners run
/// after the state lock is released.
#[derive(Clone, Default)]
pub struct MessageCenter {
    options: FeedbackOptions,
    state: Arc<Mutex<FeedbackState>>,
    on_change: ChangeNotifier,
}

impl MessageCenter {
    pub fn new(options: FeedbackOptions) -> Self {
        Self {
            options,
            state: Arc::default(),
            on_change: ChangeNotifier::new(),
        }
    }

    pub fn options(&self) -> &FeedbackOptions {
        &self.options
    }

    pub fn on_change(&self) -> &ChangeNotifier {
        &self.on_change
    }

    pub fn show_loading(&self) {
        self.lock().loading = true;
        self.on_change.trigger();
    }

    pub fn hide_loading(&self) {
        self.lock().loading = false;
        self.on_change.trigger();
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Shows an alert. A message already showing is replaced and its
    /// callback dropped.
    pub fn show_message(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        callback: Option<MessageCallback>,
    ) {
        self.lock().message = Some(PendingMessage {
            snapshot: MessageSnapshot {
                title: title.into(),
                message: message.into(),
            },
            callback,
        });
        self.on_change.trigger();
    }

    pub fn show_failure(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        callback: Option<MessageCallback>,
    ) {
        tracing::debug!("showing failure message");
        self.show_message(title, message, callback);
    }

    /// Closes the alert and runs its callback. Returns `false` if no alert
    /// was showing.
    pub fn dismiss_message(&self) -> bool {
        let Some(pending) = self.lock().message.take() else {
            return false;
        };
        if let Some(callback) = pending.callback {
            callback();
        }
        self.on_change.trigger();
        true
    }

    pub fn show_confirmation(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        yes_text: impl Into<String>,
        no_text: impl Into<String>,
        callback: impl FnOnce(bool) + Send + 'static,
    ) {
        let replaced = self.lock().confirmation.replace(PendingConfirmation {
            snapshot: ConfirmationSnapshot {
                title: title.into(),
                message: message.into(),
                yes_text: yes_text.into(),
                no_text: no_text.into(),
            },
            callback: Box::new(callback),
        });
        if replaced.is_some() {
            tracing::warn!("replacing unanswered confirmation");
        }
        self.on_change.trigger();
    }

    /// Resolves the pending confirmation and clears it.
    pub fn answer_confirmation(&self, accepted: bool) -> Result<(), FeedbackError> {
        let pending = self
            .lock()
            .confirmation
            .take()
            .ok_or(FeedbackError::NoPendingConfirmation)?;
        (pending.callback)(accepted);
        self.on_change.trigger();
        Ok(())
    }

    /// Shows `message` and returns the future that hides it again.
    ///
    /// Toasts share one slot: the latest message is shown and the slot stays
    /// visible until every returned future has completed. The future must be
    /// driven by the caller's executor.
    #[must_use = "the toast stays visible until the expiry future completes"]
    pub fn show_toast(&self, message: impl Into<String>) -> ToastExpiry {
        {
            let mut state = self.lock();
            state.toast = Some(message.into());
            state.toast_calls += 1;
        }
        self.on_change.trigger();

        ToastExpiry {
            delay: Delay::new(self.options.toast_duration),
            center: Some(self.clone()),
        }
    }

    /// Counts one toast as expired and hides the slot once none remain.
    pub fn expire_toast(&self) {
        let hidden = {
            let mut state = self.lock();
            state.toast_calls = state.toast_calls.saturating_sub(1);
            if state.toast_calls == 0 && state.toast.is_some() {
                state.toast = None;
                true
            } else {
                false
            }
        };
        if hidden {
            self.on_change.trigger();
        }
    }

    pub fn snapshot(&self) -> FeedbackSnapshot {
        let state = self.lock();
        FeedbackSnapshot {
            loading: state.loading,
            message: state.message.as_ref().map(|pending| pending.snapshot.clone()),
            confirmation: state
                .confirmation
                .as_ref()
                .map(|pending| pending.snapshot.clone()),
            toast: state.toast.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedbackState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Completes once the toast duration has elapsed and counts the toast as
/// expired. Dropping it early leaves the toast visible until
/// `MessageCenter::expire_toast` is called.
pub struct ToastExpiry {
    delay: Delay,
    center: Option<MessageCenter>,
}

impl Future for ToastExpiry {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.center.is_none() {
            return Poll::Ready(());
        }
        match Pin::new(&mut self.delay).poll(cx) {
            Poll::Ready(()) => {
                if let Some(center) = self.center.take() {
                    center.expire_toast();
                }
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

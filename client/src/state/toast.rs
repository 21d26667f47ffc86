//! Transient toast notifications.
//!
//! DESIGN
//! ======
//! Toasts are an ordered FIFO kept in a [`Store`] so a toast stack component
//! can subscribe and re-render. Ids (`toast-1`, `toast-2`, ...) come from a
//! per-queue counter; they are never persisted, so uniqueness across restarts
//! is not needed. In the browser a toast with a duration dismisses itself.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::store::{Store, SubscriptionId};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: String,
    pub message: String,
    pub kind: ToastKind,
    /// `None` keeps the toast until dismissed by hand.
    pub duration: Option<Duration>,
}

#[derive(Clone, Debug)]
pub struct ToastQueue {
    toasts: Store<Vec<Toast>>,
    counter: Arc<AtomicU64>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastQueue {
    pub fn new() -> Self {
        Self { toasts: Store::new(Vec::new()), counter: Arc::new(AtomicU64::new(0)) }
    }

    /// Toasts in display order.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.get()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Vec<Toast>) + Send + Sync + 'static,
    {
        self.toasts.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.toasts.unsubscribe(id)
    }

    /// Append a toast with the default duration; returns its id.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) -> String {
        self.show_with_duration(message, kind, Some(DEFAULT_TOAST_DURATION))
    }

    /// Append a toast; `None` makes it sticky.
    pub fn show_with_duration(&self, message: impl Into<String>, kind: ToastKind, duration: Option<Duration>) -> String {
        let id = format!("toast-{}", self.counter.fetch_add(1, Ordering::Relaxed) + 1);
        let toast = Toast { id: id.clone(), message: message.into(), kind, duration };
        self.toasts.update(|toasts| toasts.push(toast));

        #[cfg(feature = "hydrate")]
        {
            if let Some(after) = duration {
                self.schedule_dismiss(id.clone(), after);
            }
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Error)
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Warning)
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Info)
    }

    /// Remove the toast with `id`; unknown ids are ignored.
    pub fn dismiss(&self, id: &str) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    pub fn dismiss_all(&self) {
        self.toasts.set(Vec::new());
    }

    #[cfg(feature = "hydrate")]
    fn schedule_dismiss(&self, id: String, after: Duration) {
        let queue = self.clone();
        let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::callback::Timeout::new(millis, move || queue.dismiss(&id)).forget();
    }
}

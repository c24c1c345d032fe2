// View adapters: a log-backed renderer and a wrapper that expires notices.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::ports::{MessageId, MessageKind, ResourceView};

pub struct TracingView {
    // Name of the panel being rendered ("budgets", "goals", ...).
    label: &'static str,
    next_message: AtomicU64,
}

impl TracingView {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            next_message: AtomicU64::new(1),
        }
    }
}

impl<R: Debug> ResourceView<R> for TracingView {
    fn render_list(&self, items: &[R]) {
        tracing::info!(view = self.label, count = items.len(), "render list");
        for item in items {
            tracing::debug!(view = self.label, ?item, "render item");
        }
    }

    fn render_empty(&self) {
        tracing::info!(view = self.label, "render empty state");
    }

    fn show_message(&self, message: &str, kind: MessageKind) -> MessageId {
        let id = MessageId(self.next_message.fetch_add(1, Ordering::Relaxed));
        match kind {
            MessageKind::Error => tracing::error!(view = self.label, id = id.0, %message, "message"),
            MessageKind::Warning => tracing::warn!(view = self.label, id = id.0, %message, "message"),
            MessageKind::Success | MessageKind::Info => {
                tracing::info!(view = self.label, id = id.0, %message, "message")
            }
        }
        id
    }

    fn dismiss_message(&self, id: MessageId) {
        tracing::debug!(view = self.label, id = id.0, "message dismissed");
    }
}

/// Forwards to `inner` and dismisses every notice once `timeout` has passed.
pub struct AutoDismissView<R> {
    inner: Arc<dyn ResourceView<R>>,
    timeout: Duration,
}

impl<R> AutoDismissView<R> {
    pub fn new(inner: Arc<dyn ResourceView<R>>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl<R: 'static> ResourceView<R> for AutoDismissView<R> {
    fn render_list(&self, items: &[R]) {
        self.inner.render_list(items);
    }

    fn render_empty(&self) {
        self.inner.render_empty();
    }

    fn show_message(&self, message: &str, kind: MessageKind) -> MessageId {
        let id = self.inner.show_message(message, kind);

        // Without a runtime the notice simply stays until dismissed by hand.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let inner = self.inner.clone();
                let timeout = self.timeout;
                handle.spawn(async move {
                    tokio::time::sleep(timeout).await;
                    inner.dismiss_message(id);
                });
            }
            Err(_) => tracing::debug!(id = id.0, "no runtime, message will not expire"),
        }
        id
    }

    fn dismiss_message(&self, id: MessageId) {
        self.inner.dismiss_message(id);
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::http::{OutgoingRequest, RawResponse};
use crate::domain::session::Route;

// Port for the persistent string key-value storage that backs the session.
// Access is synchronous and last writer wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

// Port for page navigation side effects.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

// Port for the network. Errors carry the cause of a transport-level failure.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, String>;
}

// Port for retrieving the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Info,
    Warning,
    Error,
}

/// Handle for one shown notice, unique per view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

// Narrow view-update interface used by the controllers in place of the DOM.
pub trait ResourceView<R>: Send + Sync {
    // Render a freshly loaded, non-empty list.
    fn render_list(&self, items: &[R]);
    // Render the empty or error state.
    fn render_empty(&self);
    // Show a transient user-facing notice.
    fn show_message(&self, message: &str, kind: MessageKind) -> MessageId;
    // Remove a shown notice. Unknown or already dismissed ids are ignored.
    fn dismiss_message(&self, id: MessageId);
}

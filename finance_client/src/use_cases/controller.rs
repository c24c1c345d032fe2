use std::future::Future;
use std::sync::Arc;

use crate::domain::errors::{ActionError, ClientError};
use crate::domain::ports::{MessageKind, ResourceView};

/// What a failed `load` does to the list already on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailurePolicy {
    /// Replace the list with empty and show the empty state.
    Clear,
    /// Keep showing the previously loaded list.
    Keep,
}

/// User-facing notices for one mutation.
#[derive(Debug, Clone, Copy)]
pub struct Notice<'a> {
    pub success: &'a str,
    pub failure: &'a str,
}

impl<'a> Notice<'a> {
    pub fn new(success: &'a str, failure: &'a str) -> Self {
        Self { success, failure }
    }
}

/// Load/render/mutate recipe shared by every resource page.
///
/// The list is only ever replaced wholesale; mutations never patch it locally
/// but re-run `load` so the view mirrors the backend.
pub struct CrudController<R> {
    label: &'static str,
    items: Vec<R>,
    view: Arc<dyn ResourceView<R>>,
    policy: LoadFailurePolicy,
    // Off when the owner renders a projection (a filtered page) itself.
    render_on_load: bool,
}

impl<R> CrudController<R> {
    pub fn new(label: &'static str, view: Arc<dyn ResourceView<R>>, policy: LoadFailurePolicy) -> Self {
        Self {
            label,
            items: Vec::new(),
            view,
            policy,
            render_on_load: true,
        }
    }

    /// Successful loads leave rendering to the caller.
    pub fn without_render_on_load(mut self) -> Self {
        self.render_on_load = false;
        self
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn view(&self) -> &dyn ResourceView<R> {
        self.view.as_ref()
    }

    /// Re-renders the current list, recomputing any derived display values.
    pub fn render(&self) {
        if self.items.is_empty() {
            self.view.render_empty();
        } else {
            self.view.render_list(&self.items);
        }
    }

    pub async fn load<F>(&mut self, fetch: F) -> Result<usize, ActionError>
    where
        F: Future<Output = Result<Vec<R>, ClientError>>,
    {
        match fetch.await {
            Ok(items) => {
                tracing::debug!(resource = self.label, count = items.len(), "loaded");
                self.items = items;
                if self.render_on_load {
                    self.render();
                }
                Ok(self.items.len())
            }
            Err(err) => {
                tracing::warn!(resource = self.label, error = %err, "load failed");
                if self.policy == LoadFailurePolicy::Clear {
                    self.items.clear();
                }
                self.render();
                self.view.show_message(
                    &format!("Failed to load {}: {}", self.label, err.user_message()),
                    MessageKind::Error,
                );
                Err(err.into())
            }
        }
    }

    /// Runs one backend call; on success reports it and reloads unconditionally.
    pub async fn mutate<T, A, F>(
        &mut self,
        action: A,
        reload: F,
        notice: Notice<'_>,
    ) -> Result<T, ActionError>
    where
        A: Future<Output = Result<T, ClientError>>,
        F: Future<Output = Result<Vec<R>, ClientError>>,
    {
        let value = self.run(action, notice.failure).await?;
        self.view.show_message(notice.success, MessageKind::Success);
        // A failed reload reports itself; the mutation already happened.
        let _ = self.load(reload).await;
        Ok(value)
    }

    /// Backend call that does not change the list (summaries, lookups).
    pub async fn run<T, A>(&self, action: A, failure: &str) -> Result<T, ActionError>
    where
        A: Future<Output = Result<T, ClientError>>,
    {
        action.await.map_err(|err| {
            tracing::warn!(resource = self.label, error = %err, "{failure}");
            self.view.show_message(
                &format!("{failure}: {}", err.user_message()),
                MessageKind::Error,
            );
            ActionError::from(err)
        })
    }

    /// Advisory validation failure: shown to the user, nothing is sent.
    pub fn reject(&self, message: &str) -> ActionError {
        tracing::debug!(resource = self.label, %message, "rejected before dispatch");
        self.view.show_message(message, MessageKind::Error);
        ActionError::Validation(message.to_string())
    }
}

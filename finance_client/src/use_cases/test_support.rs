// In-process fakes shared by the unit tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::http::{OutgoingRequest, RawResponse};
use crate::domain::ports::{Clock, MessageId, MessageKind, Navigator, ResourceView, Transport};
use crate::domain::session::Route;
use crate::interface_adapters::api::FinanceApi;
use crate::interface_adapters::clients::ApiClient;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::storage::MemoryStorage;
use crate::use_cases::session_store::SessionStore;

pub(crate) const BASE_URL: &str = "http://backend.test";

/// Replays canned responses in order and records every request it receives.
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse, String>>>,
    requests: Mutex<Vec<OutgoingRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<Result<RawResponse, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<OutgoingRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, String> {
        self.requests.lock().expect("requests lock").push(request);
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err("no scripted response left".to_string()))
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<Route> {
        self.routes.lock().expect("routes lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().expect("routes lock").push(route);
    }
}

pub(crate) struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub(crate) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date")
}

/// Captures renders and notices so tests can assert on the terminal UI outcome.
pub(crate) struct RecordingView<R> {
    lists: Mutex<Vec<Vec<R>>>,
    empties: Mutex<usize>,
    messages: Mutex<Vec<(String, MessageKind)>>,
    // Notices still on screen, oldest first.
    active: Mutex<Vec<(MessageId, String)>>,
    dismissals: Mutex<usize>,
}

impl<R> Default for RecordingView<R> {
    fn default() -> Self {
        Self {
            lists: Mutex::new(Vec::new()),
            empties: Mutex::new(0),
            messages: Mutex::new(Vec::new()),
            active: Mutex::new(Vec::new()),
            dismissals: Mutex::new(0),
        }
    }
}

impl<R: Clone> RecordingView<R> {
    pub(crate) fn last_list(&self) -> Option<Vec<R>> {
        self.lists.lock().expect("lists lock").last().cloned()
    }

    pub(crate) fn list_renders(&self) -> usize {
        self.lists.lock().expect("lists lock").len()
    }

    pub(crate) fn empty_renders(&self) -> usize {
        *self.empties.lock().expect("empties lock")
    }

    pub(crate) fn messages(&self) -> Vec<(String, MessageKind)> {
        self.messages.lock().expect("messages lock").clone()
    }

    pub(crate) fn last_message(&self) -> Option<(String, MessageKind)> {
        self.messages().last().cloned()
    }

    pub(crate) fn active_messages(&self) -> Vec<String> {
        let active = self.active.lock().expect("active lock");
        active.iter().map(|(_, message)| message.clone()).collect()
    }

    pub(crate) fn dismissals(&self) -> usize {
        *self.dismissals.lock().expect("dismissals lock")
    }
}

impl<R: Clone + Send + Sync> ResourceView<R> for RecordingView<R> {
    fn render_list(&self, items: &[R]) {
        self.lists.lock().expect("lists lock").push(items.to_vec());
    }

    fn render_empty(&self) {
        *self.empties.lock().expect("empties lock") += 1;
    }

    fn show_message(&self, message: &str, kind: MessageKind) -> MessageId {
        let mut messages = self.messages.lock().expect("messages lock");
        messages.push((message.to_string(), kind));
        let id = MessageId(messages.len() as u64);
        self.active
            .lock()
            .expect("active lock")
            .push((id, message.to_string()));
        id
    }

    fn dismiss_message(&self, id: MessageId) {
        let mut active = self.active.lock().expect("active lock");
        if let Some(index) = active.iter().position(|(shown, _)| *shown == id) {
            active.remove(index);
            *self.dismissals.lock().expect("dismissals lock") += 1;
        }
    }
}

/// Wires the real client, session store and API facade around the fakes.
pub(crate) struct Harness {
    pub(crate) transport: Arc<ScriptedTransport>,
    pub(crate) navigator: Arc<RecordingNavigator>,
    pub(crate) session: SessionStore,
    pub(crate) client: ApiClient,
    pub(crate) api: FinanceApi,
    pub(crate) state: AppState,
}

impl Harness {
    pub(crate) fn new(transport: ScriptedTransport) -> Self {
        let transport = Arc::new(transport);
        let navigator = Arc::new(RecordingNavigator::default());
        let session = SessionStore::new(Arc::new(MemoryStorage::default()), navigator.clone());
        let client = ApiClient::new(transport.clone(), session.clone(), BASE_URL);
        let api = FinanceApi::new(client.clone());
        let state = AppState {
            api: api.clone(),
            session: session.clone(),
            navigator: navigator.clone(),
            clock: Arc::new(FixedClock(today())),
        };
        Self {
            transport,
            navigator,
            session,
            client,
            api,
            state,
        }
    }

    pub(crate) fn signed_in(transport: ScriptedTransport) -> Self {
        let harness = Self::new(transport);
        harness.session.set_session("t1", "a@b.com", "A");
        harness
    }
}

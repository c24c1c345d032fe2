use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::ports::{Clock, Navigator};
use crate::interface_adapters::api::FinanceApi;
use crate::use_cases::session_store::SessionStore;

// Shared handles for one client session, cloned into every controller.
#[derive(Clone)]
pub struct AppState {
    // Typed backend calls, all routed through the authenticated client.
    pub api: FinanceApi,
    // Token and cached identity; the only place credentials live.
    pub session: SessionStore,
    pub navigator: Arc<dyn Navigator>,
    // Source of "today" for goal deadlines and insight periods.
    pub clock: Arc<dyn Clock>,
}

// Wall-clock date in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

use std::sync::Mutex;

use crate::domain::ports::Navigator;
use crate::domain::session::Route;

// Navigator for headless runs: logs the target and remembers where we were sent.
#[derive(Debug, Default)]
pub struct LoggingNavigator {
    current: Mutex<Option<Route>>,
}

impl LoggingNavigator {
    pub fn current(&self) -> Option<Route> {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(path = route.path(), "navigate");
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(route);
    }
}

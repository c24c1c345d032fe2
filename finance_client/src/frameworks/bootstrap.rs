use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{KeyValueStore, ResourceView, Transport};
use crate::domain::session::Route;
use crate::frameworks::config::{ClientConfig, ConfigError};
use crate::interface_adapters::api::FinanceApi;
use crate::interface_adapters::clients::{ApiClient, ReqwestTransport};
use crate::interface_adapters::navigator::LoggingNavigator;
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::interface_adapters::storage::{FileStorage, MemoryStorage};
use crate::interface_adapters::view::{AutoDismissView, TracingView};
use crate::use_cases::{
    AuthService, BudgetController, GoalController, InsightController, SessionStore,
    TransactionController,
};

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Transport(reqwest::Error),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Config(e) => write!(f, "configuration error: {e}"),
            BootstrapError::Transport(e) => write!(f, "failed to build http client: {e}"),
        }
    }
}

impl std::error::Error for BootstrapError {}

impl From<ConfigError> for BootstrapError {
    fn from(value: ConfigError) -> Self {
        BootstrapError::Config(value)
    }
}

impl From<reqwest::Error> for BootstrapError {
    fn from(value: reqwest::Error) -> Self {
        BootstrapError::Transport(value)
    }
}

/// Rows loaded per dashboard panel; `None` when that panel failed to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub budgets: Option<usize>,
    pub goals: Option<usize>,
    pub transactions: Option<usize>,
    pub insights: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    // No usable session; the user was sent to the login page.
    SignedOut,
    Dashboard(DashboardSummary),
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    // try_init: a subscriber may already be installed by an embedding process.
    let result = if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Fully wired client: shared state plus the auth flows on top of it.
pub struct ClientApp {
    state: AppState,
    auth: AuthService,
    navigator: Arc<LoggingNavigator>,
    base_url: String,
    message_timeout: Duration,
}

impl ClientApp {
    /// Wires the reqwest transport and the configured session storage.
    pub fn build(config: &ClientConfig) -> Result<Self, BootstrapError> {
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout())?);
        let storage: Arc<dyn KeyValueStore> = match &config.session_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "using file-backed session storage");
                Arc::new(FileStorage::open(path.clone()))
            }
            None => Arc::new(MemoryStorage::default()),
        };
        Self::with_parts(config, transport, storage)
    }

    pub fn with_parts(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, BootstrapError> {
        let base_url = config.base_url()?;
        let navigator = Arc::new(LoggingNavigator::default());
        let session = SessionStore::new(storage, navigator.clone());
        let client = ApiClient::new(transport, session.clone(), base_url.clone());
        let api = FinanceApi::new(client);
        let auth = AuthService::new(api.clone(), session.clone())
            .with_min_password_length(config.ui.password_min_length)
            .with_redirect_delay(config.redirect_delay());
        let state = AppState {
            api,
            session,
            navigator: navigator.clone(),
            clock: Arc::new(SystemClock),
        };

        Ok(Self {
            state,
            auth,
            navigator,
            base_url,
            message_timeout: config.message_timeout(),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Last page the client navigated to.
    pub fn current_route(&self) -> Option<Route> {
        self.navigator.current()
    }

    /// Health check, session resumption, then the dashboard panels.
    pub async fn start(&self) -> PageOutcome {
        if !self.auth.health().await {
            tracing::warn!(base_url = %self.base_url, "backend unreachable, continuing");
        }

        if !self.auth.resume_session().await {
            // A rejected token has already redirected to login.
            if self.navigator.current() != Some(Route::Login) {
                self.state.navigator.navigate(Route::Login);
            }
            return PageOutcome::SignedOut;
        }

        PageOutcome::Dashboard(self.load_dashboard().await)
    }

    /// Wraps `view` so its notices expire after the configured timeout.
    pub fn expiring<R: 'static>(&self, view: Arc<dyn ResourceView<R>>) -> Arc<dyn ResourceView<R>> {
        Arc::new(AutoDismissView::new(view, self.message_timeout))
    }

    /// Log-backed panel with expiring notices.
    pub fn panel<R: Debug + 'static>(&self, label: &'static str) -> Arc<dyn ResourceView<R>> {
        self.expiring(Arc::new(TracingView::new(label)))
    }

    /// Loads every dashboard panel concurrently through log-backed views.
    pub async fn load_dashboard(&self) -> DashboardSummary {
        let state = &self.state;
        let mut budgets = BudgetController::new(state.api.clone(), self.panel("budgets"));
        let mut goals =
            GoalController::new(state.api.clone(), state.clock.clone(), self.panel("goals"));
        let mut transactions =
            TransactionController::new(state.api.clone(), self.panel("transactions"));
        let mut insights =
            InsightController::new(state.api.clone(), state.clock.clone(), self.panel("insights"));

        let (budgets, goals, transactions, insights) = tokio::join!(
            budgets.load(),
            goals.load(),
            transactions.load(),
            insights.load()
        );
        let summary = DashboardSummary {
            budgets: budgets.ok(),
            goals: goals.ok(),
            transactions: transactions.ok(),
            insights: insights.ok(),
        };
        tracing::info!(?summary, "dashboard loaded");
        summary
    }
}

/// Process entry point: `.env`, tracing, config, then one page start.
pub async fn run() -> Result<PageOutcome, BootstrapError> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ClientConfig::load()?;
    let app = ClientApp::build(&config)?;
    tracing::info!(base_url = %app.base_url, "client configured");

    let outcome = app.start().await;
    tracing::info!(?outcome, route = ?app.current_route(), "page ready");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::http::RawResponse;
    use crate::domain::ports::MessageKind;
    use crate::use_cases::test_support::{RecordingView, ScriptedTransport};

    fn app(responses: Vec<Result<RawResponse, String>>) -> (ClientApp, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(responses));
        let app = ClientApp::with_parts(
            &ClientConfig::default(),
            transport.clone(),
            Arc::new(MemoryStorage::default()),
        )
        .expect("default config is valid");
        (app, transport)
    }

    #[tokio::test(start_paused = true)]
    async fn panel_notices_expire_after_configured_timeout() {
        let mut config = ClientConfig::default();
        config.ui.message_timeout_ms = 200;
        let app = ClientApp::with_parts(
            &config,
            Arc::new(ScriptedTransport::new(Vec::new())),
            Arc::new(MemoryStorage::default()),
        )
        .expect("default config is valid");

        let recorded = Arc::new(RecordingView::<u32>::default());
        let panel = app.expiring::<u32>(recorded.clone());
        panel.show_message("Goal deleted successfully!", MessageKind::Success);

        tokio::time::sleep(Duration::from_millis(199)).await;
        assert_eq!(recorded.active_messages().len(), 1);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(recorded.active_messages().is_empty());
        assert_eq!(recorded.dismissals(), 1);
    }

    #[tokio::test]
    async fn when_no_session_is_stored_then_start_signs_out() {
        let (app, transport) = app(vec![Ok(RawResponse::text(200, "UP"))]);

        let outcome = app.start().await;

        assert_eq!(outcome, PageOutcome::SignedOut);
        assert_eq!(app.current_route(), Some(Route::Login));
        assert_eq!(transport.urls(), vec!["http://localhost:8080/auth/health"]);
    }

    #[tokio::test]
    async fn when_stored_token_is_rejected_then_session_is_cleared() {
        let (app, _transport) = app(vec![
            Err("connection refused".to_string()),
            Ok(RawResponse::json(401, "{\"message\":\"invalid\"}")),
        ]);
        app.state().session.set_session("stale", "a@b.com", "A");

        let outcome = app.start().await;

        assert_eq!(outcome, PageOutcome::SignedOut);
        assert!(!app.state().session.is_authenticated());
        assert_eq!(app.current_route(), Some(Route::Login));
    }

    #[tokio::test]
    async fn when_stored_token_is_valid_then_dashboard_panels_load() {
        let (app, transport) = app(vec![
            Ok(RawResponse::text(200, "UP")),
            Ok(RawResponse::json(200, "{\"valid\":true}")),
            Ok(RawResponse::json(200, "[]")),
            Ok(RawResponse::json(200, "[]")),
            Ok(RawResponse::json(200, "[]")),
            Ok(RawResponse::json(200, "[]")),
        ]);
        app.state().session.set_session("t1", "a@b.com", "A");

        let outcome = app.start().await;

        assert_eq!(
            outcome,
            PageOutcome::Dashboard(DashboardSummary {
                budgets: Some(0),
                goals: Some(0),
                transactions: Some(0),
                insights: Some(0),
            })
        );
        assert_eq!(app.current_route(), Some(Route::Dashboard));
        assert_eq!(transport.requests().len(), 6);
    }
}

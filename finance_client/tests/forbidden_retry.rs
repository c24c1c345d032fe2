mod support;

use finance_client::ClientApp;
use finance_client::domain::{ActionError, ClientError, Route};
use finance_client::interface_adapters::view::TracingView;
use finance_client::use_cases::BudgetController;
use std::sync::Arc;
use support::MockBackend;

async fn signed_in(backend: &MockBackend) -> (ClientApp, BudgetController) {
    backend.add_user("Ana", "ana@example.com", "secret1");
    let app = ClientApp::build(&backend.config()).expect("client should build");
    app.auth()
        .login("ana@example.com", "secret1")
        .await
        .expect("login should succeed");
    let budgets = BudgetController::new(
        app.state().api.clone(),
        Arc::new(TracingView::new("budgets")),
    );
    (app, budgets)
}

#[tokio::test]
async fn forbidden_then_valid_token_retries_once() {
    let backend = MockBackend::spawn().await;
    let (app, mut budgets) = signed_in(&backend).await;
    backend.forbid_next(1);

    let loaded = budgets.load().await;

    assert_eq!(loaded, Ok(0));
    assert_eq!(
        backend.hits()[1..],
        [
            "GET /api/budgets".to_string(),
            "GET /auth/verify".to_string(),
            "GET /api/budgets".to_string(),
        ]
    );
    assert!(app.state().session.is_authenticated());
}

#[tokio::test]
async fn forbidden_retry_is_final() {
    let backend = MockBackend::spawn().await;
    let (app, mut budgets) = signed_in(&backend).await;
    backend.forbid_next(2);

    let loaded = budgets.load().await;

    assert!(matches!(
        loaded,
        Err(ActionError::Client(ClientError::Api { status: 403, .. }))
    ));
    assert_eq!(backend.hits().len(), 4);
    assert!(app.state().session.is_authenticated());
}

#[tokio::test]
async fn forbidden_with_rejected_token_clears_session() {
    let backend = MockBackend::spawn().await;
    let (app, mut budgets) = signed_in(&backend).await;
    backend.forbid_next(1);
    backend.reject_verify();

    let loaded = budgets.load().await;

    assert_eq!(loaded, Err(ActionError::Client(ClientError::SessionExpired)));
    assert!(!app.state().session.is_authenticated());
    assert_eq!(app.current_route(), Some(Route::Login));
    assert!(budgets.budgets().is_empty());
}

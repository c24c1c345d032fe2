mod support;

use chrono::NaiveDate;
use finance_client::ClientApp;
use finance_client::interface_adapters::api::LimitRequest;
use finance_client::interface_adapters::view::TracingView;
use finance_client::use_cases::{BudgetController, BudgetForm};
use std::sync::Arc;
use support::MockBackend;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[tokio::test]
async fn created_budget_comes_back_on_reload() {
    let backend = MockBackend::spawn().await;
    backend.add_user("Ana", "ana@example.com", "secret1");
    let app = ClientApp::build(&backend.config()).expect("client should build");
    app.auth()
        .login("ana@example.com", "secret1")
        .await
        .expect("login should succeed");
    let mut budgets = BudgetController::new(
        app.state().api.clone(),
        Arc::new(TracingView::new("budgets")),
    );

    budgets
        .create(BudgetForm {
            name: "Groceries".to_string(),
            description: String::new(),
            amount: 300.0,
            period: None,
            start_date: date(2025, 1, 1),
            end_date: date(2025, 2, 1),
            category_limits: vec![LimitRequest {
                category_id: "c1".to_string(),
                limit_amount: 300.0,
            }],
        })
        .await
        .expect("create should succeed");

    assert_eq!(budgets.budgets().len(), 1);
    let budget = &budgets.budgets()[0];
    assert_eq!(budget.name, "Groceries");
    assert_eq!(budget.amount, Some(300.0));
    assert_eq!(budget.category_limits[0].category_id, "c1");
    assert_eq!(budget.category_limits[0].limit_amount, 300.0);
    assert_eq!(backend.budgets().len(), 1);
    assert_eq!(
        backend.hits()[1..],
        ["POST /api/budgets".to_string(), "GET /api/budgets".to_string()]
    );
}

use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::errors::ActionError;
use crate::domain::ports::{MessageKind, ResourceView};
use crate::domain::records::{Category, Transaction, TransactionTotals};
use crate::interface_adapters::api::FinanceApi;
use crate::use_cases::controller::{CrudController, LoadFailurePolicy, Notice};

pub const PAGE_SIZE: usize = 20;

/// Client-side filter over the loaded transactions. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Category id or category name.
    pub category: Option<String>,
    /// Transaction type or category type (`INCOME`/`EXPENSE`).
    pub kind: Option<String>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if self.date_from.is_some_and(|from| transaction.date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| transaction.date > to) {
            return false;
        }
        if let Some(category) = non_blank(&self.category) {
            let id_matches = transaction.category_id.as_deref() == Some(category);
            let name_matches = transaction.category_name.as_deref() == Some(category);
            if !id_matches && !name_matches {
                return false;
            }
        }
        if let Some(kind) = non_blank(&self.kind) {
            let matches = [&transaction.kind, &transaction.category_type]
                .into_iter()
                .flatten()
                .any(|value| value.eq_ignore_ascii_case(kind));
            if !matches {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            let found = transaction
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Result of applying one category to every filtered transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOutcome {
    pub updated: usize,
    pub failed: usize,
}

pub struct TransactionController {
    api: FinanceApi,
    list: CrudController<Transaction>,
    categories: Vec<Category>,
    filter: TransactionFilter,
    // 1-based, as shown to the user.
    page: usize,
}

impl TransactionController {
    pub fn new(api: FinanceApi, view: Arc<dyn ResourceView<Transaction>>) -> Self {
        Self {
            api,
            list: CrudController::new("transactions", view, LoadFailurePolicy::Clear)
                .without_render_on_load(),
            categories: Vec::new(),
            filter: TransactionFilter::default(),
            page: 1,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.list.items()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Categories of the same type as the transaction, or all when untyped.
    pub fn categories_for(&self, transaction: &Transaction) -> Vec<&Category> {
        let kind = transaction.category_type.as_deref().or(transaction.kind.as_deref());
        let matching: Vec<&Category> = self
            .categories
            .iter()
            .filter(|c| match (kind, c.kind) {
                (Some(kind), Some(category_kind)) => category_kind.as_str().eq_ignore_ascii_case(kind),
                _ => false,
            })
            .collect();
        if matching.is_empty() {
            self.categories.iter().collect()
        } else {
            matching
        }
    }

    pub fn filter(&self) -> &TransactionFilter {
        &self.filter
    }

    pub fn filtered(&self) -> Vec<&Transaction> {
        self.list
            .items()
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect()
    }

    /// Totals over everything loaded, independent of the filter.
    pub fn totals(&self) -> TransactionTotals {
        TransactionTotals::from_transactions(self.list.items())
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(PAGE_SIZE)
    }

    pub fn page_items(&self) -> Vec<&Transaction> {
        self.filtered()
            .into_iter()
            .skip((self.page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    pub fn set_filter(&mut self, filter: TransactionFilter) {
        self.filter = filter;
        self.page = 1;
        self.render_page();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(TransactionFilter::default());
    }

    pub fn next_page(&mut self) {
        if self.page < self.page_count() {
            self.page += 1;
            self.render_page();
        }
    }

    pub fn previous_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.render_page();
        }
    }

    pub async fn load(&mut self) -> Result<usize, ActionError> {
        let result = self.list.load(self.api.transactions()).await;
        self.after_load(&result);
        result
    }

    pub async fn load_categories(&mut self) -> Result<usize, ActionError> {
        match self.list.run(self.api.categories(), "Failed to load categories").await {
            Ok(categories) => {
                self.categories = categories;
                Ok(self.categories.len())
            }
            Err(err) => {
                self.categories.clear();
                Err(err)
            }
        }
    }

    pub async fn update_category(
        &mut self,
        transaction_id: &str,
        category_id: &str,
    ) -> Result<Value, ActionError> {
        let result = self
            .list
            .mutate(
                self.api.update_transaction_category(transaction_id, category_id),
                self.api.transactions(),
                Notice::new("Category updated successfully", "Failed to update category"),
            )
            .await;
        if result.is_ok() {
            self.render_current_page();
        }
        result
    }

    /// Applies one category to every transaction matching the current filter.
    pub async fn bulk_update_category(&mut self, category_id: &str) -> Result<BulkOutcome, ActionError> {
        let ids: Vec<String> = self.filtered().into_iter().map(|t| t.id.clone()).collect();
        if ids.is_empty() {
            return Err(self.list.reject("No transactions to update"));
        }

        let mut outcome = BulkOutcome {
            updated: 0,
            failed: 0,
        };
        for id in &ids {
            match self.api.update_transaction_category(id, category_id).await {
                Ok(_) => outcome.updated += 1,
                Err(err) if err.is_auth_failure() => {
                    // Session is gone; the rest would fail the same way.
                    tracing::warn!(error = %err, "bulk update stopped");
                    self.list.view().show_message(&err.user_message(), MessageKind::Error);
                    return Err(err.into());
                }
                Err(err) => {
                    tracing::warn!(transaction_id = %id, error = %err, "bulk update item failed");
                    outcome.failed += 1;
                }
            }
        }

        let (message, kind) = if outcome.failed == 0 {
            (
                format!("Successfully updated {} transactions", outcome.updated),
                MessageKind::Success,
            )
        } else {
            (
                format!(
                    "Updated {} transactions, {} failed",
                    outcome.updated, outcome.failed
                ),
                MessageKind::Warning,
            )
        };
        self.list.view().show_message(&message, kind);

        let reload = self.list.load(self.api.transactions()).await;
        self.after_load(&reload);
        Ok(outcome)
    }

    fn after_load(&mut self, result: &Result<usize, ActionError>) {
        if result.is_ok() {
            self.render_current_page();
        } else {
            self.page = 1;
        }
    }

    // Keeps the page index when it is still in range after a reload.
    fn render_current_page(&mut self) {
        self.page = self.page.clamp(1, self.page_count().max(1));
        self.render_page();
    }

    fn render_page(&self) {
        let page: Vec<Transaction> = self.page_items().into_iter().cloned().collect();
        if page.is_empty() {
            self.list.view().render_empty();
        } else {
            self.list.view().render_list(&page);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::http::{HttpMethod, RawResponse, RequestBody};
    use crate::use_cases::test_support::{Harness, RecordingView, ScriptedTransport};
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sample() -> Value {
        json!([
            {"id": "t1", "date": "2025-01-05", "amount": -42.5, "description": "Corner Grocery",
             "categoryId": "c1", "categoryName": "Food", "categoryType": "EXPENSE"},
            {"id": "t2", "date": "2025-01-15", "amount": 2500, "description": "Salary January",
             "categoryId": "c2", "categoryName": "Salary", "categoryType": "INCOME"},
            {"id": "t3", "date": "2025-02-02", "amount": -12, "description": "Coffee beans",
             "type": "EXPENSE"}
        ])
    }

    fn many(count: usize) -> String {
        let items: Vec<Value> = (0..count)
            .map(|i| json!({"id": format!("t{i}"), "date": "2025-03-01", "amount": -1}))
            .collect();
        Value::Array(items).to_string()
    }

    fn setup(
        responses: Vec<Result<RawResponse, String>>,
    ) -> (Harness, TransactionController, Arc<RecordingView<Transaction>>) {
        let harness = Harness::signed_in(ScriptedTransport::new(responses));
        let view = Arc::new(RecordingView::default());
        let controller = TransactionController::new(harness.api.clone(), view.clone());
        (harness, controller, view)
    }

    fn ids(transactions: Vec<&Transaction>) -> Vec<&str> {
        transactions.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[tokio::test]
    async fn filters_combine_date_category_type_and_search() {
        let (_harness, mut controller, _view) =
            setup(vec![Ok(RawResponse::json(200, sample().to_string()))]);
        controller.load().await.expect("loaded");

        controller.set_filter(TransactionFilter {
            date_from: Some(date(2025, 1, 10)),
            ..TransactionFilter::default()
        });
        assert_eq!(ids(controller.filtered()), vec!["t2", "t3"]);

        controller.set_filter(TransactionFilter {
            category: Some("Food".to_string()),
            ..TransactionFilter::default()
        });
        assert_eq!(ids(controller.filtered()), vec!["t1"]);

        controller.set_filter(TransactionFilter {
            kind: Some("expense".to_string()),
            ..TransactionFilter::default()
        });
        assert_eq!(ids(controller.filtered()), vec!["t1", "t3"]);

        controller.set_filter(TransactionFilter {
            search: Some("SALARY".to_string()),
            date_to: Some(date(2025, 1, 31)),
            ..TransactionFilter::default()
        });
        assert_eq!(ids(controller.filtered()), vec!["t2"]);
    }

    #[tokio::test]
    async fn totals_cover_all_loaded_transactions() {
        let (_harness, mut controller, _view) =
            setup(vec![Ok(RawResponse::json(200, sample().to_string()))]);
        controller.load().await.expect("loaded");

        let totals = controller.totals();

        assert_eq!(totals.count, 3);
        assert_eq!(totals.income, 2500.0);
        assert_eq!(totals.expenses, 54.5);
        assert_eq!(totals.net, 2445.5);
    }

    #[tokio::test]
    async fn pages_hold_twenty_items() {
        let (_harness, mut controller, view) = setup(vec![Ok(RawResponse::json(200, many(45)))]);
        controller.load().await.expect("loaded");

        assert_eq!(controller.page_count(), 3);
        assert_eq!(view.last_list().map(|page| page.len()), Some(20));

        controller.next_page();
        controller.next_page();
        controller.next_page();

        assert_eq!(controller.current_page(), 3);
        assert_eq!(controller.page_items().len(), 5);
        assert_eq!(view.last_list().map(|page| page.len()), Some(5));

        controller.set_filter(TransactionFilter::default());
        assert_eq!(controller.current_page(), 1);
    }

    #[tokio::test]
    async fn when_nothing_is_loaded_then_empty_state_is_rendered() {
        let (_harness, mut controller, view) = setup(vec![Ok(RawResponse::json(200, "[]"))]);

        controller.load().await.expect("loaded");

        assert_eq!(controller.page_count(), 0);
        assert_eq!(view.empty_renders(), 1);
        assert_eq!(view.list_renders(), 0);
    }

    #[tokio::test]
    async fn category_update_puts_category_id_then_reloads() {
        let (harness, mut controller, _view) = setup(vec![
            Ok(RawResponse::json(200, sample().to_string())),
            Ok(RawResponse::json(200, "{}")),
            Ok(RawResponse::json(200, sample().to_string())),
        ]);
        controller.load().await.expect("loaded");

        controller.update_category("t3", "c1").await.expect("updated");

        let requests = harness.transport.requests();
        assert_eq!(requests[1].method, HttpMethod::Put);
        assert_eq!(requests[1].url, "http://backend.test/api/transactions/t3/category");
        assert_eq!(requests[1].body, RequestBody::Json(json!({ "categoryId": "c1" })));
        assert_eq!(requests[2].url, "http://backend.test/api/transactions");
    }

    #[tokio::test]
    async fn bulk_update_counts_successes_and_failures() {
        let (harness, mut controller, view) = setup(vec![
            Ok(RawResponse::json(200, sample().to_string())),
            Ok(RawResponse::json(200, "{}")),
            Ok(RawResponse::json(404, "{\"message\":\"Transaction not found\"}")),
            Ok(RawResponse::json(200, sample().to_string())),
        ]);
        controller.load().await.expect("loaded");
        controller.set_filter(TransactionFilter {
            kind: Some("EXPENSE".to_string()),
            ..TransactionFilter::default()
        });

        let outcome = controller.bulk_update_category("c9").await.expect("bulk ran");

        assert_eq!(outcome, BulkOutcome { updated: 1, failed: 1 });
        assert_eq!(harness.transport.requests().len(), 4);
        assert!(view.messages().contains(&(
            "Updated 1 transactions, 1 failed".to_string(),
            MessageKind::Warning
        )));
    }

    #[tokio::test]
    async fn bulk_update_with_nothing_filtered_is_rejected() {
        let (harness, mut controller, _view) = setup(vec![Ok(RawResponse::json(200, "[]"))]);
        controller.load().await.expect("loaded");

        let result = controller.bulk_update_category("c9").await;

        assert_eq!(
            result,
            Err(ActionError::Validation("No transactions to update".to_string()))
        );
        assert_eq!(harness.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn when_load_fails_then_transactions_are_cleared() {
        let (_harness, mut controller, view) = setup(vec![
            Ok(RawResponse::json(200, sample().to_string())),
            Ok(RawResponse::json(500, "")),
        ]);
        controller.load().await.expect("loaded");

        assert!(controller.load().await.is_err());
        assert!(controller.transactions().is_empty());
        assert_eq!(view.empty_renders(), 1);
    }
}

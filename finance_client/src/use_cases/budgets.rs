use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::errors::ActionError;
use crate::domain::ports::ResourceView;
use crate::domain::records::{Budget, BudgetStats, BudgetStatus, BudgetUpdate, Category, NewBudget};
use crate::interface_adapters::api::{FinanceApi, LimitRequest};
use crate::use_cases::controller::{CrudController, LoadFailurePolicy, Notice};

/// Fields of the create-budget form.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetForm {
    pub name: String,
    pub description: String,
    pub amount: f64,
    pub period: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category_limits: Vec<LimitRequest>,
}

pub struct BudgetController {
    api: FinanceApi,
    list: CrudController<Budget>,
    categories: Vec<Category>,
}

impl BudgetController {
    pub fn new(api: FinanceApi, view: Arc<dyn ResourceView<Budget>>) -> Self {
        Self {
            api,
            list: CrudController::new("budgets", view, LoadFailurePolicy::Clear),
            categories: Vec::new(),
        }
    }

    pub fn budgets(&self) -> &[Budget] {
        self.list.items()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn stats(&self) -> BudgetStats {
        BudgetStats::from_budgets(self.list.items())
    }

    pub async fn load(&mut self) -> Result<usize, ActionError> {
        self.list.load(self.api.budgets()).await
    }

    /// Categories for the limit selectors. A failure leaves the selectors empty.
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

    #[tracing::instrument(name = "create_budget", skip_all, fields(name = %form.name))]
    pub async fn create(&mut self, form: BudgetForm) -> Result<Value, ActionError> {
        if form.name.trim().is_empty() {
            return Err(self.list.reject("Please fill in all required fields"));
        }
        if form.amount <= 0.0 {
            return Err(self.list.reject("Budget amount must be greater than 0"));
        }
        if form.end_date <= form.start_date {
            return Err(self.list.reject("End date must be after start date"));
        }
        if form.category_limits.is_empty() {
            return Err(self.list.reject("Please add at least one category with a limit"));
        }
        if form.category_limits.iter().any(|l| l.limit_amount <= 0.0) {
            return Err(self.list.reject("Please enter a valid positive number for the limit"));
        }

        let budget = NewBudget {
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            amount: form.amount,
            period: form.period,
            start_date: form.start_date,
            end_date: form.end_date,
            status: BudgetStatus::Active,
        };
        self.list
            .mutate(
                self.api.create_budget(&budget, &form.category_limits),
                self.api.budgets(),
                Notice::new("Budget created successfully!", "Failed to create budget"),
            )
            .await
    }

    /// Updates budget details only; category limits have their own calls.
    pub async fn update(&mut self, budget_id: &str, update: BudgetUpdate) -> Result<Value, ActionError> {
        if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(self.list.reject("Please fill in all required fields"));
        }
        let existing = self.find(budget_id);
        let start = update.start_date.or(existing.map(|b| b.start_date));
        let end = update.end_date.or(existing.map(|b| b.end_date));
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                return Err(self.list.reject("End date must be after start date"));
            }
        }

        self.list
            .mutate(
                self.api.update_budget(budget_id, &update),
                self.api.budgets(),
                Notice::new(
                    "Budget details updated successfully!",
                    "Failed to update budget details",
                ),
            )
            .await
    }

    pub async fn delete(&mut self, budget_id: &str) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.delete_budget(budget_id),
                self.api.budgets(),
                Notice::new("Budget deleted successfully!", "Failed to delete budget"),
            )
            .await
    }

    pub async fn archive(&mut self, budget_id: &str) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.archive_budget(budget_id),
                self.api.budgets(),
                Notice::new("Budget archived successfully!", "Failed to archive budget"),
            )
            .await
    }

    pub async fn evaluate(&mut self, budget_id: &str) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.evaluate_budget(budget_id),
                self.api.budgets(),
                Notice::new(
                    "Budget evaluation completed successfully!",
                    "Failed to evaluate budget",
                ),
            )
            .await
    }

    pub async fn summary(&self, budget_id: &str) -> Result<Value, ActionError> {
        self.list
            .run(self.api.budget_summary(budget_id), "Failed to load budget summary")
            .await
    }

    pub async fn update_category_limit(
        &mut self,
        budget_id: &str,
        category_id: &str,
        new_limit: f64,
    ) -> Result<Value, ActionError> {
        if new_limit <= 0.0 {
            return Err(self.list.reject("Please enter a valid positive number for the limit"));
        }
        let success = format!("Category limit updated successfully to ${new_limit:.2}");
        self.list
            .mutate(
                self.api.update_category_limit(budget_id, category_id, new_limit),
                self.api.budgets(),
                Notice::new(&success, "Failed to update category limit"),
            )
            .await
    }

    pub async fn add_category(
        &mut self,
        budget_id: &str,
        category_id: &str,
        limit_amount: f64,
    ) -> Result<Value, ActionError> {
        if category_id.trim().is_empty() {
            return Err(self.list.reject("Please select a category"));
        }
        if limit_amount <= 0.0 {
            return Err(self.list.reject("Please enter a valid positive number for the limit"));
        }
        let already_present = self
            .find(budget_id)
            .is_some_and(|b| b.category_limits.iter().any(|l| l.category_id == category_id));
        if already_present {
            return Err(self.list.reject("This category is already part of the budget"));
        }

        let limit = LimitRequest {
            category_id: category_id.to_string(),
            limit_amount,
        };
        let success = format!("Category added successfully with limit ${limit_amount:.2}");
        self.list
            .mutate(
                self.api.add_category_to_budget(budget_id, &limit),
                self.api.budgets(),
                Notice::new(&success, "Failed to add category"),
            )
            .await
    }

    pub async fn remove_category(
        &mut self,
        budget_id: &str,
        category_id: &str,
    ) -> Result<Value, ActionError> {
        let name = self
            .find(budget_id)
            .and_then(|b| b.category_limits.iter().find(|l| l.category_id == category_id))
            .and_then(|l| l.category_name.clone())
            .unwrap_or_else(|| category_id.to_string());
        let success = format!("Category \"{name}\" removed successfully from budget");
        self.list
            .mutate(
                self.api.remove_category_from_budget(budget_id, category_id),
                self.api.budgets(),
                Notice::new(&success, "Failed to remove category"),
            )
            .await
    }

    pub async fn attention_needed(&self) -> Result<Vec<Budget>, ActionError> {
        self.list
            .run(
                self.api.budgets_needing_attention(),
                "Failed to load budgets needing attention",
            )
            .await
    }

    pub async fn recalculate_spending(&mut self, budget_id: &str) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.recalculate_budget_spending(budget_id),
                self.api.budgets(),
                Notice::new(
                    "Budget spending refreshed successfully!",
                    "Error refreshing budget spending",
                ),
            )
            .await
    }

    pub async fn recalculate_all_spending(&mut self) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.recalculate_all_budget_spending(),
                self.api.budgets(),
                Notice::new(
                    "All budget spending recalculated successfully!",
                    "Error recalculating budget spending",
                ),
            )
            .await
    }

    pub async fn cleanup_invalid_categories(&mut self) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.cleanup_invalid_budget_categories(),
                self.api.budgets(),
                Notice::new(
                    "Invalid budget categories cleaned up successfully!",
                    "Error cleaning up budget categories",
                ),
            )
            .await
    }

    fn find(&self, budget_id: &str) -> Option<&Budget> {
        self.list.items().iter().find(|b| b.id == budget_id)
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ProgressClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    Active,
    Archived,
    // Any other backend state is shown as needing attention.
    #[serde(other)]
    Attention,
}

/// Per-category limit inside a budget, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLimit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default)]
    pub limit_amount: f64,
    #[serde(default)]
    pub spent_amount: f64,
}

impl CategoryLimit {
    /// Limit entry for a create request (no spending yet).
    pub fn new(category_id: impl Into<String>, limit_amount: f64) -> Self {
        Self {
            id: None,
            category_id: category_id.into(),
            category_name: None,
            limit_amount,
            spent_amount: 0.0,
        }
    }

    pub fn usage_percentage(&self) -> f64 {
        if self.limit_amount > 0.0 {
            self.spent_amount / self.limit_amount * 100.0
        } else {
            0.0
        }
    }

    pub fn remaining(&self) -> f64 {
        self.limit_amount - self.spent_amount
    }

    pub fn is_over_limit(&self) -> bool {
        self.limit_amount > 0.0 && self.spent_amount > self.limit_amount
    }

    pub fn progress_class(&self) -> ProgressClass {
        let percentage = self.usage_percentage();
        if percentage >= 90.0 {
            ProgressClass::Danger
        } else if percentage >= 75.0 {
            ProgressClass::Warning
        } else {
            ProgressClass::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub period: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BudgetStatus,
    #[serde(default)]
    pub category_limits: Vec<CategoryLimit>,
}

impl Budget {
    pub fn is_over_budget(&self) -> bool {
        self.category_limits.iter().any(CategoryLimit::is_over_limit)
    }

    pub fn total_limit(&self) -> f64 {
        self.category_limits.iter().map(|c| c.limit_amount).sum()
    }

    pub fn total_spent(&self) -> f64 {
        self.category_limits.iter().map(|c| c.spent_amount).sum()
    }

    pub fn status_text(&self) -> &'static str {
        match self.status {
            BudgetStatus::Active => "Active",
            BudgetStatus::Archived => "Archived",
            BudgetStatus::Attention => "Attention",
        }
    }
}

/// Summary counters shown above the budget list.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStats {
    pub total: usize,
    pub active: usize,
    pub total_amount: f64,
    pub over_budget: usize,
}

impl BudgetStats {
    pub fn from_budgets(budgets: &[Budget]) -> Self {
        Self {
            total: budgets.len(),
            active: budgets
                .iter()
                .filter(|b| b.status == BudgetStatus::Active)
                .count(),
            total_amount: budgets.iter().map(|b| b.amount.unwrap_or(0.0)).sum(),
            over_budget: budgets.iter().filter(|b| b.is_over_budget()).count(),
        }
    }
}

/// Budget body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub name: String,
    pub description: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BudgetStatus,
}

/// Partial update; unset fields are left out of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

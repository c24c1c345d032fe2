// Backend endpoint table. Paths must match the backend exactly.

use crate::domain::errors::ClientError;
use crate::domain::http::HttpMethod;
use url::Url;

/// Named HTTP method plus a path template with `{param}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: HttpMethod,
    pub template: &'static str,
}

impl Endpoint {
    const fn new(name: &'static str, method: HttpMethod, template: &'static str) -> Self {
        Self {
            name,
            method,
            template,
        }
    }

    /// Substitutes every `{param}` placeholder in one pass, percent-encoding each value
    /// as a single path segment. A placeholder with no matching param is an error.
    pub fn resolve(&self, params: &[(&str, &str)]) -> Result<String, ClientError> {
        let mut path = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(start) = rest.find('{') {
            path.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                return Err(ClientError::InvalidEndpoint(after.to_string()));
            };
            let name = &after[..end];
            let value = params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| ClientError::InvalidEndpoint(name.to_string()))?;
            let segment = encode_segment(value)
                .ok_or_else(|| ClientError::InvalidEndpoint(name.to_string()))?;
            path.push_str(&segment);
            rest = &after[end + 1..];
        }
        path.push_str(rest);

        Ok(path)
    }
}

// Percent-encodes `value` so it stays inside one path segment.
fn encode_segment(value: &str) -> Option<String> {
    // Servers collapse bare dot segments, so they are escaped outright.
    if value == "." || value == ".." {
        return Some(value.replace('.', "%2E"));
    }
    let mut url = Url::parse("http://segment.local/").ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push(value);
    url.path_segments()?.next_back().map(str::to_string)
}

use HttpMethod::{Delete, Get, Post, Put};

// Authentication
pub const LOGIN: Endpoint = Endpoint::new("login", Post, "/auth/login");
pub const REGISTER: Endpoint = Endpoint::new("register", Post, "/auth/register");
pub const VERIFY: Endpoint = Endpoint::new("verify", Get, "/auth/verify");
pub const HEALTH: Endpoint = Endpoint::new("health", Get, "/auth/health");

// Categories
pub const CATEGORIES: Endpoint = Endpoint::new("categories", Get, "/api/categories");
pub const CATEGORY_CREATE: Endpoint = Endpoint::new("category_create", Post, "/api/categories");
pub const CATEGORY_BY_ID: Endpoint =
    Endpoint::new("category_by_id", Get, "/api/categories/{categoryId}");

// Budgets
pub const BUDGETS: Endpoint = Endpoint::new("budgets", Get, "/api/budgets");
pub const BUDGET_CREATE: Endpoint = Endpoint::new("budget_create", Post, "/api/budgets");
pub const BUDGETS_ACTIVE: Endpoint = Endpoint::new("budgets_active", Get, "/api/budgets/active");
pub const BUDGET_SUMMARY: Endpoint =
    Endpoint::new("budget_summary", Get, "/api/budgets/{budgetId}/summary");
pub const BUDGET_UPDATE: Endpoint = Endpoint::new("budget_update", Put, "/api/budgets/{budgetId}");
pub const BUDGET_DELETE: Endpoint =
    Endpoint::new("budget_delete", Delete, "/api/budgets/{budgetId}");
pub const BUDGET_CATEGORY_LIMIT: Endpoint = Endpoint::new(
    "budget_category_limit",
    Put,
    "/api/budgets/{budgetId}/categories/{categoryId}/limit",
);
pub const BUDGET_ADD_CATEGORY: Endpoint = Endpoint::new(
    "budget_add_category",
    Post,
    "/api/budgets/{budgetId}/categories",
);
pub const BUDGET_REMOVE_CATEGORY: Endpoint = Endpoint::new(
    "budget_remove_category",
    Delete,
    "/api/budgets/{budgetId}/categories/{categoryId}",
);
pub const BUDGET_EVALUATE: Endpoint =
    Endpoint::new("budget_evaluate", Post, "/api/budgets/{budgetId}/evaluate");
pub const BUDGET_ARCHIVE: Endpoint =
    Endpoint::new("budget_archive", Put, "/api/budgets/{budgetId}/archive");
pub const BUDGETS_ATTENTION_NEEDED: Endpoint = Endpoint::new(
    "budgets_attention_needed",
    Get,
    "/api/budgets/attention-needed",
);
pub const BUDGETS_RECALCULATE_SPENDING: Endpoint = Endpoint::new(
    "budgets_recalculate_spending",
    Post,
    "/api/budgets/recalculate-spending",
);
pub const BUDGET_RECALCULATE_SPENDING: Endpoint = Endpoint::new(
    "budget_recalculate_spending",
    Post,
    "/api/budgets/{budgetId}/recalculate-spending",
);
pub const BUDGETS_CLEANUP_INVALID_CATEGORIES: Endpoint = Endpoint::new(
    "budgets_cleanup_invalid_categories",
    Post,
    "/api/budgets/cleanup-invalid-categories",
);

// Goals
pub const GOALS: Endpoint = Endpoint::new("goals", Get, "/api/goals");
pub const GOAL_CREATE: Endpoint = Endpoint::new("goal_create", Post, "/api/goals");
pub const GOAL_BY_ID: Endpoint = Endpoint::new("goal_by_id", Get, "/api/goals/{goalId}");
pub const GOAL_UPDATE: Endpoint = Endpoint::new("goal_update", Put, "/api/goals/{goalId}");
pub const GOAL_DELETE: Endpoint = Endpoint::new("goal_delete", Delete, "/api/goals/{goalId}");
pub const GOAL_UPDATE_PROGRESS: Endpoint =
    Endpoint::new("goal_update_progress", Put, "/api/goals/{goalId}/progress");
pub const GOALS_EVALUATE: Endpoint = Endpoint::new("goals_evaluate", Post, "/api/goals/evaluate");
pub const GOALS_CALCULATE_PROGRESS: Endpoint = Endpoint::new(
    "goals_calculate_progress",
    Post,
    "/api/goals/calculate-progress",
);

// Transactions
pub const TRANSACTION_UPLOAD: Endpoint =
    Endpoint::new("transaction_upload", Post, "/api/transactions/upload");
pub const TRANSACTION_UPLOAD_STATUS: Endpoint = Endpoint::new(
    "transaction_upload_status",
    Get,
    "/api/transactions/upload/status",
);
pub const TRANSACTION_UPLOAD_FORMATS: Endpoint = Endpoint::new(
    "transaction_upload_formats",
    Get,
    "/api/transactions/upload/formats",
);
pub const TRANSACTION_UPLOAD_TEMPLATE: Endpoint = Endpoint::new(
    "transaction_upload_template",
    Get,
    "/api/transactions/upload/template",
);
pub const TRANSACTIONS: Endpoint = Endpoint::new("transactions", Get, "/api/transactions");
pub const TRANSACTION_CATEGORY: Endpoint =
    Endpoint::new("transaction_category", Put, "/api/transactions/{id}/category");

// Insights
pub const INSIGHT_CREATE: Endpoint = Endpoint::new("insight_create", Post, "/api/insights");
pub const INSIGHTS: Endpoint = Endpoint::new("insights", Get, "/api/insights");
pub const INSIGHT_VIEW: Endpoint = Endpoint::new("insight_view", Put, "/api/insights/{id}/view");
pub const INSIGHT_DELETE: Endpoint = Endpoint::new("insight_delete", Delete, "/api/insights/{id}");

// Rule engine
pub const RULE_ENGINE_EVALUATE: Endpoint =
    Endpoint::new("rule_engine_evaluate", Post, "/api/rule-engine/evaluate");
pub const RULE_ENGINE_EASY_RULES: Endpoint = Endpoint::new(
    "rule_engine_easy_rules",
    Post,
    "/api/rule-engine/evaluate/easy-rules",
);
pub const RULE_ENGINE_EVALUATE_USER: Endpoint = Endpoint::new(
    "rule_engine_evaluate_user",
    Post,
    "/api/rule-engine/evaluate/{userId}",
);

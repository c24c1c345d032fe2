// Typed facade over the endpoint table: one method per backend call.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::endpoints::{self, Endpoint};
use crate::domain::errors::ClientError;
use crate::domain::http::{FilePart, MultipartForm};
use crate::domain::records::{
    Budget, BudgetUpdate, Category, Goal, GoalRequest, Insight, InsightRequest, NewBudget,
    NewCategory, Transaction, UploadOptions, UploadResult,
};
use crate::interface_adapters::clients::{ApiClient, ApiRequest};
use crate::interface_adapters::decoder::{self, DecodedResponse};

/// Body of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Category limit as sent when creating a budget or adding a category to one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitRequest {
    pub category_id: String,
    pub limit_amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBudgetRequest<'a> {
    budget: &'a NewBudget,
    category_limits: &'a [LimitRequest],
}

#[derive(Clone)]
pub struct FinanceApi {
    client: ApiClient,
}

impl FinanceApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // --- authentication (no session required) ---

    /// Non-2xx responses carry only the backend's `message` field, empty when absent.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = ApiRequest::to(endpoints::LOGIN, &[])?.json(&LoginRequest { email, password })?;
        self.auth_call(request).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let request = ApiRequest::to(endpoints::REGISTER, &[])?.json(&RegisterRequest {
            name,
            email,
            password,
        })?;
        self.auth_call(request).await
    }

    pub async fn health(&self) -> Result<String, ClientError> {
        let request = ApiRequest::to(endpoints::HEALTH, &[])?;
        Ok(match self.client.request_public(request).await? {
            DecodedResponse::Text(text) => text,
            DecodedResponse::Json(value) => value.to_string(),
            DecodedResponse::Empty => String::new(),
        })
    }

    pub async fn verify_token(&self) -> bool {
        self.client.verify_token().await
    }

    async fn auth_call(&self, request: ApiRequest) -> Result<AuthResponse, ClientError> {
        let response = self.client.send_public(request).await?;
        if !response.is_success() {
            return Err(ClientError::Api {
                status: response.status,
                message: decoder::backend_message(&response).unwrap_or_default(),
            });
        }
        decoder::decode(&response)?.into_typed()
    }

    // --- categories ---

    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.list(endpoints::CATEGORIES, &[]).await
    }

    pub async fn category(&self, category_id: &str) -> Result<Category, ClientError> {
        self.typed(endpoints::CATEGORY_BY_ID, &[("categoryId", category_id)], None)
            .await
    }

    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, ClientError> {
        self.typed(endpoints::CATEGORY_CREATE, &[], Some(to_value(category)?))
            .await
    }

    // --- budgets ---

    pub async fn budgets(&self) -> Result<Vec<Budget>, ClientError> {
        self.list(endpoints::BUDGETS, &[]).await
    }

    pub async fn active_budgets(&self) -> Result<Vec<Budget>, ClientError> {
        self.list(endpoints::BUDGETS_ACTIVE, &[]).await
    }

    pub async fn budgets_needing_attention(&self) -> Result<Vec<Budget>, ClientError> {
        self.list(endpoints::BUDGETS_ATTENTION_NEEDED, &[]).await
    }

    pub async fn create_budget(
        &self,
        budget: &NewBudget,
        category_limits: &[LimitRequest],
    ) -> Result<Value, ClientError> {
        let body = to_value(&CreateBudgetRequest {
            budget,
            category_limits,
        })?;
        self.action(endpoints::BUDGET_CREATE, &[], Some(body)).await
    }

    pub async fn budget_summary(&self, budget_id: &str) -> Result<Value, ClientError> {
        self.action(endpoints::BUDGET_SUMMARY, &[("budgetId", budget_id)], None)
            .await
    }

    pub async fn update_budget(
        &self,
        budget_id: &str,
        update: &BudgetUpdate,
    ) -> Result<Value, ClientError> {
        self.action(
            endpoints::BUDGET_UPDATE,
            &[("budgetId", budget_id)],
            Some(to_value(update)?),
        )
        .await
    }

    pub async fn delete_budget(&self, budget_id: &str) -> Result<Value, ClientError> {
        self.action(endpoints::BUDGET_DELETE, &[("budgetId", budget_id)], None)
            .await
    }

    pub async fn archive_budget(&self, budget_id: &str) -> Result<Value, ClientError> {
        self.action(endpoints::BUDGET_ARCHIVE, &[("budgetId", budget_id)], None)
            .await
    }

    pub async fn evaluate_budget(&self, budget_id: &str) -> Result<Value, ClientError> {
        self.action(endpoints::BUDGET_EVALUATE, &[("budgetId", budget_id)], None)
            .await
    }

    pub async fn update_category_limit(
        &self,
        budget_id: &str,
        category_id: &str,
        new_limit: f64,
    ) -> Result<Value, ClientError> {
        self.action(
            endpoints::BUDGET_CATEGORY_LIMIT,
            &[("budgetId", budget_id), ("categoryId", category_id)],
            Some(json!({ "newLimit": new_limit })),
        )
        .await
    }

    pub async fn add_category_to_budget(
        &self,
        budget_id: &str,
        limit: &LimitRequest,
    ) -> Result<Value, ClientError> {
        self.action(
            endpoints::BUDGET_ADD_CATEGORY,
            &[("budgetId", budget_id)],
            Some(to_value(limit)?),
        )
        .await
    }

    pub async fn remove_category_from_budget(
        &self,
        budget_id: &str,
        category_id: &str,
    ) -> Result<Value, ClientError> {
        self.action(
            endpoints::BUDGET_REMOVE_CATEGORY,
            &[("budgetId", budget_id), ("categoryId", category_id)],
            None,
        )
        .await
    }

    pub async fn recalculate_budget_spending(&self, budget_id: &str) -> Result<Value, ClientError> {
        self.action(
            endpoints::BUDGET_RECALCULATE_SPENDING,
            &[("budgetId", budget_id)],
            None,
        )
        .await
    }

    pub async fn recalculate_all_budget_spending(&self) -> Result<Value, ClientError> {
        self.action(endpoints::BUDGETS_RECALCULATE_SPENDING, &[], None)
            .await
    }

    pub async fn cleanup_invalid_budget_categories(&self) -> Result<Value, ClientError> {
        self.action(endpoints::BUDGETS_CLEANUP_INVALID_CATEGORIES, &[], None)
            .await
    }

    // --- goals ---

    pub async fn goals(&self) -> Result<Vec<Goal>, ClientError> {
        self.list(endpoints::GOALS, &[]).await
    }

    pub async fn goal(&self, goal_id: &str) -> Result<Goal, ClientError> {
        self.typed(endpoints::GOAL_BY_ID, &[("goalId", goal_id)], None)
            .await
    }

    pub async fn create_goal(&self, goal: &GoalRequest) -> Result<Value, ClientError> {
        self.action(endpoints::GOAL_CREATE, &[], Some(to_value(goal)?))
            .await
    }

    pub async fn update_goal(&self, goal_id: &str, goal: &GoalRequest) -> Result<Value, ClientError> {
        self.action(
            endpoints::GOAL_UPDATE,
            &[("goalId", goal_id)],
            Some(to_value(goal)?),
        )
        .await
    }

    pub async fn update_goal_progress(&self, goal_id: &str, amount: f64) -> Result<Value, ClientError> {
        self.action(
            endpoints::GOAL_UPDATE_PROGRESS,
            &[("goalId", goal_id)],
            Some(json!({ "amount": amount })),
        )
        .await
    }

    pub async fn delete_goal(&self, goal_id: &str) -> Result<Value, ClientError> {
        self.action(endpoints::GOAL_DELETE, &[("goalId", goal_id)], None)
            .await
    }

    pub async fn evaluate_goals(&self) -> Result<Value, ClientError> {
        self.action(endpoints::GOALS_EVALUATE, &[], None).await
    }

    pub async fn calculate_goal_progress(&self) -> Result<Value, ClientError> {
        self.action(endpoints::GOALS_CALCULATE_PROGRESS, &[], None)
            .await
    }

    // --- transactions ---

    pub async fn transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        self.list(endpoints::TRANSACTIONS, &[]).await
    }

    pub async fn update_transaction_category(
        &self,
        transaction_id: &str,
        category_id: &str,
    ) -> Result<Value, ClientError> {
        self.action(
            endpoints::TRANSACTION_CATEGORY,
            &[("id", transaction_id)],
            Some(json!({ "categoryId": category_id })),
        )
        .await
    }

    /// Multipart upload; the transport supplies the content type and boundary.
    pub async fn upload_transactions(
        &self,
        file: FilePart,
        options: &UploadOptions,
    ) -> Result<UploadResult, ClientError> {
        let form = MultipartForm {
            file: Some(file),
            fields: vec![
                ("currency".to_string(), options.currency.clone()),
                (
                    "autoCategorize".to_string(),
                    options.auto_categorize.to_string(),
                ),
                (
                    "skipDuplicates".to_string(),
                    options.skip_duplicates.to_string(),
                ),
                ("dateFormat".to_string(), options.date_format.clone()),
            ],
        };
        let request = ApiRequest::to(endpoints::TRANSACTION_UPLOAD, &[])?.multipart(form);
        self.client.request(request).await?.into_typed()
    }

    pub async fn upload_status(&self) -> Result<Value, ClientError> {
        self.action(endpoints::TRANSACTION_UPLOAD_STATUS, &[], None)
            .await
    }

    pub async fn upload_formats(&self) -> Result<Value, ClientError> {
        self.action(endpoints::TRANSACTION_UPLOAD_FORMATS, &[], None)
            .await
    }

    pub async fn upload_template(&self) -> Result<Value, ClientError> {
        self.action(endpoints::TRANSACTION_UPLOAD_TEMPLATE, &[], None)
            .await
    }

    // --- insights ---

    pub async fn insights(&self) -> Result<Vec<Insight>, ClientError> {
        self.list(endpoints::INSIGHTS, &[]).await
    }

    pub async fn create_insight(&self, request: &InsightRequest) -> Result<Value, ClientError> {
        self.action(endpoints::INSIGHT_CREATE, &[], Some(to_value(request)?))
            .await
    }

    pub async fn mark_insight_viewed(&self, insight_id: &str) -> Result<Value, ClientError> {
        self.action(endpoints::INSIGHT_VIEW, &[("id", insight_id)], None)
            .await
    }

    pub async fn delete_insight(&self, insight_id: &str) -> Result<Value, ClientError> {
        self.action(endpoints::INSIGHT_DELETE, &[("id", insight_id)], None)
            .await
    }

    // --- rule engine ---

    pub async fn evaluate_rules(&self) -> Result<Value, ClientError> {
        self.action(endpoints::RULE_ENGINE_EVALUATE, &[], None).await
    }

    pub async fn evaluate_rules_with_easy_rules(&self) -> Result<Value, ClientError> {
        self.action(endpoints::RULE_ENGINE_EASY_RULES, &[], None)
            .await
    }

    pub async fn evaluate_rules_for_user(&self, user_id: &str) -> Result<Value, ClientError> {
        self.action(
            endpoints::RULE_ENGINE_EVALUATE_USER,
            &[("userId", user_id)],
            None,
        )
        .await
    }

    // --- helpers ---

    async fn call(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<DecodedResponse, ClientError> {
        let mut request = ApiRequest::to(endpoint, params)?;
        if let Some(body) = body {
            request = request.json_value(body);
        }
        tracing::debug!(endpoint = endpoint.name, "calling backend");
        self.client.request(request).await
    }

    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, ClientError> {
        self.call(endpoint, params, None).await?.into_list()
    }

    async fn typed<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        self.call(endpoint, params, body).await?.into_typed()
    }

    async fn action(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        self.typed(endpoint, params, body).await
    }
}

fn to_value<T: Serialize>(body: &T) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::MalformedJson {
        preview: String::new(),
        diagnostic: format!("request body could not be encoded: {e}"),
    })
}

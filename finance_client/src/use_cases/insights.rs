use chrono::Datelike;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::errors::ActionError;
use crate::domain::ports::{Clock, ResourceView};
use crate::domain::records::insight::{DEFAULT_TIME_PERIOD, MIN_QUESTION_LENGTH, extract_time_period};
use crate::domain::records::{Insight, InsightRequest};
use crate::interface_adapters::api::FinanceApi;
use crate::use_cases::controller::{CrudController, LoadFailurePolicy, Notice};

pub const DEFAULT_ANALYSIS_DEPTH: &str = "DETAILED";

/// A question as typed into the insight form.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightQuestion {
    pub question: String,
    /// Explicit period; derived from the question text when unset.
    pub time_period: Option<String>,
    pub category_filter: Option<String>,
    pub analysis_depth: String,
}

impl InsightQuestion {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            time_period: None,
            category_filter: None,
            analysis_depth: DEFAULT_ANALYSIS_DEPTH.to_string(),
        }
    }
}

/// Insight history. A failed load keeps the insights already on screen.
pub struct InsightController {
    api: FinanceApi,
    clock: Arc<dyn Clock>,
    list: CrudController<Insight>,
}

impl InsightController {
    pub fn new(api: FinanceApi, clock: Arc<dyn Clock>, view: Arc<dyn ResourceView<Insight>>) -> Self {
        Self {
            api,
            clock,
            list: CrudController::new("insights", view, LoadFailurePolicy::Keep),
        }
    }

    pub fn insights(&self) -> &[Insight] {
        self.list.items()
    }

    pub fn unviewed(&self) -> usize {
        self.list.items().iter().filter(|i| !i.viewed).count()
    }

    pub async fn load(&mut self) -> Result<usize, ActionError> {
        self.list.load(self.api.insights()).await
    }

    /// Builds the backend request, resolving the time period from the question when needed.
    pub fn build_request(&self, input: &InsightQuestion) -> Result<InsightRequest, ActionError> {
        let question = input.question.trim();
        if question.chars().count() < MIN_QUESTION_LENGTH {
            return Err(self.list.reject(&format!(
                "Please enter a question with at least {MIN_QUESTION_LENGTH} characters"
            )));
        }

        let time_period = input
            .time_period
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .or_else(|| extract_time_period(question, self.clock.today().year()))
            .unwrap_or_else(|| DEFAULT_TIME_PERIOD.to_string());
        let category_filter = input
            .category_filter
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(InsightRequest {
            question: question.to_string(),
            time_period,
            category_filter,
            include_charts: true,
            analysis_depth: input.analysis_depth.clone(),
        })
    }

    #[tracing::instrument(name = "ask_insight", skip_all)]
    pub async fn ask(&mut self, input: InsightQuestion) -> Result<Value, ActionError> {
        let request = self.build_request(&input)?;
        tracing::debug!(time_period = %request.time_period, "requesting insight");
        self.list
            .mutate(
                self.api.create_insight(&request),
                self.api.insights(),
                Notice::new("Insight generated successfully!", "Error generating insight"),
            )
            .await
    }

    pub async fn mark_viewed(&mut self, insight_id: &str) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.mark_insight_viewed(insight_id),
                self.api.insights(),
                Notice::new("Insight marked as viewed", "Error marking insight as viewed"),
            )
            .await
    }

    pub async fn delete(&mut self, insight_id: &str) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.delete_insight(insight_id),
                self.api.insights(),
                Notice::new("Insight deleted successfully", "Error deleting insight"),
            )
            .await
    }
}

use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::errors::{ActionError, ClientError};
use crate::domain::ports::{Clock, ResourceView};
use crate::domain::records::goal::display_order;
use crate::domain::records::{Category, Goal, GoalRequest, GoalStats};
use crate::interface_adapters::api::FinanceApi;
use crate::use_cases::controller::{CrudController, LoadFailurePolicy, Notice};

pub struct GoalController {
    api: FinanceApi,
    clock: Arc<dyn Clock>,
    list: CrudController<Goal>,
    categories: Vec<Category>,
}

impl GoalController {
    pub fn new(api: FinanceApi, clock: Arc<dyn Clock>, view: Arc<dyn ResourceView<Goal>>) -> Self {
        Self {
            api,
            clock,
            list: CrudController::new("goals", view, LoadFailurePolicy::Clear),
            categories: Vec::new(),
        }
    }

    /// Goals in display order: active by nearest target date, completed last.
    pub fn goals(&self) -> &[Goal] {
        self.list.items()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn stats(&self) -> GoalStats {
        GoalStats::from_goals(self.list.items(), self.clock.today())
    }

    pub async fn load(&mut self) -> Result<usize, ActionError> {
        self.list.load(ordered_goals(&self.api)).await
    }

    pub async fn load_categories(&mut self) -> Result<usize, ActionError> {
        match self.list.run(self.api.categories(), "Error loading categories").await {
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

    pub async fn create(&mut self, goal: GoalRequest) -> Result<Value, ActionError> {
        self.validate(&goal)?;
        self.list
            .mutate(
                self.api.create_goal(&goal),
                ordered_goals(&self.api),
                Notice::new("Goal created successfully!", "Error creating goal"),
            )
            .await
    }

    pub async fn update(&mut self, goal_id: &str, goal: GoalRequest) -> Result<Value, ActionError> {
        self.validate(&goal)?;
        self.list
            .mutate(
                self.api.update_goal(goal_id, &goal),
                ordered_goals(&self.api),
                Notice::new("Goal updated successfully!", "Error updating goal"),
            )
            .await
    }

    pub async fn delete(&mut self, goal_id: &str) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.delete_goal(goal_id),
                ordered_goals(&self.api),
                Notice::new("Goal deleted successfully!", "Error deleting goal"),
            )
            .await
    }

    /// Adds `amount` to the goal's saved total.
    pub async fn update_progress(&mut self, goal_id: &str, amount: f64) -> Result<Value, ActionError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(self.list.reject("Please enter a valid positive amount"));
        }
        self.list
            .mutate(
                self.api.update_goal_progress(goal_id, amount),
                ordered_goals(&self.api),
                Notice::new("Progress updated successfully!", "Error updating progress"),
            )
            .await
    }

    pub async fn evaluate_all(&mut self) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.evaluate_goals(),
                ordered_goals(&self.api),
                Notice::new("All goals have been evaluated!", "Error evaluating goals"),
            )
            .await
    }

    pub async fn calculate_progress(&mut self) -> Result<Value, ActionError> {
        self.list
            .mutate(
                self.api.calculate_goal_progress(),
                ordered_goals(&self.api),
                Notice::new(
                    "Goal progress has been calculated from transactions!",
                    "Error calculating goal progress",
                ),
            )
            .await
    }

    fn validate(&self, goal: &GoalRequest) -> Result<(), ActionError> {
        if goal.name.trim().is_empty() {
            return Err(self.list.reject("Please fill in all required fields"));
        }
        if !goal.target_amount.is_finite() || goal.target_amount <= 0.0 {
            return Err(self.list.reject("Target amount must be greater than 0"));
        }
        Ok(())
    }
}

async fn ordered_goals(api: &FinanceApi) -> Result<Vec<Goal>, ClientError> {
    let goals = api.goals().await?;
    Ok(display_order(&goals).into_iter().cloned().collect())
}

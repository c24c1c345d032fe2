use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ProgressClass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub progress_percentage: f64,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl Goal {
    /// Calendar days until the target date; negative once overdue.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.target_date < today
    }

    pub fn days_text(&self, today: NaiveDate) -> String {
        let days = self.days_remaining(today);
        match days.cmp(&0) {
            Ordering::Greater => format!("{days} days left"),
            Ordering::Equal => "Due today!".to_string(),
            Ordering::Less => format!("{} days overdue", days.abs()),
        }
    }

    pub fn progress_class(&self) -> ProgressClass {
        if self.progress_percentage >= 80.0 {
            ProgressClass::Success
        } else if self.progress_percentage >= 50.0 {
            ProgressClass::Warning
        } else {
            ProgressClass::Danger
        }
    }

    /// Progress bar width, capped at a full bar.
    pub fn bar_width(&self) -> f64 {
        self.progress_percentage.clamp(0.0, 100.0)
    }
}

/// Display order: active goals by earliest target date, completed goals last.
pub fn display_order(goals: &[Goal]) -> Vec<&Goal> {
    let mut sorted: Vec<&Goal> = goals.iter().collect();
    sorted.sort_by(|a, b| match (a.completed, b.completed) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
        (false, false) => a.target_date.cmp(&b.target_date),
    });
    sorted
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub overdue: usize,
}

impl GoalStats {
    pub fn from_goals(goals: &[Goal], today: NaiveDate) -> Self {
        Self {
            total: goals.len(),
            completed: goals.iter().filter(|g| g.completed).count(),
            active: goals.iter().filter(|g| !g.completed).count(),
            overdue: goals.iter().filter(|g| g.is_overdue(today)).count(),
        }
    }
}

/// Create/update payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRequest {
    pub name: String,
    pub target_amount: f64,
    pub target_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub currency: String,
}

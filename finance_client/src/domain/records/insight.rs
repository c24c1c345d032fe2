use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_QUESTION_LENGTH: usize = 10;
pub const DEFAULT_TIME_PERIOD: &str = "LAST_30_DAYS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_question: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub viewed: bool,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub category_tags: Option<String>,
    #[serde(default)]
    pub time_period: Option<String>,
    #[serde(default)]
    pub insight_data: Option<Value>,
}

impl Insight {
    pub fn confidence_percent(&self) -> u32 {
        let score = self.confidence_score.unwrap_or(0.0).clamp(0.0, 1.0);
        (score * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub question: String,
    pub time_period: String,
    pub category_filter: Option<String>,
    pub include_charts: bool,
    pub analysis_depth: String,
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Derives a backend time-period code from free-form question text.
pub fn extract_time_period(question: &str, year: i32) -> Option<String> {
    let lower = question.to_lowercase();

    if let Some(month) = MONTHS.iter().find(|month| lower.contains(*month)) {
        return Some(format!("{}_{year}", month.to_uppercase()));
    }

    let words: Vec<&str> = lower.split_whitespace().collect();
    for window in words.windows(3) {
        if let [first, count, unit] = window {
            if *first == "last" && unit.starts_with("days") && count.parse::<u32>().is_ok() {
                return Some(format!("LAST_{count}_DAYS"));
            }
        }
    }

    if lower.contains("this month") {
        return Some("CURRENT_MONTH".to_string());
    }
    if lower.contains("this year") {
        return Some("CURRENT_YEAR".to_string());
    }

    None
}

use serde::{Deserialize, Serialize};

use super::ProgressClass;

const PREVIEW_LINES: usize = 6;

/// Options sent alongside an uploaded statement file.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOptions {
    pub currency: String,
    pub auto_categorize: bool,
    pub skip_duplicates: bool,
    pub date_format: String,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            auto_categorize: true,
            skip_duplicates: true,
            date_format: "yyyy-MM-dd".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadResult {
    pub total_rows: u32,
    pub successful_transactions: u32,
    pub failed_transactions: u32,
    pub skipped_duplicates: u32,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub processing_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Failed,
    Completed,
    CompletedWithIssues,
}

impl UploadResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn outcome(&self) -> UploadOutcome {
        if self.has_errors() {
            UploadOutcome::Failed
        } else if self.successful_transactions > 0 {
            UploadOutcome::Completed
        } else {
            UploadOutcome::CompletedWithIssues
        }
    }

    pub fn severity(&self) -> ProgressClass {
        if self.has_errors() {
            ProgressClass::Danger
        } else if self.has_warnings() {
            ProgressClass::Warning
        } else {
            ProgressClass::Success
        }
    }
}

/// First rows of a CSV file (header included), split naively on commas.
pub fn csv_preview(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .take(PREVIEW_LINES)
        .map(|line| {
            line.split(',')
                .map(|cell| {
                    let cell = cell.trim();
                    let cell = cell.strip_prefix('"').unwrap_or(cell);
                    cell.strip_suffix('"').unwrap_or(cell).to_string()
                })
                .collect()
        })
        .collect()
}

fn matches_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.chars().zip(shape.chars()).all(|(v, s)| match s {
            'd' => v.is_ascii_digit(),
            other => v == other,
        })
}

/// Guesses the date format of a sample cell. Slash-separated day-first and
/// month-first dates are indistinguishable, so `MM/dd/yyyy` wins.
pub fn detect_date_format(value: &str) -> Option<&'static str> {
    let value = value.trim();
    [
        ("dddd-dd-dd", "yyyy-MM-dd"),
        ("dd/dd/dddd", "MM/dd/yyyy"),
        ("dddd/dd/dd", "yyyy/MM/dd"),
    ]
    .into_iter()
    .find(|(shape, _)| matches_shape(value, shape))
    .map(|(_, format)| format)
}

/// Guesses the currency of a sample amount from its symbol.
pub fn detect_currency(amount: &str) -> Option<&'static str> {
    // Prefixed dollar symbols must be checked before the bare `$`.
    [
        ("C$", "CAD"),
        ("A$", "AUD"),
        ("$", "USD"),
        ("€", "EUR"),
        ("£", "GBP"),
        ("¥", "JPY"),
    ]
    .into_iter()
    .find(|(symbol, _)| amount.contains(symbol))
    .map(|(_, currency)| currency)
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let units = ["Bytes", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < units.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    let rounded = (size * 100.0).round() / 100.0;
    format!("{rounded} {}", units[unit])
}

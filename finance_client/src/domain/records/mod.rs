// Resource records mirrored from the backend, with their display-only derived values.

pub mod budget;
pub mod category;
pub mod goal;
pub mod insight;
pub mod transaction;
pub mod upload;

pub use budget::{Budget, BudgetStats, BudgetStatus, BudgetUpdate, CategoryLimit, NewBudget};
pub use category::{Category, CategoryType, NewCategory};
pub use goal::{Goal, GoalRequest, GoalStats};
pub use insight::{Insight, InsightRequest};
pub use transaction::{Transaction, TransactionTotals};
pub use upload::{UploadOptions, UploadOutcome, UploadResult};

// Severity class shared by progress bars and result cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressClass {
    Normal,
    Success,
    Warning,
    Danger,
}

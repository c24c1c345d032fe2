// Use cases layer: session handling, sign-in flows and the resource pages.

pub mod auth;
pub mod budgets;
pub mod controller;
pub mod goals;
pub mod insights;
pub mod session_store;
pub mod transactions;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::AuthService;
pub use budgets::{BudgetController, BudgetForm};
pub use controller::{CrudController, LoadFailurePolicy, Notice};
pub use goals::GoalController;
pub use insights::{InsightController, InsightQuestion};
pub use session_store::SessionStore;
pub use transactions::{TransactionController, TransactionFilter};
pub use upload::UploadController;

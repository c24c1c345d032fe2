use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    // Positive amounts are income, negative amounts are expenses.
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_type: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionTotals {
    pub count: usize,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

impl TransactionTotals {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals = Self {
            count: 0,
            income: 0.0,
            expenses: 0.0,
            net: 0.0,
        };
        for transaction in transactions {
            totals.count += 1;
            if transaction.is_income() {
                totals.income += transaction.amount;
            } else if transaction.is_expense() {
                totals.expenses += transaction.amount.abs();
            }
            totals.net += transaction.amount;
        }
        totals
    }
}

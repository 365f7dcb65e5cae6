use serde::{Deserialize, Serialize};

use crate::domain::{Category, Cents, TransactionType};

/// Income vs expense overview of the whole ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub transaction_count: usize,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub total: Cents,
    pub count: usize,
}

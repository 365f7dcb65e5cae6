use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Amount;

pub type TransactionId = u64;

/// Date format used for input and export.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, adds to the balance
    #[default]
    Income,
    /// Money going out, subtracts from the balance
    Expense,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The fixed set of categories a transaction can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Groceries,
    Bills,
    Salary,
    Entertainment,
    Health,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Groceries,
        Category::Bills,
        Category::Salary,
        Category::Entertainment,
        Category::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Bills => "Bills",
            Category::Salary => "Salary",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
        }
    }

    /// Case-insensitive lookup.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded income or expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Calendar date, exported as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Magnitude only; the sign comes from `kind`
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        date: NaiveDate,
        amount: Amount,
        kind: TransactionType,
        category: Category,
    ) -> Self {
        Self {
            id,
            date,
            amount,
            kind,
            category,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Amount with the sign applied: positive for income, negative for expense.
    pub fn signed_cents(&self) -> super::Cents {
        if self.is_income() {
            self.amount.cents()
        } else {
            -self.amount.cents()
        }
    }
}

/// Rows a fresh session starts with.
pub fn sample_transactions() -> Vec<Transaction> {
    let date = |month, day| NaiveDate::from_ymd_opt(2023, month, day).expect("valid sample date");
    vec![
        Transaction::new(
            1,
            date(1, 1),
            Amount::from_units(500),
            TransactionType::Income,
            Category::Salary,
        ),
        Transaction::new(
            2,
            date(1, 5),
            Amount::from_units(50),
            TransactionType::Expense,
            Category::Groceries,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_roundtrip() {
        for kind in TransactionType::ALL {
            assert_eq!(TransactionType::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionType::from_str("Expense"), Some(TransactionType::Expense));
        assert_eq!(TransactionType::from_str("refund"), None);
    }

    #[test]
    fn test_category_lookup_ignores_case() {
        assert_eq!(Category::from_str("bills"), Some(Category::Bills));
        assert_eq!(Category::from_str("HEALTH"), Some(Category::Health));
        assert_eq!(Category::from_str("Rent"), None);
    }

    #[test]
    fn test_defaults_match_blank_form() {
        assert_eq!(TransactionType::default(), TransactionType::Income);
        assert_eq!(Category::default(), Category::Groceries);
    }

    #[test]
    fn test_signed_cents() {
        let samples = sample_transactions();
        assert_eq!(samples[0].signed_cents(), 50000);
        assert_eq!(samples[1].signed_cents(), -5000);
        assert!(samples[0].is_income() && !samples[0].is_expense());
        assert!(samples[1].is_expense() && !samples[1].is_income());
    }

    #[test]
    fn test_serialized_shape() {
        let samples = sample_transactions();
        let json = serde_json::to_value(&samples[1]).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 2,
                "date": "2023-01-05",
                "amount": 50,
                "type": "expense",
                "category": "Groceries",
            })
        );
    }
}

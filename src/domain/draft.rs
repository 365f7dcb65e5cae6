use chrono::NaiveDate;
use thiserror::Error;

use super::{Amount, Category, DATE_FORMAT, ParseCentsError, Transaction, TransactionId, TransactionType};

/// One input surface of the transaction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Date,
    Amount,
    Type,
    Category,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Date => "date",
            DraftField::Amount => "amount",
            DraftField::Type => "type",
            DraftField::Category => "category",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Some(DraftField::Date),
            "amount" => Some(DraftField::Amount),
            "type" => Some(DraftField::Type),
            "category" => Some(DraftField::Category),
            _ => None,
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Missing required field: {0}")]
    MissingField(DraftField),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount {
        value: String,
        reason: ParseCentsError,
    },

    #[error("Invalid type '{0}', expected income or expense")]
    InvalidType(String),

    #[error("Unknown category '{0}'")]
    InvalidCategory(String),
}

/// Whether the form is creating a new row or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftState {
    #[default]
    Idle,
    Editing(TransactionId),
}

/// The in-progress form input, held as text exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub date: String,
    pub amount: String,
    pub kind: String,
    pub category: String,
    state: DraftState,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            date: String::new(),
            amount: String::new(),
            kind: TransactionType::default().as_str().to_string(),
            category: Category::default().as_str().to_string(),
            state: DraftState::Idle,
        }
    }
}

/// Validated field values, ready to be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFields {
    pub date: NaiveDate,
    pub amount: Amount,
    pub kind: TransactionType,
    pub category: Category,
}

/// Validated changes for an existing transaction. `None` leaves the stored value as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub amount: Option<Amount>,
    pub kind: Option<TransactionType>,
    pub category: Option<Category>,
}

impl TransactionPatch {
    /// Apply each present field to `transaction`. The id is never touched.
    pub fn apply(&self, transaction: &mut Transaction) {
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(kind) = self.kind {
            transaction.kind = kind;
        }
        if let Some(category) = self.category {
            transaction.category = category;
        }
    }
}

impl Draft {
    /// A draft pre-filled from `transaction`, in edit mode.
    pub fn editing(transaction: &Transaction) -> Self {
        Self {
            date: transaction.date.format(DATE_FORMAT).to_string(),
            amount: transaction.amount.to_string(),
            kind: transaction.kind.as_str().to_string(),
            category: transaction.category.as_str().to_string(),
            state: DraftState::Editing(transaction.id),
        }
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    pub fn editing_id(&self) -> Option<TransactionId> {
        match self.state {
            DraftState::Idle => None,
            DraftState::Editing(id) => Some(id),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id().is_some()
    }

    /// Store `value` verbatim; nothing is checked until the draft is submitted.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Date => self.date = value,
            DraftField::Amount => self.amount = value,
            DraftField::Type => self.kind = value,
            DraftField::Category => self.category = value,
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Date => &self.date,
            DraftField::Amount => &self.amount,
            DraftField::Type => &self.kind,
            DraftField::Category => &self.category,
        }
    }

    /// Validate every field for a new transaction. Date and amount are required;
    /// blank type and category fall back to their defaults.
    pub fn to_fields(&self) -> Result<TransactionFields, DraftError> {
        if self.date.trim().is_empty() {
            return Err(DraftError::MissingField(DraftField::Date));
        }
        if self.amount.trim().is_empty() {
            return Err(DraftError::MissingField(DraftField::Amount));
        }

        let patch = self.to_patch()?;
        Ok(TransactionFields {
            date: patch.date.ok_or(DraftError::MissingField(DraftField::Date))?,
            amount: patch
                .amount
                .ok_or(DraftError::MissingField(DraftField::Amount))?,
            kind: patch.kind.unwrap_or_default(),
            category: patch.category.unwrap_or_default(),
        })
    }

    /// Validate the non-blank fields as a partial update.
    pub fn to_patch(&self) -> Result<TransactionPatch, DraftError> {
        Ok(TransactionPatch {
            date: non_blank(&self.date).map(parse_date).transpose()?,
            amount: non_blank(&self.amount).map(parse_amount).transpose()?,
            kind: non_blank(&self.kind).map(parse_type).transpose()?,
            category: non_blank(&self.category).map(parse_category).transpose()?,
        })
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn parse_date(value: &str) -> Result<NaiveDate, DraftError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| DraftError::InvalidDate(value.to_string()))
}

fn parse_amount(value: &str) -> Result<Amount, DraftError> {
    Amount::parse(value).map_err(|reason| DraftError::InvalidAmount {
        value: value.to_string(),
        reason,
    })
}

fn parse_type(value: &str) -> Result<TransactionType, DraftError> {
    TransactionType::from_str(value).ok_or_else(|| DraftError::InvalidType(value.to_string()))
}

fn parse_category(value: &str) -> Result<Category, DraftError> {
    Category::from_str(value).ok_or_else(|| DraftError::InvalidCategory(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(date: &str, amount: &str) -> Draft {
        let mut draft = Draft::default();
        draft.set(DraftField::Date, date);
        draft.set(DraftField::Amount, amount);
        draft
    }

    #[test]
    fn test_default_draft_is_blank_income_groceries() {
        let draft = Draft::default();
        assert_eq!(draft.date, "");
        assert_eq!(draft.amount, "");
        assert_eq!(draft.kind, "income");
        assert_eq!(draft.category, "Groceries");
        assert_eq!(draft.state(), DraftState::Idle);
    }

    #[test]
    fn test_set_stores_text_verbatim() {
        let mut draft = Draft::default();
        draft.set(DraftField::Amount, "not a number");
        assert_eq!(draft.get(DraftField::Amount), "not a number");
    }

    #[test]
    fn test_to_fields_requires_date_and_amount() {
        assert_eq!(
            filled("", "10").to_fields(),
            Err(DraftError::MissingField(DraftField::Date))
        );
        assert_eq!(
            filled("2024-03-01", "  ").to_fields(),
            Err(DraftError::MissingField(DraftField::Amount))
        );
    }

    #[test]
    fn test_to_fields_defaults_blank_type_and_category() {
        let mut draft = filled("2024-03-01", "12.50");
        draft.set(DraftField::Type, "");
        draft.set(DraftField::Category, "");

        let fields = draft.to_fields().unwrap();
        assert_eq!(fields.kind, TransactionType::Income);
        assert_eq!(fields.category, Category::Groceries);
        assert_eq!(fields.amount.cents(), 1250);
    }

    #[test]
    fn test_to_fields_rejects_malformed_values() {
        assert!(matches!(
            filled("03/01/2024", "10").to_fields(),
            Err(DraftError::InvalidDate(_))
        ));
        assert!(matches!(
            filled("2024-03-01", "ten").to_fields(),
            Err(DraftError::InvalidAmount { .. })
        ));
        assert!(matches!(
            filled("2024-03-01", "-10").to_fields(),
            Err(DraftError::InvalidAmount { .. })
        ));

        let mut draft = filled("2024-03-01", "10");
        draft.set(DraftField::Category, "Rent");
        assert_eq!(
            draft.to_fields(),
            Err(DraftError::InvalidCategory("Rent".into()))
        );
    }

    #[test]
    fn test_patch_skips_blank_fields() {
        let mut draft = Draft::default();
        draft.set(DraftField::Amount, "75");

        let patch = draft.to_patch().unwrap();
        assert_eq!(patch.date, None);
        assert_eq!(patch.amount.map(|a| a.cents()), Some(7500));
        assert_eq!(patch.kind, Some(TransactionType::Income));
    }

    #[test]
    fn test_editing_copies_transaction() {
        let transaction = crate::domain::sample_transactions().remove(1);
        let draft = Draft::editing(&transaction);

        assert_eq!(draft.date, "2023-01-05");
        assert_eq!(draft.amount, "50.00");
        assert_eq!(draft.kind, "expense");
        assert_eq!(draft.category, "Groceries");
        assert_eq!(draft.editing_id(), Some(2));
        assert_eq!(draft.to_fields().unwrap().amount, transaction.amount);
    }

    #[test]
    fn test_patch_apply_keeps_id() {
        let mut transaction = crate::domain::sample_transactions().remove(0);
        let patch = TransactionPatch {
            category: Some(Category::Bills),
            ..Default::default()
        };

        patch.apply(&mut transaction);
        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.category, Category::Bills);
        assert_eq!(transaction.kind, TransactionType::Income);
    }
}

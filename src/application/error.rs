use thiserror::Error;

use crate::domain::{DraftError, DraftField, TransactionId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(#[from] DraftError),

    #[error("No transaction is being edited")]
    NotEditing,

    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    #[error("Duplicate transaction id: {0}")]
    DuplicateId(TransactionId),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LedgerError {
    /// True when a required form field was left empty.
    pub fn is_missing_field(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(DraftError::MissingField(
                DraftField::Date | DraftField::Amount
            ))
        )
    }
}

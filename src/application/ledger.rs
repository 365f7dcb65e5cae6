use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::domain::{
    category_totals, compute_balance, sample_transactions, total_for_type, Cents, Draft,
    DraftField, Transaction, TransactionId, TransactionType,
};

use super::{CategorySummary, LedgerError, Summary};

/// In-memory transaction ledger plus the form draft that feeds it.
///
/// Transactions keep insertion order. Ids come from a counter that only moves
/// forward, so a deleted id is never handed out again.
#[derive(Debug, Clone)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    draft: Draft,
    next_id: TransactionId,
}

/// What `submit` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Added(Transaction),
    Updated(Transaction),
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            draft: Draft::default(),
            next_id: 1,
        }
    }

    /// Create a ledger holding the sample rows.
    pub fn with_samples() -> Self {
        let transactions = sample_transactions();
        let next_id = next_id_after(&transactions);
        Self {
            transactions,
            draft: Draft::default(),
            next_id,
        }
    }

    /// Create a ledger from existing transactions, rejecting duplicate ids.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Result<Self, LedgerError> {
        let mut seen = HashSet::new();
        for transaction in &transactions {
            if !seen.insert(transaction.id) {
                return Err(LedgerError::DuplicateId(transaction.id));
            }
        }

        let next_id = next_id_after(&transactions);
        Ok(Self {
            transactions,
            draft: Draft::default(),
            next_id,
        })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn editing_id(&self) -> Option<TransactionId> {
        self.draft.editing_id()
    }

    /// Merge a raw form value into the draft.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Validate the draft and append it as a new transaction.
    pub fn add_transaction(&mut self) -> Result<Transaction, LedgerError> {
        let fields = self.draft.to_fields().inspect_err(|e| {
            warn!(error = %e, "Rejected new transaction");
        })?;

        let transaction = Transaction::new(
            self.next_id,
            fields.date,
            fields.amount,
            fields.kind,
            fields.category,
        );
        self.next_id += 1;
        self.transactions.push(transaction.clone());
        self.draft = Draft::default();

        info!(
            id = transaction.id,
            amount = %transaction.amount,
            kind = %transaction.kind,
            "Added transaction"
        );
        Ok(transaction)
    }

    /// Load an existing transaction into the draft for editing.
    pub fn begin_edit(&mut self, id: TransactionId) -> Result<&Draft, LedgerError> {
        let transaction = self.get(id).ok_or(LedgerError::NotFound(id))?;
        self.draft = Draft::editing(transaction);

        debug!(id, "Editing transaction");
        Ok(&self.draft)
    }

    /// Apply the draft to the transaction being edited.
    ///
    /// Blank date or amount fields keep the stored values. If the edited
    /// transaction has been deleted in the meantime nothing changes and
    /// `NotFound` is returned.
    pub fn update_transaction(&mut self) -> Result<Transaction, LedgerError> {
        let id = self.draft.editing_id().ok_or(LedgerError::NotEditing)?;
        let patch = self.draft.to_patch().inspect_err(|e| {
            warn!(id, error = %e, "Rejected transaction update");
        })?;

        let Some(transaction) = self.transactions.iter_mut().find(|t| t.id == id) else {
            warn!(id, "Edited transaction no longer exists");
            return Err(LedgerError::NotFound(id));
        };

        patch.apply(transaction);
        let updated = transaction.clone();
        self.draft = Draft::default();

        info!(id, "Updated transaction");
        Ok(updated)
    }

    /// Update when editing, add otherwise.
    pub fn submit(&mut self) -> Result<Submitted, LedgerError> {
        if self.draft.is_editing() {
            self.update_transaction().map(Submitted::Updated)
        } else {
            self.add_transaction().map(Submitted::Added)
        }
    }

    /// Discard the draft and leave edit mode.
    pub fn cancel_edit(&mut self) {
        if let Some(id) = self.draft.editing_id() {
            debug!(id, "Cancelled edit");
        }
        self.draft = Draft::default();
    }

    /// Remove a transaction. Unknown ids are ignored.
    /// Returns the removed transaction, if there was one.
    pub fn delete_transaction(&mut self, id: TransactionId) -> Option<Transaction> {
        let position = self.transactions.iter().position(|t| t.id == id);
        let removed = position.map(|index| self.transactions.remove(index));

        match &removed {
            Some(_) => info!(id, "Deleted transaction"),
            None => debug!(id, "Delete ignored, no such transaction"),
        }
        removed
    }

    pub fn calculate_balance(&self) -> Cents {
        compute_balance(&self.transactions)
    }

    pub fn summary(&self) -> Summary {
        let total_income = total_for_type(TransactionType::Income, &self.transactions);
        let total_expense = total_for_type(TransactionType::Expense, &self.transactions);

        let categories = category_totals(&self.transactions)
            .into_iter()
            .map(|(category, kind, total, count)| CategorySummary {
                category,
                kind,
                total,
                count,
            })
            .collect();

        Summary {
            transaction_count: self.transactions.len(),
            total_income,
            total_expense,
            balance: total_income.saturating_sub(total_expense),
            categories,
        }
    }

    /// The full collection as compact UTF-8 JSON.
    pub fn export_transactions(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(serde_json::to_vec(&self.transactions)?)
    }
}

fn next_id_after(transactions: &[Transaction]) -> TransactionId {
    transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

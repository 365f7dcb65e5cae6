use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{format_cents, Cents, Draft, DraftField, Transaction, TransactionId};

use super::{
    DEFAULT_AUTO_DISMISS, Ledger, LedgerError, Notification, Notifier, Severity, Submitted,
    Summary,
};

/// Options a session is started with.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Start with the sample rows instead of an empty ledger
    pub seed_samples: bool,
    /// How long notifications stay visible
    pub auto_dismiss: Duration,
    /// Where exported files are written
    pub export_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed_samples: true,
            auto_dismiss: DEFAULT_AUTO_DISMISS,
            export_dir: PathBuf::from("."),
        }
    }
}

/// Entry point for any front end: owns the ledger and reports every outcome
/// through the notifier.
pub struct Session<N: Notifier> {
    ledger: Ledger,
    notifier: N,
    config: SessionConfig,
}

impl<N: Notifier> Session<N> {
    pub fn new(config: SessionConfig, notifier: N) -> Self {
        let ledger = if config.seed_samples {
            Ledger::with_samples()
        } else {
            Ledger::new()
        };
        Self::with_ledger(ledger, config, notifier)
    }

    pub fn with_ledger(ledger: Ledger, config: SessionConfig, notifier: N) -> Self {
        Self {
            ledger,
            notifier,
            config,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    pub fn draft(&self) -> &Draft {
        self.ledger.draft()
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.ledger.set_field(field, value);
    }

    pub fn add_transaction(&mut self) -> Result<Transaction, LedgerError> {
        let result = self.ledger.add_transaction();
        self.report(&result, |_| "Transaction added".to_string());
        result
    }

    pub fn begin_edit(&mut self, id: TransactionId) -> Result<(), LedgerError> {
        let result = self.ledger.begin_edit(id).map(|_| ());
        match &result {
            Ok(()) => self.emit(Notification::new(
                "Editing",
                format!("Editing transaction {}", id),
                Severity::Info,
            )),
            Err(e) => self.emit(error_notification(e)),
        }
        result
    }

    pub fn update_transaction(&mut self) -> Result<Transaction, LedgerError> {
        let result = self.ledger.update_transaction();
        self.report(&result, |_| "Transaction updated".to_string());
        result
    }

    /// Add or update depending on whether a transaction is being edited.
    pub fn submit(&mut self) -> Result<Submitted, LedgerError> {
        let result = self.ledger.submit();
        self.report(&result, |submitted| match submitted {
            Submitted::Added(_) => "Transaction added".to_string(),
            Submitted::Updated(_) => "Transaction updated".to_string(),
        });
        result
    }

    pub fn cancel_edit(&mut self) {
        self.ledger.cancel_edit();
    }

    /// Always reported as a success, whether or not the id existed.
    pub fn delete_transaction(&mut self, id: TransactionId) -> Option<Transaction> {
        let removed = self.ledger.delete_transaction(id);
        self.emit(Notification::success("Transaction deleted"));
        removed
    }

    pub fn calculate_balance(&self) -> Cents {
        self.ledger.calculate_balance()
    }

    pub fn summary(&self) -> Summary {
        self.ledger.summary()
    }

    /// Serialize the ledger for export and report the result.
    pub fn export_transactions(&mut self) -> Result<Vec<u8>, LedgerError> {
        let count = self.ledger.len();
        let result = self.ledger.export_transactions();
        self.report(&result, |_| format!("Exported {} transactions", count));
        result
    }

    /// Report an outcome that happened outside the ledger, such as a file write.
    pub fn notify(&mut self, notification: Notification) {
        self.emit(notification);
    }

    /// Formatted balance line for display.
    pub fn balance_label(&self) -> String {
        format!("Total Balance: {}", format_cents(self.calculate_balance()))
    }

    fn report<T>(&mut self, result: &Result<T, LedgerError>, message: impl FnOnce(&T) -> String) {
        let notification = match result {
            Ok(value) => Notification::success(message(value)),
            Err(e) => error_notification(e),
        };
        self.emit(notification);
    }

    fn emit(&mut self, notification: Notification) {
        let notification = notification.with_auto_dismiss(self.config.auto_dismiss);
        self.notifier.notify(notification);
    }
}

fn error_notification(error: &LedgerError) -> Notification {
    if error.is_missing_field() {
        Notification::error("Please fill in all fields")
    } else {
        Notification::error(error.to_string())
    }
}

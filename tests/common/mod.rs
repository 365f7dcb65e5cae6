// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use pocketbook::application::{Ledger, LedgerError, Notification, Session, SessionConfig};
use pocketbook::domain::{DraftField, Transaction};

/// A seeded session that records its notifications.
pub fn test_session() -> Session<Vec<Notification>> {
    Session::new(SessionConfig::default(), Vec::new())
}

/// An unseeded session that records its notifications.
pub fn empty_session() -> Session<Vec<Notification>> {
    let config = SessionConfig {
        seed_samples: false,
        ..Default::default()
    };
    Session::new(config, Vec::new())
}

/// Fill every form field and add the transaction.
pub fn add(
    ledger: &mut Ledger,
    date: &str,
    amount: &str,
    kind: &str,
    category: &str,
) -> Result<Transaction, LedgerError> {
    ledger.set_field(DraftField::Date, date);
    ledger.set_field(DraftField::Amount, amount);
    ledger.set_field(DraftField::Type, kind);
    ledger.set_field(DraftField::Category, category);
    ledger.add_transaction()
}

/// Same as `add`, through a session.
pub fn add_via_session(
    session: &mut Session<Vec<Notification>>,
    date: &str,
    amount: &str,
    kind: &str,
    category: &str,
) -> Result<Transaction, LedgerError> {
    session.set_field(DraftField::Date, date);
    session.set_field(DraftField::Amount, amount);
    session.set_field(DraftField::Type, kind);
    session.set_field(DraftField::Category, category);
    session.add_transaction()
}

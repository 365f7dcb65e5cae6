mod common;

use anyhow::Result;
use common::{add_via_session, empty_session, test_session};
use pocketbook::application::{LedgerError, Severity, Submitted};
use pocketbook::domain::DraftField;
use pocketbook::io::{ExportFormat, Exporter};
use tempfile::TempDir;

#[test]
fn test_add_success_notifies() -> Result<()> {
    let mut session = empty_session();

    add_via_session(&mut session, "2024-01-10", "200", "income", "Salary")?;

    let notes = session.notifier();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Success");
    assert_eq!(notes[0].message, "Transaction added");
    assert_eq!(notes[0].severity, Severity::Success);
    Ok(())
}

#[test]
fn test_every_operation_reports_once() -> Result<()> {
    let mut session = test_session();

    add_via_session(&mut session, "2024-01-10", "10", "expense", "Bills")?;
    session.begin_edit(3)?;
    session.set_field(DraftField::Amount, "11");
    session.update_transaction()?;
    session.delete_transaction(3);
    session.delete_transaction(3);
    let _ = session.update_transaction();
    let _ = session.begin_edit(3);

    let messages: Vec<(&str, &str)> = session
        .notifier()
        .iter()
        .map(|n| (n.title.as_str(), n.message.as_str()))
        .collect();

    assert_eq!(
        messages,
        vec![
            ("Success", "Transaction added"),
            ("Editing", "Editing transaction 3"),
            ("Success", "Transaction updated"),
            ("Success", "Transaction deleted"),
            ("Success", "Transaction deleted"),
            ("Error", "No transaction is being edited"),
            ("Error", "Transaction not found: 3"),
        ]
    );
    Ok(())
}

#[test]
fn test_validation_error_is_reported_not_fatal() -> Result<()> {
    let mut session = test_session();

    let result = add_via_session(&mut session, "yesterday", "10", "income", "Salary");
    assert!(matches!(result, Err(LedgerError::Validation(_))));
    assert_eq!(session.transactions().len(), 2);

    let note = &session.notifier()[0];
    assert!(note.is_error());
    assert_eq!(note.message, "Invalid date 'yesterday', expected YYYY-MM-DD");

    // The same session keeps working afterwards
    session.set_field(DraftField::Date, "2024-01-01");
    session.add_transaction()?;
    assert_eq!(session.transactions().len(), 3);
    Ok(())
}

#[test]
fn test_submit_follows_draft_state() -> Result<()> {
    let mut session = test_session();

    session.set_field(DraftField::Date, "2024-08-08");
    session.set_field(DraftField::Amount, "8");
    assert!(matches!(session.submit()?, Submitted::Added(_)));

    session.begin_edit(1)?;
    session.set_field(DraftField::Date, "2023-02-01");
    assert!(matches!(session.submit()?, Submitted::Updated(_)));

    assert_eq!(session.transactions()[0].date.to_string(), "2023-02-01");
    assert_eq!(session.transactions().len(), 3);
    Ok(())
}

#[test]
fn test_balance_label() {
    let session = test_session();
    assert_eq!(session.balance_label(), "Total Balance: 450.00");
}

#[test]
fn test_summary_totals() -> Result<()> {
    let mut session = test_session();
    add_via_session(&mut session, "2024-01-10", "25", "expense", "Groceries")?;

    let summary = session.summary();

    assert_eq!(summary.transaction_count, 3);
    assert_eq!(summary.total_income, 50000);
    assert_eq!(summary.total_expense, 7500);
    assert_eq!(summary.balance, 42500);
    assert_eq!(summary.categories.len(), 2);
    assert_eq!(summary.categories[1].count, 2);
    assert_eq!(summary.categories[1].total, 7500);
    Ok(())
}

#[test]
fn test_session_export_notifies() -> Result<()> {
    let mut session = test_session();

    let bytes = session.export_transactions()?;

    assert_eq!(bytes, session.ledger().export_transactions()?);
    assert_eq!(session.notifier()[0].message, "Exported 2 transactions");
    Ok(())
}

#[tokio::test]
async fn test_save_json_to_export_dir() -> Result<()> {
    let temp = TempDir::new()?;
    let session = test_session();

    let path = Exporter::new(session.ledger())
        .save(ExportFormat::Json, temp.path(), None)
        .await?;

    assert_eq!(path, temp.path().join("transactions.json"));
    let written = std::fs::read(&path)?;
    assert_eq!(written, session.ledger().export_transactions()?);
    Ok(())
}

#[tokio::test]
async fn test_save_csv_to_explicit_path() -> Result<()> {
    let temp = TempDir::new()?;
    let target = temp.path().join("out.csv");
    let session = test_session();

    let path = Exporter::new(session.ledger())
        .save(ExportFormat::Csv, temp.path(), Some(&target))
        .await?;

    assert_eq!(path, target);
    let written = std::fs::read_to_string(&path)?;
    assert_eq!(written.lines().count(), 3);
    assert!(written.starts_with("id,date,amount,type,category"));
    Ok(())
}

#[tokio::test]
async fn test_save_to_missing_dir_fails() -> Result<()> {
    let temp = TempDir::new()?;
    let session = test_session();

    let result = Exporter::new(session.ledger())
        .save(ExportFormat::Json, &temp.path().join("missing"), None)
        .await;

    assert!(result.is_err());
    Ok(())
}

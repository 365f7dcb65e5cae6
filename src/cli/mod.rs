use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::application::{Notification, Notifier, Session, SessionConfig};
use crate::domain::{format_cents, Category, DraftField, DraftState, TransactionId, TransactionType};
use crate::io::{ExportFormat, Exporter};

/// Pocketbook - income and expense tracker
#[derive(Parser)]
#[command(name = "pocketbook")]
#[command(about = "Record income and expenses, watch the balance, export to JSON")]
#[command(version)]
pub struct Cli {
    /// Start with an empty ledger instead of the sample rows
    #[arg(long)]
    pub empty: bool,

    /// Directory exports are written to
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// How long notifications stay visible, in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub notify_ms: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// One line typed into the session.
#[derive(Parser)]
#[command(name = "pocketbook", no_binary_name = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Set a form field: date, amount, type or category (omit the value to clear it)
    Set {
        field: String,
        value: Option<String>,
    },

    /// Show the form as currently filled in
    Draft,

    /// Add the form as a new transaction
    Add,

    /// Load a transaction into the form for editing
    Edit { id: TransactionId },

    /// Save the form over the transaction being edited
    Update,

    /// Add or update, whichever the form is in the middle of
    Submit,

    /// Clear the form and stop editing
    Cancel,

    /// Delete a transaction
    Delete { id: TransactionId },

    /// Show all transactions
    #[command(alias = "ls")]
    List,

    /// Show the total balance
    Balance,

    /// Income vs expense breakdown by category
    Summary {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export all transactions
    Export {
        /// Format: json, csv
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file ("-" for stdout, defaults to transactions.<format> in the export dir)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

/// Prints notifications to the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        tracing::debug!(
            severity = %notification.severity,
            auto_dismiss_ms = notification.auto_dismiss.as_millis() as u64,
            "Notification"
        );
        let line = format!(
            "[{}] {}: {}",
            notification.severity, notification.title, notification.message
        );
        if notification.is_error() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

impl Cli {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            seed_samples: !self.empty,
            auto_dismiss: Duration::from_millis(self.notify_ms),
            export_dir: self.export_dir.clone(),
        }
    }

    /// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
    pub fn init_tracing(&self) {
        let default_level = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    pub async fn run(self) -> Result<()> {
        let mut session = Session::new(self.session_config(), ConsoleNotifier);
        let interactive = std::io::stdin().is_terminal();

        if interactive {
            println!("Pocketbook. Type 'help' for commands.");
            print_transactions(&session);
            prompt()?;
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("Failed to read input")? {
            let words: Vec<&str> = line.split_whitespace().collect();
            if !words.is_empty() {
                match SessionLine::try_parse_from(words) {
                    Ok(parsed) => {
                        if let Flow::Quit = run_session_command(&mut session, parsed.command).await? {
                            break;
                        }
                    }
                    // Covers help output as well as usage errors
                    Err(e) => e.print().context("Failed to print usage")?,
                }
            }

            if interactive {
                prompt()?;
            }
        }

        Ok(())
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush stdout")
}

async fn run_session_command<N: Notifier>(
    session: &mut Session<N>,
    command: SessionCommand,
) -> Result<Flow> {
    match command {
        SessionCommand::Set { field, value } => match DraftField::from_str(&field) {
            Some(field) => session.set_field(field, value.unwrap_or_default()),
            None => session.notify(Notification::error(format!(
                "Unknown field '{}'. Valid fields: date, amount, type, category",
                field
            ))),
        },

        SessionCommand::Draft => print_draft(session),

        SessionCommand::Add => {
            if session.add_transaction().is_ok() {
                print_transactions(session);
            }
        }

        SessionCommand::Edit { id } => {
            if session.begin_edit(id).is_ok() {
                print_draft(session);
            }
        }

        SessionCommand::Update => {
            if session.update_transaction().is_ok() {
                print_transactions(session);
            }
        }

        SessionCommand::Submit => {
            if session.submit().is_ok() {
                print_transactions(session);
            }
        }

        SessionCommand::Cancel => {
            session.cancel_edit();
            print_draft(session);
        }

        SessionCommand::Delete { id } => {
            session.delete_transaction(id);
            print_transactions(session);
        }

        SessionCommand::List => print_transactions(session),

        SessionCommand::Balance => println!("{}", session.balance_label()),

        SessionCommand::Summary { json } => {
            let summary = session.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Income vs Expense");
                println!();
                println!("Total Income:   {:>15}", format_cents(summary.total_income));
                println!("Total Expense:  {:>15}", format_cents(summary.total_expense));
                println!("{}", "-".repeat(32));
                println!("Balance:        {:>15}", format_cents(summary.balance));

                if !summary.categories.is_empty() {
                    println!();
                    println!("{:<15} {:<8} {:>12} {:>6}", "CATEGORY", "TYPE", "TOTAL", "COUNT");
                    println!("{}", "-".repeat(44));
                    for entry in &summary.categories {
                        println!(
                            "{:<15} {:<8} {:>12} {:>6}",
                            entry.category,
                            entry.kind,
                            format_cents(entry.total),
                            entry.count
                        );
                    }
                }
            }
        }

        SessionCommand::Export { format, output } => {
            run_export_command(session, &format, output.as_deref()).await?;
        }

        SessionCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

async fn run_export_command<N: Notifier>(
    session: &mut Session<N>,
    format: &str,
    output: Option<&str>,
) -> Result<()> {
    let Some(format) = ExportFormat::from_str(format) else {
        session.notify(Notification::error(format!(
            "Unknown export format '{}'. Valid formats: json, csv",
            format
        )));
        return Ok(());
    };

    if output == Some("-") {
        export_to_writer(session, format, &mut std::io::stdout().lock());
        return Ok(());
    }

    let export_dir = session.config().export_dir.clone();
    let count = session.ledger().len();
    let saved = Exporter::new(session.ledger())
        .save(format, &export_dir, output.map(Path::new))
        .await;

    match saved {
        Ok(path) => session.notify(Notification::success(format!(
            "Exported {} transactions to {}",
            count,
            path.display()
        ))),
        Err(e) => session.notify(Notification::error(format!("Export failed: {:#}", e))),
    }
    Ok(())
}

/// Write an export to `out`. Failures are reported, never returned, so the
/// session loop keeps running.
fn export_to_writer<N: Notifier, W: Write>(session: &mut Session<N>, format: ExportFormat, out: &mut W) {
    let bytes = match format {
        ExportFormat::Json => match session.export_transactions() {
            Ok(bytes) => bytes,
            // Already reported by the session
            Err(_) => return,
        },
        ExportFormat::Csv => match Exporter::new(session.ledger()).render(format) {
            Ok(bytes) => bytes,
            Err(e) => {
                session.notify(Notification::error(format!("Export failed: {:#}", e)));
                return;
            }
        },
    };

    let written = out
        .write_all(&bytes)
        .and_then(|()| writeln!(out))
        .and_then(|()| out.flush());
    if let Err(e) = written {
        session.notify(Notification::error(format!("Export failed: {}", e)));
    }
}

fn print_transactions<N: Notifier>(session: &Session<N>) {
    let transactions = session.transactions();
    if transactions.is_empty() {
        println!("No transactions.");
    } else {
        println!(
            "{:<6} {:<12} {:>12} {:<8} {:<15}",
            "ID", "DATE", "AMOUNT", "TYPE", "CATEGORY"
        );
        println!("{}", "-".repeat(57));
        for t in transactions {
            println!(
                "{:<6} {:<12} {:>12} {:<8} {:<15}",
                t.id,
                t.date,
                format_cents(t.amount.cents()),
                t.kind,
                t.category
            );
        }
    }
    println!();
    println!("{}", session.balance_label());
}

fn print_draft<N: Notifier>(session: &Session<N>) {
    let draft = session.draft();
    match draft.state() {
        DraftState::Idle => println!("New transaction"),
        DraftState::Editing(id) => println!("Editing transaction {}", id),
    }
    println!("  Date:      {}", draft.date);
    println!("  Amount:    {}", draft.amount);
    println!(
        "  Type:      {}  ({})",
        draft.kind,
        join_names(TransactionType::ALL.iter().map(|t| t.as_str()))
    );
    println!(
        "  Category:  {}  ({})",
        draft.category,
        join_names(Category::ALL.iter().map(|c| c.as_str()))
    );
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

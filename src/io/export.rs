use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::application::Ledger;
use crate::domain::format_cents;

/// File name used for the JSON export.
pub const JSON_FILE_NAME: &str = "transactions.json";

/// File name used for the CSV export.
pub const CSV_FILE_NAME: &str = "transactions.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => JSON_FILE_NAME,
            ExportFormat::Csv => CSV_FILE_NAME,
        }
    }
}

/// Writes the ledger's transactions out to files or writers.
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Write the exact JSON export bytes. Returns the number of transactions.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let bytes = self.ledger.export_transactions()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(self.ledger.len())
    }

    /// Write transactions as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "amount", "type", "category"])?;

        let mut count = 0;
        for transaction in self.ledger.transactions() {
            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.date.to_string(),
                format_cents(transaction.amount.cents()),
                transaction.kind.as_str().to_string(),
                transaction.category.as_str().to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Render the export into memory.
    pub fn render(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        match format {
            ExportFormat::Json => self.write_json(&mut buffer)?,
            ExportFormat::Csv => self.write_csv(&mut buffer)?,
        };
        Ok(buffer)
    }

    /// Save the export as `path`, or as the format's default file name inside `dir`.
    /// Returns where the file was written.
    pub async fn save(
        &self,
        format: ExportFormat,
        dir: &Path,
        path: Option<&Path>,
    ) -> Result<PathBuf> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => dir.join(format.file_name()),
        };

        let bytes = self.render(format)?;
        tokio::fs::write(&target, bytes)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        tracing::info!(path = %target.display(), format = format.as_str(), "Saved export");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_bytes_match_ledger_export() {
        let ledger = Ledger::with_samples();
        let mut out = Vec::new();

        let count = Exporter::new(&ledger).write_json(&mut out).unwrap();

        assert_eq!(count, 2);
        assert_eq!(out, ledger.export_transactions().unwrap());
    }

    #[test]
    fn test_csv_layout() {
        let ledger = Ledger::with_samples();
        let out = Exporter::new(&ledger).render(ExportFormat::Csv).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,date,amount,type,category\n\
             1,2023-01-01,500.00,income,Salary\n\
             2,2023-01-05,50.00,expense,Groceries\n"
        );
    }

    #[test]
    fn test_format_lookup() {
        assert_eq!(ExportFormat::from_str("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_str("xml"), None);
        assert_eq!(ExportFormat::Json.file_name(), "transactions.json");
    }
}

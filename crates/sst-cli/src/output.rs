//! Output formatting utilities.

use colored::Colorize;
use sst_harness::{Report, TestResult, TestStatus};
use tabled::{settings::Style, Table, Tabled};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Outputs data in the specified format.
pub fn output<T: Tabled + serde::Serialize>(
    data: &[T],
    format: OutputFormat,
) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                info("No results found.");
            } else {
                let table = Table::new(data).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// One report line in table form.
#[derive(Debug, Tabled)]
struct ResultRow {
    #[tabled(rename = "Test Case")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&TestResult> for ResultRow {
    fn from(result: &TestResult) -> Self {
        Self {
            name: result.name.clone(),
            status: colored_status(result.status),
            message: result.message.clone(),
        }
    }
}

/// Colors a status label by severity.
fn colored_status(status: TestStatus) -> String {
    let label = status.as_str();
    match status {
        TestStatus::Ok => label.green().to_string(),
        TestStatus::Warning => label.yellow().to_string(),
        TestStatus::Error => label.red().to_string(),
        TestStatus::Critical => label.red().bold().to_string(),
    }
}

/// Outputs a test report.
pub fn output_report(report: &Report, format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", report.to_json_pretty()?);
        }
        OutputFormat::Table => {
            if report.is_empty() {
                info("No test cases were run.");
                return Ok(());
            }

            let rows: Vec<ResultRow> = report.results().iter().map(ResultRow::from).collect();
            println!("{}", Table::new(rows).with(Style::rounded()));

            let summary = report.summary();
            let line = format!(
                "{} run: {} OK, {} WARNING, {} ERROR, {} CRITICAL",
                summary.total(),
                summary.ok,
                summary.warning,
                summary.error,
                summary.critical
            );
            if report.has_failures() {
                warning(&line);
            } else {
                success(&line);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_row_keeps_name_and_message() {
        colored::control::set_override(false);
        let result = TestResult::new("MetadataHTTPS", "desc", TestStatus::Warning, "not TLS");
        let row = ResultRow::from(&result);

        assert_eq!(row.name, "MetadataHTTPS");
        assert_eq!(row.status, "WARNING");
        assert_eq!(row.message, "not TLS");
    }
}

/*!
 * Reporting functionality for ClipMate
 *
 * Turns the outcome of a copy action into the notice shown to the user and
 * an optional table of copied files, rendered with the tabled library.
 */

use std::fmt;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::{DirectoryExpansionError, FileReadError};

/// Information about a copied file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Label of the file in the document
    pub label: String,
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

/// User-visible outcome of a copy action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Every selected file was copied
    Success {
        /// Number of files copied
        files: usize,
    },
    /// The document was delivered but some entries were skipped
    SuccessWithWarnings {
        /// Number of files copied
        files: usize,
        /// Skipped entries, one human readable line each
        skipped: Vec<String>,
    },
    /// Nothing was delivered
    Failure {
        /// Why the copy failed
        cause: String,
    },
}

impl Notice {
    /// Build the notice for a delivered document
    pub fn delivered(
        files: usize,
        read_errors: &[FileReadError],
        expansion_errors: &[DirectoryExpansionError],
    ) -> Self {
        if read_errors.is_empty() && expansion_errors.is_empty() {
            return Notice::Success { files };
        }

        let skipped = expansion_errors
            .iter()
            .map(ToString::to_string)
            .chain(read_errors.iter().map(ToString::to_string))
            .collect();
        Notice::SuccessWithWarnings { files, skipped }
    }

    /// Whether anything reached the clipboard
    pub fn is_success(&self) -> bool {
        !matches!(self, Notice::Failure { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success { files } => {
                write!(f, "Copied {} file(s) to the clipboard.", files)
            }
            Notice::SuccessWithWarnings { files, skipped } => {
                write!(
                    f,
                    "Copied {} file(s) to the clipboard; skipped {}:",
                    files,
                    skipped.len()
                )?;
                for line in skipped {
                    write!(f, "\n  - {}", line)?;
                }
                Ok(())
            }
            Notice::Failure { cause } => write!(f, "Copy failed: {}", cause),
        }
    }
}

/// Statistics for a copy action
#[derive(Debug, Clone)]
pub struct CopyReport {
    /// Root directory the selection came from
    pub root: String,
    /// Time taken to resolve and read
    pub duration: Duration,
    /// Details for each copied file, in document order
    pub files: Vec<FileReportInfo>,
    /// Size of the document in bytes
    pub document_bytes: usize,
}

impl CopyReport {
    /// Total number of lines across copied files
    pub fn total_lines(&self) -> usize {
        self.files.iter().map(|info| info.lines).sum()
    }

    /// Total number of characters across copied files
    pub fn total_chars(&self) -> usize {
        self.files.iter().map(|info| info.chars).sum()
    }
}

/// Report generator for copy results
pub struct Reporter;

impl Reporter {
    /// Create a new reporter
    pub fn new() -> Self {
        Self
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate the full report: files table followed by the summary
    pub fn generate_report(&self, report: &CopyReport) -> String {
        let files_table = self.create_files_table(report);
        let summary_table = self.create_summary_table(report);

        format!(
            "📋  COPIED FILES\n{}\n\n✅  SUMMARY\n{}",
            files_table, summary_table
        )
    }

    /// Print the report to stderr
    pub fn print_report(&self, report: &CopyReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &CopyReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📂 Root".to_string(),
                value: report.root.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Copied".to_string(),
                value: self.format_number(report.files.len()),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(report.total_lines()),
            },
            SummaryRow {
                key: "📦 Document Size".to_string(),
                value: format_file_size(report.document_bytes as u64),
            },
        ];

        self.style(Table::new(rows))
    }

    fn create_files_table(&self, report: &CopyReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "Label")]
            label: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Chars")]
            chars: String,
        }

        let rows: Vec<FileRow> = report
            .files
            .iter()
            .map(|info| FileRow {
                label: info.label.clone(),
                lines: self.format_number(info.lines),
                chars: self.format_number(info.chars),
            })
            .collect();

        self.style(Table::new(rows))
    }

    fn style(&self, mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

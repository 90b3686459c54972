/*!
 * Content aggregation
 *
 * Reads every resolved file and assembles the annotated clipboard document:
 *
 * ```text
 * **a.txt**
 * hello
 *
 * **b.txt**
 * world
 * ```
 */

use std::fs;
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, trace, warn};

use crate::report::FileReportInfo;
use crate::types::{FileReadError, ResolvedFile};

/// Result of aggregating a resolved file list
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// The combined document
    pub document: String,
    /// Files that were skipped, in list order
    pub errors: Vec<FileReadError>,
    /// Labels of the files included in the document, in order
    pub included: Vec<String>,
    /// Line and character counts per included file, in document order
    pub file_details: Vec<FileReportInfo>,
}

impl Aggregation {
    /// Number of files included in the document
    pub fn files_copied(&self) -> usize {
        self.included.len()
    }
}

/// Reads files and joins them into a single document
pub struct ContentAggregator {
    /// Progress bar
    progress: Arc<ProgressBar>,
}

impl ContentAggregator {
    /// Create a new aggregator reporting to `progress`
    pub fn new(progress: Arc<ProgressBar>) -> Self {
        Self { progress }
    }

    /// Read every file in `files` and build the document.
    ///
    /// A file that cannot be read as UTF-8 text is recorded in
    /// [`Aggregation::errors`] and skipped; the remaining files are still
    /// processed.
    pub fn aggregate(&self, files: &[ResolvedFile]) -> Aggregation {
        self.progress.set_length(files.len() as u64);

        let mut aggregation = Aggregation::default();
        let mut blocks: Vec<String> = Vec::with_capacity(files.len());

        for file in files {
            self.progress.set_message(format!("Reading {}", file.label));
            debug!("Reading {}", file.absolute_path.display());

            match fs::read_to_string(&file.absolute_path) {
                Ok(content) => {
                    trace!("Read {} bytes from {}", content.len(), file.label);
                    aggregation.file_details.push(FileReportInfo {
                        label: file.label.clone(),
                        lines: content.lines().count(),
                        chars: content.chars().count(),
                    });
                    aggregation.included.push(file.label.clone());
                    blocks.push(format_block(&file.label, &content));
                }
                Err(e) => {
                    warn!("Skipping {}: {}", file.absolute_path.display(), e);
                    aggregation.errors.push(FileReadError {
                        label: file.label.clone(),
                        path: file.absolute_path.clone(),
                        cause: e.to_string(),
                    });
                }
            }

            self.progress.inc(1);
        }

        aggregation.document = blocks.join("\n");
        aggregation
    }
}

impl Default for ContentAggregator {
    fn default() -> Self {
        Self::new(Arc::new(ProgressBar::hidden()))
    }
}

/// Format one file block: bold label line, raw content, trailing newline
pub fn format_block(label: &str, content: &str) -> String {
    format!("**{}**\n{}\n", label, content)
}

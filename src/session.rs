/*!
 * Session state
 *
 * A session owns the tree for the currently chosen root directory and the
 * results of the last copy action. Choosing a new root replaces the tree
 * wholesale.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;
use tracing::{error, info};

use crate::aggregator::{Aggregation, ContentAggregator};
use crate::clipboard::ClipboardSink;
use crate::error::{ClipMateError, Result};
use crate::report::{CopyReport, Notice};
use crate::resolver::{Resolution, SelectionResolver};
use crate::tree::TreeBuilder;
use crate::types::{ListingOrder, TreeNode};

/// Everything produced by one copy action
#[derive(Debug, Clone)]
pub struct CopyOutcome {
    /// Notice to show the user
    pub notice: Notice,
    /// Files that were resolved from the selection
    pub resolution: Resolution,
    /// The aggregated document and per-file errors
    pub aggregation: Aggregation,
    /// Statistics for the report
    pub report: CopyReport,
    /// Whether the sink accepted the document
    pub delivered: bool,
}

/// Explicit application state for one chosen root directory
pub struct Session {
    builder: TreeBuilder,
    resolver: SelectionResolver,
    aggregator: ContentAggregator,
    tree: Option<TreeNode>,
    last_resolution: Option<Resolution>,
    last_document: Option<String>,
}

impl Session {
    /// Create an empty session
    pub fn new(order: ListingOrder) -> Self {
        Self::with_progress(order, Arc::new(ProgressBar::hidden()))
    }

    /// Create an empty session that reports aggregation progress
    pub fn with_progress(order: ListingOrder, progress: Arc<ProgressBar>) -> Self {
        Self {
            builder: TreeBuilder::new(order),
            resolver: SelectionResolver::new(order),
            aggregator: ContentAggregator::new(progress),
            tree: None,
            last_resolution: None,
            last_document: None,
        }
    }

    /// Open a directory picked by the user.
    ///
    /// `None` (or an empty path) is a cancelled pick and leaves the session
    /// untouched; returns whether a new tree was built. If the build fails
    /// the previous tree is kept and the error is returned.
    pub fn open(&mut self, directory: Option<&Path>) -> Result<bool> {
        let Some(directory) = directory.filter(|d| !d.as_os_str().is_empty()) else {
            return Ok(false);
        };

        let tree = self.builder.build(directory)?;
        info!(
            "Opened {} ({} entries)",
            tree.absolute_path.display(),
            tree.descendant_count()
        );
        self.tree = Some(tree);
        self.last_resolution = None;
        self.last_document = None;
        Ok(true)
    }

    /// The tree for the current root, if a directory has been opened
    pub fn tree(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    /// Absolute path of the current root
    pub fn root(&self) -> Option<&Path> {
        self.tree.as_ref().map(|t| t.absolute_path.as_path())
    }

    /// Look up the nodes for a list of root-relative paths
    pub fn select<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<&TreeNode>> {
        let tree = self.tree.as_ref().ok_or(ClipMateError::NoDirectory)?;
        paths
            .iter()
            .map(|p| {
                let wanted = self.relative_to_root(p.as_ref());
                tree.find(&wanted).ok_or_else(|| {
                    ClipMateError::SelectionNotFound(p.as_ref().display().to_string())
                })
            })
            .collect()
    }

    /// Resolve a selection against the filesystem
    pub fn resolve<'a, I>(&self, selection: I) -> Resolution
    where
        I: IntoIterator<Item = &'a TreeNode>,
    {
        self.resolver.resolve(selection)
    }

    /// Resolve, aggregate and deliver the selected paths to `sink`.
    ///
    /// Per-file and per-directory failures end up in the notice as warnings.
    /// A sink failure produces a [`Notice::Failure`]; the document is kept
    /// so [`Session::retry_delivery`] can resend it.
    pub fn copy_selection<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        sink: &dyn ClipboardSink,
    ) -> Result<CopyOutcome> {
        let started = Instant::now();
        let resolution = {
            let nodes = self.select(paths)?;
            if nodes.is_empty() {
                return Err(ClipMateError::EmptySelection);
            }
            self.resolver.resolve(nodes)
        };
        let aggregation = self.aggregator.aggregate(&resolution.files);

        let report = CopyReport {
            root: self
                .root()
                .map(|r| r.display().to_string())
                .unwrap_or_default(),
            duration: started.elapsed(),
            files: aggregation.file_details.clone(),
            document_bytes: aggregation.document.len(),
        };
        self.last_resolution = Some(resolution.clone());

        if aggregation.included.is_empty() {
            let cause = if aggregation.errors.is_empty() && resolution.errors.is_empty() {
                "the selection contains no files".to_string()
            } else {
                "none of the selected files could be read".to_string()
            };
            error!("Nothing copied: {}", cause);
            self.last_document = None;
            return Ok(CopyOutcome {
                notice: Notice::Failure { cause },
                resolution,
                aggregation,
                report,
                delivered: false,
            });
        }

        self.last_document = Some(aggregation.document.clone());
        let (notice, delivered) = match sink.write(&aggregation.document) {
            Ok(()) => (
                Notice::delivered(
                    aggregation.files_copied(),
                    &aggregation.errors,
                    &resolution.errors,
                ),
                true,
            ),
            Err(e) => {
                error!("Clipboard delivery failed: {}", e);
                (
                    Notice::Failure {
                        cause: e.to_string(),
                    },
                    false,
                )
            }
        };

        Ok(CopyOutcome {
            notice,
            resolution,
            aggregation,
            report,
            delivered,
        })
    }

    /// Send the last aggregated document to `sink` again
    pub fn retry_delivery(&self, sink: &dyn ClipboardSink) -> Result<()> {
        let document = self.last_document.as_deref().ok_or_else(|| {
            ClipMateError::NothingToDeliver("no document has been aggregated".to_string())
        })?;
        sink.write(document)?;
        Ok(())
    }

    /// Resolution produced by the last copy action
    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    /// Document produced by the last copy action
    pub fn last_document(&self) -> Option<&str> {
        self.last_document.as_deref()
    }

    /// Accept paths either relative to the root or absolute inside it
    fn relative_to_root(&self, path: &Path) -> PathBuf {
        match self.root() {
            Some(root) if path.is_absolute() => path
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.to_path_buf()),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ListingOrder::default())
    }
}

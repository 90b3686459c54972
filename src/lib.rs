/*!
 * ClipMate - copy selected files of a project tree to the clipboard
 *
 * This library builds a tree for a chosen directory, resolves a selection of
 * files and directories into a deduplicated file list, and concatenates the
 * files into one document with a bold `**path**` header per file.
 */

pub mod aggregator;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod logger;
pub mod preferences;
pub mod report;
pub mod resolver;
pub mod session;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use aggregator::{Aggregation, ContentAggregator};
pub use clipboard::{ClipboardError, ClipboardSink, StdoutSink, SystemClipboard};
pub use config::Config;
pub use error::{ClipMateError, Result};
pub use preferences::{Preferences, PreferencesStore};
pub use report::{CopyReport, Notice, Reporter};
pub use resolver::{Resolution, SelectionResolver};
pub use session::{CopyOutcome, Session};
pub use tree::TreeBuilder;
pub use types::{
    DirectoryExpansionError, FileReadError, ListingOrder, ResolvedFile, ResolvedFileList, TreeNode,
};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

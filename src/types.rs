/*!
 * Core types and data structures for ClipMate
 */

use std::fmt;
use std::path::{Path, PathBuf};

/// A single entry of a scanned directory tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Display name (final path component)
    pub name: String,
    /// Path relative to the chosen root directory
    pub relative_path: PathBuf,
    /// Fully resolved path used for I/O
    pub absolute_path: PathBuf,
    /// Whether this entry is a directory
    pub is_directory: bool,
    /// Child entries, only populated for directories
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a file node
    pub fn file(name: String, relative_path: PathBuf, absolute_path: PathBuf) -> Self {
        Self {
            name,
            relative_path,
            absolute_path,
            is_directory: false,
            children: Vec::new(),
        }
    }

    /// Create a directory node with the given children
    pub fn directory(
        name: String,
        relative_path: PathBuf,
        absolute_path: PathBuf,
        children: Vec<TreeNode>,
    ) -> Self {
        Self {
            name,
            relative_path,
            absolute_path,
            is_directory: true,
            children,
        }
    }

    /// Label used for this node in the aggregated document
    pub fn label(&self) -> String {
        path_label(&self.relative_path)
    }

    /// Find a node by its path relative to the tree root.
    ///
    /// An empty path or `.` returns the node itself.
    pub fn find(&self, relative_path: &Path) -> Option<&TreeNode> {
        let wanted: PathBuf = relative_path
            .components()
            .filter(|c| !matches!(c, std::path::Component::CurDir))
            .collect();

        if wanted.as_os_str().is_empty() || wanted == self.relative_path {
            return Some(self);
        }

        self.iter().find(|node| node.relative_path == wanted)
    }

    /// Iterate over all descendant nodes in pre-order
    pub fn iter(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Number of descendant nodes (every filesystem entry below this node)
    pub fn descendant_count(&self) -> usize {
        self.iter().count()
    }

    /// Render the tree as indented text, one entry per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        let root_name = if self.name.is_empty() {
            self.absolute_path.display().to_string()
        } else {
            self.name.clone()
        };
        out.push_str(&root_name);
        out.push_str("/\n");
        render_children(&self.children, "", &mut out);
        out
    }
}

fn render_children(children: &[TreeNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(&child.name);
        if child.is_directory {
            out.push('/');
        }
        out.push('\n');

        if child.is_directory {
            let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
            render_children(&child.children, &nested, out);
        }
    }
}

/// Pre-order iterator over the descendants of a [`TreeNode`]
pub struct Descendants<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Order in which directory entries are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ListingOrder {
    /// Sort entries by file name
    #[default]
    ByName,
    /// Whatever order the operating system lists entries in
    Filesystem,
}

/// A file scheduled for reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Label embedded in the document header
    pub label: String,
    /// Path used to read the file
    pub absolute_path: PathBuf,
}

/// Ordered, deduplicated list of files to aggregate
pub type ResolvedFileList = Vec<ResolvedFile>;

/// A file that could not be read during aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReadError {
    /// Label of the skipped file
    pub label: String,
    /// Path that failed to read
    pub path: PathBuf,
    /// Human readable cause
    pub cause: String,
}

impl fmt::Display for FileReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.cause)
    }
}

/// A selected directory whose expansion failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryExpansionError {
    /// Label of the selected directory
    pub label: String,
    /// Directory that could not be walked
    pub path: PathBuf,
    /// Human readable cause
    pub cause: String,
}

impl fmt::Display for DirectoryExpansionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/: {}", self.label, self.cause)
    }
}

/// Convert a relative path into the label used in output
pub fn path_label(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/*!
 * Directory tree construction
 */

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{ClipMateError, Result};
use crate::types::{ListingOrder, TreeNode};

/// Builds an in-memory tree for a chosen root directory
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    /// Order in which directory entries are visited
    order: ListingOrder,
}

impl TreeBuilder {
    /// Create a new tree builder
    pub fn new(order: ListingOrder) -> Self {
        Self { order }
    }

    /// Scan `root` and return the directory tree.
    ///
    /// The root is canonicalized first; every node's absolute path is the
    /// canonical root joined with its relative path. Any directory that
    /// cannot be listed aborts the whole build.
    pub fn build(&self, root: &Path) -> Result<TreeNode> {
        let abs_root = fs::canonicalize(root).map_err(|source| ClipMateError::DirectoryAccess {
            path: root.to_path_buf(),
            source,
        })?;

        if !abs_root.is_dir() {
            return Err(ClipMateError::DirectoryAccess {
                path: abs_root,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        debug!("Building tree for {}", abs_root.display());

        let name = abs_root
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let children = self.build_children(&abs_root, &abs_root)?;

        Ok(TreeNode::directory(name, PathBuf::new(), abs_root, children))
    }

    /// List the immediate entries of `dir`, recursing into subdirectories
    /// before moving on to the next sibling.
    fn build_children(&self, root: &Path, dir: &Path) -> Result<Vec<TreeNode>> {
        let mut children = Vec::new();

        for entry in self.list(dir) {
            let entry = entry.map_err(|e| ClipMateError::from_walk(dir.to_path_buf(), e))?;
            let absolute_path = entry.path().to_path_buf();
            let relative_path = absolute_path
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
            let name = entry.file_name().to_string_lossy().to_string();

            trace!("Tree entry: {}", relative_path.display());

            let node = if entry.file_type().is_dir() {
                let nested = self.build_children(root, &absolute_path)?;
                TreeNode::directory(name, relative_path, absolute_path, nested)
            } else {
                TreeNode::file(name, relative_path, absolute_path)
            };
            children.push(node);
        }

        Ok(children)
    }

    /// Iterate over the immediate entries of `dir` in the configured order
    fn list(&self, dir: &Path) -> walkdir::IntoIter {
        let walker = WalkDir::new(dir).min_depth(1).max_depth(1);
        let walker = match self.order {
            ListingOrder::ByName => walker.sort_by_file_name(),
            ListingOrder::Filesystem => walker,
        };
        walker.into_iter()
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(ListingOrder::default())
    }
}

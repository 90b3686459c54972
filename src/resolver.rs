/*!
 * Selection resolution
 *
 * Maps a set of selected tree nodes onto the ordered, deduplicated list of
 * files that will be read. Directory selections are expanded by walking the
 * filesystem again, so files created after the tree was built are picked up.
 */

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::types::{
    path_label, DirectoryExpansionError, ListingOrder, ResolvedFile, ResolvedFileList, TreeNode,
};

/// Outcome of resolving a selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Files to aggregate, in output order
    pub files: ResolvedFileList,
    /// Selected directories that could not be expanded
    pub errors: Vec<DirectoryExpansionError>,
}

impl Resolution {
    /// Whether every selected node resolved cleanly
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Resolves selections into a list of files to read
#[derive(Debug, Clone, Default)]
pub struct SelectionResolver {
    order: ListingOrder,
}

impl SelectionResolver {
    /// Create a new resolver that walks directories in the given order
    pub fn new(order: ListingOrder) -> Self {
        Self { order }
    }

    /// Resolve `selection` into files.
    ///
    /// Files keep their tree-relative label. Files found by expanding a
    /// selected directory are labelled relative to that directory. A file
    /// reachable through several selected nodes appears once, at its first
    /// position.
    pub fn resolve<'a, I>(&self, selection: I) -> Resolution
    where
        I: IntoIterator<Item = &'a TreeNode>,
    {
        let mut resolution = Resolution::default();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for node in selection {
            if !node.is_directory {
                push_unique(&mut resolution.files, &mut seen, node.label(), &node.absolute_path);
                continue;
            }

            match self.expand_directory(&node.absolute_path) {
                Ok(files) => {
                    debug!(
                        "Expanded {} into {} file(s)",
                        node.absolute_path.display(),
                        files.len()
                    );
                    for file in files {
                        push_unique(
                            &mut resolution.files,
                            &mut seen,
                            file.label,
                            &file.absolute_path,
                        );
                    }
                }
                Err(err) => {
                    warn!("Skipping directory {}: {}", node.absolute_path.display(), err);
                    resolution.errors.push(DirectoryExpansionError {
                        label: node.label(),
                        path: node.absolute_path.clone(),
                        cause: err.to_string(),
                    });
                }
            }
        }

        resolution
    }

    /// Walk `dir` recursively and collect every file below it.
    ///
    /// Any walk error fails the whole expansion so a directory is either
    /// included completely or not at all.
    fn expand_directory(&self, dir: &Path) -> walkdir::Result<Vec<ResolvedFile>> {
        let walker = WalkDir::new(dir).min_depth(1);
        let walker = match self.order {
            ListingOrder::ByName => walker.sort_by_file_name(),
            ListingOrder::Filesystem => walker,
        };

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !is_file(&entry) {
                continue;
            }
            let label = entry
                .path()
                .strip_prefix(dir)
                .map(path_label)
                .unwrap_or_else(|_| entry.file_name().to_string_lossy().to_string());
            files.push(ResolvedFile {
                label,
                absolute_path: entry.path().to_path_buf(),
            });
        }

        Ok(files)
    }
}

fn push_unique(
    files: &mut ResolvedFileList,
    seen: &mut HashSet<PathBuf>,
    label: String,
    absolute_path: &Path,
) {
    // Symlinks and their targets share one canonical path
    let key = fs::canonicalize(absolute_path).unwrap_or_else(|_| absolute_path.to_path_buf());
    if seen.insert(key) {
        files.push(ResolvedFile {
            label,
            absolute_path: absolute_path.to_path_buf(),
        });
    } else {
        debug!("Duplicate selection skipped: {}", absolute_path.display());
    }
}

/// Regular files, plus symlinks that point at a regular file
fn is_file(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeBuilder;
    use std::fs::{self, File};
    use std::io::{self, Write};
    use tempfile::tempdir;

    // /proj
    // ├── readme.txt
    // └── src/
    //     ├── main.txt
    //     └── util/
    //         └── helper.txt
    fn setup_project() -> io::Result<tempfile::TempDir> {
        let temp_dir = tempdir()?;
        fs::create_dir_all(temp_dir.path().join("src").join("util"))?;
        write!(File::create(temp_dir.path().join("readme.txt"))?, "B")?;
        write!(File::create(temp_dir.path().join("src").join("main.txt"))?, "A")?;
        write!(
            File::create(temp_dir.path().join("src").join("util").join("helper.txt"))?,
            "C"
        )?;
        Ok(temp_dir)
    }

    fn labels(resolution: &Resolution) -> Vec<&str> {
        resolution.files.iter().map(|f| f.label.as_str()).collect()
    }

    #[test]
    fn test_single_file_selection() {
        let temp_dir = setup_project().unwrap();
        let tree = TreeBuilder::default().build(temp_dir.path()).unwrap();
        let readme = tree.find(Path::new("readme.txt")).unwrap();

        let resolution = SelectionResolver::default().resolve([readme]);

        assert_eq!(resolution.files.len(), 1);
        assert_eq!(resolution.files[0].label, "readme.txt");
        assert_eq!(resolution.files[0].absolute_path, readme.absolute_path);
        assert!(resolution.is_clean());
    }

    #[test]
    fn test_directory_labels_are_relative_to_selected_directory() {
        let temp_dir = setup_project().unwrap();
        let tree = TreeBuilder::default().build(temp_dir.path()).unwrap();
        let src = tree.find(Path::new("src")).unwrap();

        let resolution = SelectionResolver::default().resolve([src]);

        assert_eq!(labels(&resolution), vec!["main.txt", "util/helper.txt"]);
    }

    #[test]
    fn test_nested_file_keeps_tree_label() {
        let temp_dir = setup_project().unwrap();
        let tree = TreeBuilder::default().build(temp_dir.path()).unwrap();
        let main = tree.find(Path::new("src/main.txt")).unwrap();

        let resolution = SelectionResolver::default().resolve([main]);

        assert_eq!(labels(&resolution), vec!["src/main.txt"]);
    }

    #[test]
    fn test_directory_and_descendant_deduplicated() {
        let temp_dir = setup_project().unwrap();
        let tree = TreeBuilder::default().build(temp_dir.path()).unwrap();
        let src = tree.find(Path::new("src")).unwrap();
        let main = tree.find(Path::new("src/main.txt")).unwrap();

        // File first: its tree label wins
        let resolution = SelectionResolver::default().resolve([main, src]);
        assert_eq!(labels(&resolution), vec!["src/main.txt", "util/helper.txt"]);

        // Directory first: the expanded label wins
        let resolution = SelectionResolver::default().resolve([src, main]);
        assert_eq!(labels(&resolution), vec!["main.txt", "util/helper.txt"]);
    }

    #[test]
    fn test_overlapping_directories_deduplicated() {
        let temp_dir = setup_project().unwrap();
        let tree = TreeBuilder::default().build(temp_dir.path()).unwrap();
        let src = tree.find(Path::new("src")).unwrap();
        let util = tree.find(Path::new("src/util")).unwrap();

        let resolution = SelectionResolver::default().resolve([util, src]);

        assert_eq!(labels(&resolution), vec!["helper.txt", "main.txt"]);
    }

    #[test]
    fn test_root_selection_covers_everything() {
        let temp_dir = setup_project().unwrap();
        let tree = TreeBuilder::default().build(temp_dir.path()).unwrap();

        let resolution = SelectionResolver::default().resolve([&tree]);

        assert_eq!(
            labels(&resolution),
            vec!["readme.txt", "src/main.txt", "src/util/helper.txt"]
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let temp_dir = setup_project().unwrap();
        let tree = TreeBuilder::default().build(temp_dir.path()).unwrap();
        let selection = [
            tree.find(Path::new("readme.txt")).unwrap(),
            tree.find(Path::new("src")).unwrap(),
        ];

        let resolver = SelectionResolver::default();
        assert_eq!(resolver.resolve(selection), resolver.resolve(selection));
    }

    #[test]
    fn test_directory_walk_sees_new_files() {
        let temp_dir = setup_project().unwrap();
        let tree = TreeBuilder::default().build(temp_dir.path()).unwrap();
        let src = tree.find(Path::new("src")).unwrap();

        File::create(temp_dir.path().join("src").join("added.txt")).unwrap();
        let resolution = SelectionResolver::default().resolve([src]);

        assert_eq!(
            labels(&resolution),
            vec!["added.txt", "main.txt", "util/helper.txt"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_and_target_copied_once() {
        let temp_dir = setup_project().unwrap();
        let src = temp_dir.path().join("src");
        std::os::unix::fs::symlink(src.join("main.txt"), src.join("alias.txt")).unwrap();
        let tree = TreeBuilder::default().build(temp_dir.path()).unwrap();

        let resolution = SelectionResolver::default().resolve([
            tree.find(Path::new("src/main.txt")).unwrap(),
            tree.find(Path::new("src")).unwrap(),
        ]);

        assert_eq!(labels(&resolution), vec!["src/main.txt", "util/helper.txt"]);
    }

    #[test]
    fn test_missing_directory_is_isolated() {
        let temp_dir = setup_project().unwrap();
        let tree = TreeBuilder::default().build(temp_dir.path()).unwrap();
        let util = tree.find(Path::new("src/util")).unwrap();
        let readme = tree.find(Path::new("readme.txt")).unwrap();

        fs::remove_dir_all(temp_dir.path().join("src").join("util")).unwrap();
        let resolution = SelectionResolver::default().resolve([util, readme]);

        assert_eq!(labels(&resolution), vec!["readme.txt"]);
        assert_eq!(resolution.errors.len(), 1);
        assert_eq!(resolution.errors[0].label, "src/util");
        assert!(!resolution.is_clean());
    }

    #[test]
    fn test_empty_selection() {
        let resolution = SelectionResolver::default().resolve(std::iter::empty::<&TreeNode>());
        assert!(resolution.files.is_empty());
        assert!(resolution.is_clean());
    }
}

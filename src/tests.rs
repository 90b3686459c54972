/*!
 * Tests for ClipMate functionality
 */

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tempfile::tempdir;

use crate::aggregator::ContentAggregator;
use crate::resolver::SelectionResolver;
use crate::tree::TreeBuilder;
use crate::types::ListingOrder;

// Helper function to create the /proj layout:
// readme.txt = "B", src/main.txt = "A"
fn setup_project() -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;
    fs::create_dir(temp_dir.path().join("src"))?;
    write!(File::create(temp_dir.path().join("readme.txt"))?, "B")?;
    write!(File::create(temp_dir.path().join("src").join("main.txt"))?, "A")?;
    Ok(temp_dir)
}

// Helper function to create a wider tree with N files spread over levels
fn setup_wide_directory(files_per_level: usize, levels: usize) -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;
    let mut dir = temp_dir.path().join("pkg");
    for level in 0..levels {
        fs::create_dir_all(&dir)?;
        for i in 0..files_per_level {
            let mut file = File::create(dir.join(format!("file_{}_{}.txt", level, i)))?;
            writeln!(file, "level {} file {}", level, i)?;
        }
        dir = dir.join(format!("level{}", level + 1));
    }
    Ok(temp_dir)
}

// The end-to-end scenario: readme.txt + src/ selected, in that order
#[test]
fn test_project_scenario() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let builder = TreeBuilder::default();

    // Building repeatedly must not change the result
    let _ = builder.build(temp_dir.path())?;
    let tree = builder.build(temp_dir.path())?;

    let selection = [
        tree.find(Path::new("readme.txt")).expect("readme.txt"),
        tree.find(Path::new("src")).expect("src"),
    ];
    let resolution = SelectionResolver::default().resolve(selection);
    let aggregation = ContentAggregator::default().aggregate(&resolution.files);

    assert_eq!(aggregation.document, "**readme.txt**\nB\n\n**main.txt**\nA\n");
    assert!(aggregation.errors.is_empty());

    Ok(())
}

// Selecting a directory with N files yields N entries
#[test]
fn test_directory_selection_counts_all_files() -> io::Result<()> {
    let temp_dir = setup_wide_directory(4, 3)?;
    let tree = TreeBuilder::default().build(temp_dir.path())?;
    let pkg = tree.find(Path::new("pkg")).expect("pkg");

    let resolution = SelectionResolver::default().resolve([pkg]);

    assert_eq!(resolution.files.len(), 12);
    assert!(resolution
        .files
        .iter()
        .all(|f| !f.label.starts_with("pkg")));
    let deepest = Path::new("level1").join("level2").join("file_2_0.txt");
    assert!(resolution
        .files
        .iter()
        .any(|f| Path::new(&f.label) == deepest));

    Ok(())
}

// Every file appears once even when selected through several nodes
#[test]
fn test_every_selection_combination_is_deduplicated() -> io::Result<()> {
    let temp_dir = setup_wide_directory(2, 3)?;
    let tree = TreeBuilder::default().build(temp_dir.path())?;

    // Select every node of the tree at once
    let everything: Vec<_> = tree.iter().collect();
    let resolution = SelectionResolver::default().resolve(everything);

    let unique: HashSet<_> = resolution.files.iter().map(|f| &f.absolute_path).collect();
    assert_eq!(unique.len(), resolution.files.len());
    assert_eq!(resolution.files.len(), 6);

    Ok(())
}

// Filesystem order still covers the same files as name order
#[test]
fn test_listing_orders_agree_on_content() -> io::Result<()> {
    let temp_dir = setup_wide_directory(3, 2)?;

    let by_name = TreeBuilder::new(ListingOrder::ByName).build(temp_dir.path())?;
    let by_fs = TreeBuilder::new(ListingOrder::Filesystem).build(temp_dir.path())?;

    let names: HashSet<_> = by_name.iter().map(|n| n.relative_path.clone()).collect();
    let fs_names: HashSet<_> = by_fs.iter().map(|n| n.relative_path.clone()).collect();
    assert_eq!(names, fs_names);

    let resolved_by_fs = SelectionResolver::new(ListingOrder::Filesystem).resolve([&by_fs]);
    assert_eq!(resolved_by_fs.files.len(), 6);

    Ok(())
}

// A deleted file is reported while the rest is aggregated
#[test]
fn test_file_deleted_between_resolution_and_reading() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let tree = TreeBuilder::default().build(temp_dir.path())?;

    let resolution = SelectionResolver::default().resolve([&tree]);
    assert_eq!(resolution.files.len(), 2);

    fs::remove_file(temp_dir.path().join("readme.txt"))?;
    let aggregation = ContentAggregator::default().aggregate(&resolution.files);

    let main_label = Path::new("src").join("main.txt").to_string_lossy().to_string();
    assert_eq!(aggregation.document, format!("**{}**\nA\n", main_label));
    assert_eq!(aggregation.errors.len(), 1);
    assert_eq!(aggregation.errors[0].label, "readme.txt");

    Ok(())
}

/*!
 * Configuration handling for ClipMate
 */

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::error::Result;
use crate::ensure;
use crate::types::ListingOrder;

/// Command-line arguments for ClipMate
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "clipmate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy selected files and directories to the clipboard",
    long_about = "Builds the tree of a directory and copies the contents of the selected files and subdirectories to the clipboard, each headed by its relative path in bold markup."
)]
pub struct Args {
    /// Root directory to browse
    #[clap(default_value = ".")]
    pub directory_path: PathBuf,

    /// Files or directories to copy, relative to the root ("." selects everything)
    pub selection: Vec<PathBuf>,

    /// Print the directory tree
    #[clap(long)]
    pub tree: bool,

    /// Order in which directory entries are listed
    #[clap(long, value_enum, default_value_t = ListingOrder::default())]
    pub order: ListingOrder,

    /// Write the document to stdout instead of the clipboard
    #[clap(long)]
    pub stdout: bool,

    /// Do not print the copy report
    #[clap(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Stop showing the welcome message
    #[clap(long)]
    pub no_welcome: bool,

    /// Preferences file to use instead of the default location
    #[clap(long, value_name = "FILE")]
    pub preferences: Option<PathBuf>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Root directory to browse
    pub root: PathBuf,

    /// Selected paths relative to the root
    pub selection: Vec<PathBuf>,

    /// Print the tree before copying
    pub show_tree: bool,

    /// Listing order for tree building and directory expansion
    pub order: ListingOrder,

    /// Deliver to stdout instead of the clipboard
    pub to_stdout: bool,

    /// Print the copy report
    pub report: bool,

    /// Enable debug logging
    pub verbose: bool,

    /// Persist the welcome opt-out
    pub suppress_welcome: bool,

    /// Explicit preferences file
    pub preferences_path: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            root: args.directory_path,
            selection: args.selection,
            show_tree: args.tree,
            order: args.order,
            to_stdout: args.stdout,
            report: !args.quiet,
            verbose: args.verbose,
            suppress_welcome: args.no_welcome,
            preferences_path: args.preferences,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.show_tree || !self.selection.is_empty() || self.suppress_welcome,
            Config,
            "nothing to do: pass --tree or at least one path to copy"
        );

        if let Some(path) = &self.preferences_path {
            ensure!(
                !path.is_dir(),
                Config,
                "preferences path is a directory: {}",
                path.display()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClipMateError;

    fn parse(args: &[&str]) -> Config {
        Config::from_args(Args::parse_from(args))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["clipmate"]);
        assert_eq!(config.root, PathBuf::from("."));
        assert!(config.selection.is_empty());
        assert_eq!(config.order, ListingOrder::ByName);
        assert!(config.report);
        assert!(!config.to_stdout);
    }

    #[test]
    fn test_selection_and_flags() {
        let config = parse(&[
            "clipmate",
            "/proj",
            "readme.txt",
            "src",
            "--stdout",
            "--order",
            "filesystem",
            "-q",
        ]);
        assert_eq!(config.root, PathBuf::from("/proj"));
        assert_eq!(
            config.selection,
            vec![PathBuf::from("readme.txt"), PathBuf::from("src")]
        );
        assert!(config.to_stdout);
        assert!(!config.report);
        assert_eq!(config.order, ListingOrder::Filesystem);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nothing_to_do_is_rejected() {
        let err = parse(&["clipmate", "/proj"]).validate().unwrap_err();
        assert!(matches!(err, ClipMateError::Config(_)));

        assert!(parse(&["clipmate", "/proj", "--tree"]).validate().is_ok());
        assert!(parse(&["clipmate", "--no-welcome"]).validate().is_ok());
    }
}

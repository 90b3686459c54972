/*!
 * Command-line interface for ClipMate
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use clipmate::clipboard::{ClipboardSink, StdoutSink, SystemClipboard};
use clipmate::config::{Args, Config};
use clipmate::logger::initialize_logger;
use clipmate::preferences::{PreferencesStore, WELCOME_MESSAGE};
use clipmate::report::Reporter;
use clipmate::session::Session;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "clipmate", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = Config::from_args(args);
    initialize_logger(config.verbose);

    show_welcome(&config);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Print the welcome message unless the user opted out, persisting the opt-out
fn show_welcome(config: &Config) {
    let store = match &config.preferences_path {
        Some(path) => PreferencesStore::new(path),
        None => match PreferencesStore::default_location() {
            Ok(store) => store,
            Err(e) => {
                warn!("Preferences unavailable: {}", e);
                return;
            }
        },
    };

    let mut preferences = store.load();
    if config.suppress_welcome && !preferences.suppress_welcome {
        preferences.suppress_welcome = true;
        if let Err(e) = store.save(&preferences) {
            warn!("Failed to save preferences: {}", e);
        }
    }

    if !preferences.suppress_welcome {
        eprintln!("{}\n", WELCOME_MESSAGE);
    }
}

fn run(config: &Config) -> clipmate::Result<ExitCode> {
    // `--no-welcome` on its own only updates preferences
    if !config.show_tree && config.selection.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    let progress = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
    {
        progress.set_style(style);
    }
    if config.report && !config.to_stdout {
        progress.enable_steady_tick(Duration::from_millis(100));
    } else {
        progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }
    progress.set_prefix("📋 Copying");

    let mut session = Session::with_progress(config.order, Arc::new(progress.clone()));
    session.open(Some(&config.root))?;

    if config.show_tree {
        if let Some(tree) = session.tree() {
            eprint!("{}", tree.render());
        }
    }

    if config.selection.is_empty() {
        progress.finish_and_clear();
        return Ok(ExitCode::SUCCESS);
    }

    let sink: Box<dyn ClipboardSink> = if config.to_stdout {
        Box::new(StdoutSink)
    } else {
        Box::new(SystemClipboard::new())
    };

    debug!("Copying {} selected path(s)", config.selection.len());
    let outcome = session.copy_selection(&config.selection, sink.as_ref())?;
    progress.finish_and_clear();

    if config.report && outcome.delivered {
        Reporter::new().print_report(&outcome.report);
    }
    eprintln!("{}", outcome.notice);

    if outcome.notice.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/*!
 * Logging setup
 */

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug
/// output for clipmate when `verbose` is set. Logs go to stderr so a
/// document written to stdout stays clean.
pub fn initialize_logger(verbose: bool) {
    let default_filter = if verbose { "clipmate=debug" } else { "clipmate=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: Failed to install logger: {}", e);
    }
}

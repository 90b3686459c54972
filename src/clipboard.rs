/*!
 * Clipboard support for ClipMate
 *
 * Delivers the aggregated document to the system clipboard, detecting an
 * available clipboard command for the current platform.
 */

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::debug;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Destination for the aggregated document
pub trait ClipboardSink {
    /// Deliver `text`; failures are returned to the caller, never retried
    fn write(&self, text: &str) -> Result<()>;
}

/// Clipboard commands ClipMate knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    /// tmux paste buffer
    Tmux,
    /// X11 clipboard with xclip
    Xclip,
    /// X11 clipboard with xsel
    Xsel,
    /// Wayland clipboard
    Wayland,
    /// macOS clipboard
    MacOS,
    /// Windows clipboard (native or via WSL)
    Windows,
    /// Termux clipboard
    Termux,
}

impl ClipboardProvider {
    /// Command line used to feed this provider through stdin
    fn command(&self) -> (&'static str, Vec<&'static str>) {
        match self {
            Self::Tmux => ("tmux", vec!["load-buffer", "-w", "-"]),
            Self::Xclip => ("xclip", vec!["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", vec!["-b", "-i"]),
            Self::Wayland => ("wl-copy", vec![]),
            Self::MacOS => ("pbcopy", vec![]),
            Self::Windows => ("clip.exe", vec![]),
            Self::Termux => ("termux-clipboard-set", vec![]),
        }
    }
}

impl ClipboardSink for ClipboardProvider {
    fn write(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.command();
        debug!("Copying {} bytes with {}", text.len(), cmd);
        execute_clipboard_command(cmd, &args, text)
    }
}

/// The system clipboard, using the first available provider
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    /// Create a handle to the system clipboard
    pub fn new() -> Self {
        Self
    }

    /// Providers that appear usable on this machine, in preference order
    pub fn providers(&self) -> Vec<ClipboardProvider> {
        determine_clipboard_providers()
    }
}

impl ClipboardSink for SystemClipboard {
    fn write(&self, text: &str) -> Result<()> {
        let provider = self
            .providers()
            .into_iter()
            .next()
            .ok_or(ClipboardError::NoClipboardFound)?;
        provider.write(text)
    }
}

/// Writes the document to standard output instead of a clipboard
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ClipboardSink for StdoutSink {
    fn write(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    let separator = if cfg!(windows) { ';' } else { ':' };
    if let Ok(paths) = env::var("PATH") {
        for path in paths.split(separator) {
            if Path::new(path).join(command).exists() {
                return true;
            }
        }
    }

    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Spawn `cmd`, write `text` to its stdin and wait for it to finish
fn execute_clipboard_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| {
            ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e))
        })?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        stdin.write_all(text.as_bytes()).map_err(|e| {
            ClipboardError::CommandFailed(format!("Failed to write to {}: {}", cmd, e))
        })?;
    }
    // Close stdin so the command sees EOF
    drop(child.stdin.take());

    let status = child.wait().map_err(|e| {
        ClipboardError::CommandFailed(format!("Failed to wait for {}: {}", cmd, e))
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

static PLATFORM: OnceLock<&'static str> = OnceLock::new();

/// Determine the platform (cached)
fn get_platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "android") {
            "android"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else {
            "unknown"
        }
    })
}

fn determine_clipboard_providers() -> Vec<ClipboardProvider> {
    let mut providers = Vec::with_capacity(3);

    if env::var("TMUX").is_ok() && command_exists("tmux") {
        providers.push(ClipboardProvider::Tmux);
    }

    match get_platform() {
        "macos" => {
            if command_exists("pbcopy") {
                providers.push(ClipboardProvider::MacOS);
            }
        }
        "windows" | "wsl" => {
            if command_exists("clip.exe") {
                providers.push(ClipboardProvider::Windows);
            }
        }
        "linux" => {
            if env::var("WAYLAND_DISPLAY").is_ok() && command_exists("wl-copy") {
                providers.push(ClipboardProvider::Wayland);
            }
            if command_exists("xsel") {
                providers.push(ClipboardProvider::Xsel);
            }
            if command_exists("xclip") {
                providers.push(ClipboardProvider::Xclip);
            }
        }
        "android" => {
            if command_exists("termux-clipboard-set") {
                providers.push(ClipboardProvider::Termux);
            }
        }
        _ => {}
    }

    providers
}

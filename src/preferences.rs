/*!
 * Persisted user preferences
 *
 * A small JSON document in the user's config directory. Preferences are
 * never allowed to break the application: a missing file means defaults, a
 * corrupt file is logged and replaced by defaults on the next save.
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ClipMateError, Result};

/// Directory name used under the platform config directory
pub const APP_DIR_NAME: &str = "clipmate";

/// File name of the preferences document
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// User preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Do not show the welcome notice on startup
    pub suppress_welcome: bool,
}

/// Reads and writes [`Preferences`] at a fixed location
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    /// Store backed by an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory (`<config>/clipmate/preferences.json`)
    pub fn default_location() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            ClipMateError::Config("could not determine the user config directory".to_string())
        })?;
        Ok(Self::new(base.join(APP_DIR_NAME).join(PREFERENCES_FILE_NAME)))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences, falling back to defaults on any problem
    pub fn load(&self) -> Preferences {
        match self.try_load() {
            Ok(preferences) => preferences,
            Err(e) => {
                warn!(
                    "Ignoring unreadable preferences at {}: {}",
                    self.path.display(),
                    e
                );
                Preferences::default()
            }
        }
    }

    /// Load preferences, reporting read and parse errors.
    ///
    /// A missing file is not an error and yields the defaults.
    pub fn try_load(&self) -> Result<Preferences> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No preferences at {}, using defaults", self.path.display());
                return Ok(Preferences::default());
            }
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(Preferences::default());
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Write preferences, creating the parent directory if needed
    pub fn save(&self, preferences: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string(preferences)?;
        fs::write(&self.path, text)?;
        debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

/// Text of the one-time welcome notice
pub const WELCOME_MESSAGE: &str = "\
Welcome to ClipMate!

ClipMate lets you pick a directory and copy the contents of selected files
and subdirectories to the clipboard, so you can quickly gather and share code
from your projects for review or assistance.

Run with --no-welcome to stop showing this message.";

//! Tiny TOML session file remembering state across runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// State carried between runs. Currently just the directory the user last
/// opened something from, so file dialogs and path prompts start there.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Session {
    pub last_directory: Option<PathBuf>,
}

impl Session {
    /// Load the session file, falling back to defaults when it is missing
    /// or unreadable. Persistence is best effort and never blocks startup.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(session) => session,
                Err(err) => {
                    debug!(path = %path.display(), %err, "ignoring malformed session file");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self).unwrap_or_default();
        fs::write(path, text)?;
        Ok(())
    }

    /// Record the directory containing `path` as the most recent one.
    pub fn remember(&mut self, path: &Path) {
        let dir = if path.is_dir() {
            Some(path.to_path_buf())
        } else {
            path.parent().map(Path::to_path_buf)
        };
        if dir.is_some() {
            self.last_directory = dir;
        }
    }
}

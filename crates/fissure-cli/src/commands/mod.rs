pub mod composite;
pub mod fill;
pub mod info;
pub mod render;

use std::path::{Path, PathBuf};

use fissure_core::io::Session;

/// Session file location: `FISSURE_SESSION` when set, otherwise a dotfile
/// in the working directory.
pub fn session_path() -> PathBuf {
    std::env::var_os("FISSURE_SESSION")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".fissure-session.toml"))
}

/// Remember `path` as the last-used directory; persistence is best effort.
pub fn remember_directory(path: &Path) {
    let session_file = session_path();
    let mut session = Session::load(&session_file);
    session.remember(path);
    let _ = session.save(&session_file);
}

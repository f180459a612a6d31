use std::path::Path;
use std::process::{Command, Stdio};

use arboard::Clipboard;

use crate::errors::{CatalogError, Result};

/// The platform opener used when no player program is configured.
#[cfg(target_os = "macos")]
pub const DEFAULT_OPENER: &str = "open";
#[cfg(target_os = "windows")]
pub const DEFAULT_OPENER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const DEFAULT_OPENER: &str = "xdg-open";

/// Hand the video file to an external player and return immediately. The
/// child is detached; the catalog never waits on playback.
pub fn open_external(path: &Path, player: Option<&str>) -> Result<u32> {
    let program = player.unwrap_or(DEFAULT_OPENER);

    let child = Command::new(program)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::Player(format!(
                    "{} not found; install it or pass --player <program>",
                    program
                ))
            } else {
                CatalogError::Player(e.to_string())
            }
        })?;

    Ok(child.id())
}

/// Copy a record's file path to the system clipboard.
pub fn copy_path(path: &str) -> Result<()> {
    let mut cb = Clipboard::new().map_err(|e| CatalogError::Clipboard(e.to_string()))?;
    cb.set_text(path)
        .map_err(|e| CatalogError::Clipboard(e.to_string()))
}

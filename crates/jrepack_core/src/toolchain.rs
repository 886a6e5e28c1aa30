use anyhow::{Result, anyhow};
use log::{debug, trace};
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::constants::PROJECT_MARKERS;

/// Reads a required environment variable.
pub fn require_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| anyhow!("The environment variable '{}' has not been set!", name))
}

/// Picks the explicit path when given, otherwise `<home>/<fallback>`.
///
/// `home` is only consulted for the fallback, so an unset `HOME` is fine as long
/// as every tool path is configured explicitly.
pub fn resolve_tool_home<F>(explicit: Option<&Path>, fallback: &str, home: F) -> Result<PathBuf>
where
    F: FnOnce() -> Result<String>,
{
    match explicit {
        Some(path) => {
            trace!("Using configured tool path: {}", path.display());
            Ok(path.to_path_buf())
        }
        None => {
            let resolved = PathBuf::from(home()?).join(fallback);
            debug!("Falling back to {}", resolved.display());
            Ok(resolved)
        }
    }
}

/// Like [`resolve_tool_home`], reading `$HOME` from the environment.
pub fn tool_home(explicit: Option<&Path>, fallback: &str) -> Result<PathBuf> {
    resolve_tool_home(explicit, fallback, || require_env("HOME"))
}

/// Walks up from `start` to the first directory holding one of the project markers.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    debug!("Searching for project root");
    let mut current_dir = start.to_path_buf();
    trace!("Starting search from: {:?}", current_dir);

    loop {
        for marker in PROJECT_MARKERS {
            trace!("Checking for {} in {:?}", marker, current_dir);
            if current_dir.join(marker).exists() {
                debug!("Found project root at: {:?}", current_dir);
                return Ok(current_dir);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                return Err(anyhow!(
                    "Could not find a project root (none of {:?}) above {}",
                    PROJECT_MARKERS,
                    start.display()
                ));
            }
        }
    }
}

use anyhow::{Context, Result, anyhow};
use ignore::WalkBuilder;
use log::{debug, trace};
use std::{
    fs::{self, Metadata, OpenOptions},
    path::{Path, PathBuf},
};

/// Creates `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        trace!("Creating directory: {}", dir.display());
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
}

/// Deletes `dir` recursively if it exists.
pub fn remove_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        debug!("Removing {}", dir.display());
        fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
    }
    Ok(())
}

/// Copies a file into `dir`, keeping its file name. Returns the new path.
pub fn copy_file_into(file: &Path, dir: &Path) -> Result<PathBuf> {
    let name = file.file_name().ok_or_else(|| anyhow!("{} has no file name", file.display()))?;
    ensure_dir(dir)?;
    let target = dir.join(name);
    trace!("Copying {} -> {}", file.display(), target.display());
    fs::copy(file, &target)
        .with_context(|| format!("Failed to copy {} to {}", file.display(), target.display()))?;
    Ok(target)
}

/// True when the current user can both read and write the file.
///
/// Checks by opening the file read-write, without truncating or creating it.
pub fn is_read_write(path: &Path, meta: &Metadata) -> bool {
    if meta.permissions().readonly() {
        return false;
    }
    OpenOptions::new().read(true).write(true).open(path).is_ok()
}

/// Recursively copies `src` into `dst`, skipping files rejected by `include`.
///
/// Directories are always recreated. Returns the number of files copied.
pub fn copy_dir_filtered<F>(src: &Path, dst: &Path, include: F) -> Result<usize>
where
    F: Fn(&Path, &Metadata) -> bool,
{
    debug!("Copying directory {} -> {}", src.display(), dst.display());
    if !src.is_dir() {
        return Err(anyhow!("{} is not a directory", src.display()));
    }

    let walker = WalkBuilder::new(src).standard_filters(false).follow_links(false).build();
    let mut copied = 0;
    for res in walker {
        let dent = res?;
        let path = dent.path();
        let rel = path.strip_prefix(src)?;
        let target = dst.join(rel);
        let meta = fs::symlink_metadata(path)
            .with_context(|| format!("Failed to stat {}", path.display()))?;

        if meta.is_dir() {
            ensure_dir(&target)?;
            continue;
        }
        if !include(path, &meta) {
            debug!("Skipping {}", rel.display());
            continue;
        }
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        fs::copy(path, &target)
            .with_context(|| format!("Failed to copy {} to {}", path.display(), target.display()))?;
        copied += 1;
    }
    debug!("Copied {} files into {}", copied, dst.display());
    Ok(copied)
}

/// Marks a file as executable for everyone who can read it.
#[cfg(unix)]
pub fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to make {} executable", path.display()))
}

#[cfg(not(unix))]
pub fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

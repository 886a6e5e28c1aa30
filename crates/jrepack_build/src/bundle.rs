use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use std::{fs, path::Path, path::PathBuf};

use crate::{layout::BuildLayout, types::Platform};

/// Lays out the Linux bundle: fat jar, runtime and a launcher script.
pub fn prepare_linux(layout: &BuildLayout) -> Result<PathBuf> {
    let root = layout.bundle_root(Platform::Linux);
    let jar = layout.fat_jar();
    require_file(&jar, "fat-jar")?;
    info!("Preparing the Linux bundle in {}", root.display());

    create_bundle_root(&root)?;
    let copied = jrepack_core::copy_file_into(&jar, &root)?;
    copy_runtime(&layout.runtime_dir(Platform::Linux), &root)?;

    let jar_name = copied
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("{} has no file name", copied.display()))?;
    let script = layout.launcher_script();
    fs::write(&script, launcher_script(&jar_name))
        .with_context(|| format!("Failed to write {}", script.display()))?;
    jrepack_core::set_executable(&script)?;
    debug!("Wrote launcher {}", script.display());
    Ok(root)
}

/// Lays out the Windows bundle: the wrapped executable and its runtime.
pub fn prepare_windows(layout: &BuildLayout) -> Result<PathBuf> {
    let root = layout.bundle_root(Platform::Windows);
    let exe = layout.executable();
    require_file(&exe, "windows-executable")?;
    info!("Preparing the Windows bundle in {}", root.display());

    create_bundle_root(&root)?;
    jrepack_core::copy_file_into(&exe, &root)?;
    copy_runtime(&layout.runtime_dir(Platform::Windows), &root)?;
    Ok(root)
}

fn launcher_script(jar_name: &str) -> String {
    format!("./jre/bin/java -jar ./{}", jar_name)
}

fn require_file(path: &Path, stage: &str) -> Result<()> {
    if !path.is_file() {
        return Err(anyhow!("{} not found; run the {} stage first", path.display(), stage));
    }
    Ok(())
}

fn create_bundle_root(root: &Path) -> Result<()> {
    fs::create_dir_all(root).with_context(|| format!("Failed to create {}", root.display()))
}

/// Copies the runtime into `<root>/jre`, leaving out files we cannot both read and write.
fn copy_runtime(runtime: &Path, root: &Path) -> Result<usize> {
    if !runtime.is_dir() {
        return Err(anyhow!("Runtime {} not found; run the runtime stage first", runtime.display()));
    }
    let copied = jrepack_core::copy_dir_filtered(runtime, &root.join("jre"), |path, meta| {
        jrepack_core::is_read_write(path, meta)
    })?;
    debug!("Copied {} runtime files", copied);
    Ok(copied)
}

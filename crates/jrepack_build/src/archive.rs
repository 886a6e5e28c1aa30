use anyhow::{Context, Result, anyhow};
use flate2::{Compression, write::GzEncoder};
use ignore::WalkBuilder;
use log::{debug, info};
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{jar::entry_name, layout::BuildLayout, types::Platform};

/// Archives the prepared bundle of `platform` next to it.
pub fn package(layout: &BuildLayout, platform: Platform) -> Result<PathBuf> {
    let dir = layout.bundle_root(platform);
    if !dir.is_dir() {
        return Err(anyhow!(
            "{} not found; run the prepare-{} stage first",
            dir.display(),
            platform.dir_name()
        ));
    }
    let archive = layout.archive(platform);
    info!("Packaging {} into {}", dir.display(), archive.display());
    match platform {
        Platform::Linux => write_tar_gz(&dir, &archive)?,
        Platform::Windows => write_zip(&dir, &archive)?,
    }
    Ok(archive)
}

fn root_name(dir: &Path) -> Result<String> {
    dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("{} has no directory name", dir.display()))
}

/// Gzipped tar with every entry under the directory's own name.
pub fn write_tar_gz(dir: &Path, archive: &Path) -> Result<()> {
    let name = root_name(dir)?;
    let file =
        File::create(archive).with_context(|| format!("Failed to create {}", archive.display()))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder.follow_symlinks(false);
    builder
        .append_dir_all(&name, dir)
        .with_context(|| format!("Failed to add {} to {}", dir.display(), archive.display()))?;
    builder.into_inner()?.finish()?;
    debug!("Wrote {}", archive.display());
    Ok(())
}

/// Deflated zip with every entry under the directory's own name, in sorted order.
pub fn write_zip(dir: &Path, archive: &Path) -> Result<()> {
    let name = root_name(dir)?;
    let file =
        File::create(archive).with_context(|| format!("Failed to create {}", archive.display()))?;
    let mut zip = ZipWriter::new(file);
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut entries = 0;
    for res in walker {
        let dent = res?;
        let path = dent.path();
        let rel = path.strip_prefix(dir)?;
        let meta = fs::metadata(path)?;
        let mut entry = if rel.as_os_str().is_empty() {
            name.clone()
        } else {
            format!("{}/{}", name, entry_name(rel))
        };
        let options = entry_options(&meta);

        if meta.is_dir() {
            entry.push('/');
            zip.add_directory(entry, options)?;
        } else {
            zip.start_file(entry, options)?;
            let mut src =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            io::copy(&mut src, &mut zip)?;
        }
        entries += 1;
    }
    zip.finish()?;
    debug!("Wrote {} entries to {}", entries, archive.display());
    Ok(())
}

#[cfg(unix)]
fn entry_options(meta: &fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(meta.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn entry_options(_meta: &fs::Metadata) -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

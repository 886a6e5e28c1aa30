//! Fat jar assembly.
//!
//! The application entries go in first, followed by every dependency jar with its
//! `META-INF/**` and `about.html` removed. When two inputs carry the same path the
//! first one is kept.

use anyhow::{Context, Result, anyhow};
use ignore::WalkBuilder;
use log::{debug, info, trace, warn};
use std::{
    collections::HashSet,
    fs::File,
    io::{self, Seek, Write},
    path::{Path, PathBuf},
};
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

use jrepack_core::constants::{EXCLUDED_DEPENDENCY_DIRS, EXCLUDED_DEPENDENCY_FILES, MANIFEST_PATH};

use crate::{config::Config, layout::BuildLayout};

pub fn build_fat_jar(cfg: &Config, layout: &BuildLayout) -> Result<PathBuf> {
    let app = cfg.app.as_ref().ok_or_else(|| anyhow!("--app is required to assemble the fat jar"))?;
    let main_class = cfg
        .main_class
        .as_deref()
        .ok_or_else(|| anyhow!("--main-class is required to assemble the fat jar"))?;
    if !app.exists() {
        return Err(anyhow!("Application input {} does not exist", app.display()));
    }

    let dependencies = dependency_jars(&cfg.dependencies);
    let target = layout.fat_jar();
    info!("Assembling {} from {} dependency jars", target.display(), dependencies.len());
    jrepack_core::ensure_dir(target.parent().unwrap_or(cfg.build_dir.as_path()))?;

    let file =
        File::create(&target).with_context(|| format!("Failed to create {}", target.display()))?;
    let mut jar = FatJarWriter::new(file);
    jar.write_manifest(main_class)?;

    if app.is_dir() {
        jar.add_directory_tree(app)?;
    } else {
        jar.add_jar(app, |name| name != MANIFEST_PATH)?;
    }
    for dep in &dependencies {
        jar.add_jar(dep, keep_dependency_entry)?;
    }

    let entries = jar.finish()?;
    debug!("Wrote {} entries to {}", entries, target.display());
    Ok(target)
}

/// Only regular files ending in `.jar` are merged.
fn dependency_jars(candidates: &[PathBuf]) -> Vec<PathBuf> {
    candidates
        .iter()
        .filter(|p| {
            let keep = p.is_file() && p.extension().is_some_and(|e| e == "jar");
            if !keep {
                debug!("Skipping dependency that is not a jar file: {}", p.display());
            }
            keep
        })
        .cloned()
        .collect()
}

fn keep_dependency_entry(name: &str) -> bool {
    if EXCLUDED_DEPENDENCY_FILES.contains(&name) {
        return false;
    }
    !EXCLUDED_DEPENDENCY_DIRS
        .iter()
        .any(|dir| name.starts_with(dir) || name == dir.trim_end_matches('/'))
}

fn manifest(main_class: &str) -> String {
    format!("Manifest-Version: 1.0\r\nMain-Class: {}\r\n\r\n", main_class)
}

struct FatJarWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    written: HashSet<String>,
}

impl<W: Write + Seek> FatJarWriter<W> {
    fn new(inner: W) -> Self {
        Self { zip: ZipWriter::new(inner), written: HashSet::new() }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
    }

    /// Returns false when the path is already taken.
    fn claim(&mut self, name: &str, source: &Path) -> bool {
        if self.written.insert(name.to_string()) {
            return true;
        }
        if !name.ends_with('/') {
            warn!("Duplicate entry {} in {} skipped", name, source.display());
        }
        false
    }

    fn write_manifest(&mut self, main_class: &str) -> Result<()> {
        self.written.insert("META-INF/".to_string());
        self.written.insert(MANIFEST_PATH.to_string());
        self.zip.add_directory("META-INF/", Self::options())?;
        self.zip.start_file(MANIFEST_PATH, Self::options())?;
        self.zip.write_all(manifest(main_class).as_bytes())?;
        Ok(())
    }

    fn add_jar<F>(&mut self, jar: &Path, keep: F) -> Result<()>
    where
        F: Fn(&str) -> bool,
    {
        debug!("Merging {}", jar.display());
        let file = File::open(jar).with_context(|| format!("Failed to open {}", jar.display()))?;
        let mut archive = ZipArchive::new(file)
            .with_context(|| format!("{} is not a valid jar", jar.display()))?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            if !keep(&name) {
                trace!("Excluding {} from {}", name, jar.display());
                continue;
            }
            if !self.claim(&name, jar) {
                continue;
            }
            if entry.is_dir() {
                self.zip.add_directory(name, Self::options())?;
            } else {
                self.zip.start_file(name, Self::options())?;
                io::copy(&mut entry, &mut self.zip)
                    .with_context(|| format!("Failed to copy an entry of {}", jar.display()))?;
            }
        }
        Ok(())
    }

    fn add_directory_tree(&mut self, dir: &Path) -> Result<()> {
        debug!("Adding classes from {}", dir.display());
        let walker = WalkBuilder::new(dir)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for res in walker {
            let dent = res?;
            let path = dent.path();
            let rel = path.strip_prefix(dir)?;
            if rel.as_os_str().is_empty() {
                continue;
            }
            let mut name = entry_name(rel);
            if path.is_dir() {
                name.push('/');
                if self.claim(&name, dir) {
                    self.zip.add_directory(name, Self::options())?;
                }
            } else if name != MANIFEST_PATH && self.claim(&name, dir) {
                self.zip.start_file(name, Self::options())?;
                let mut src = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                io::copy(&mut src, &mut self.zip)?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<usize> {
        let count = self.written.len();
        self.zip.finish()?;
        Ok(count)
    }
}

/// Zip entry names always use forward slashes.
pub(crate) fn entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::{fs, io::Read};
    use tempfile::TempDir;

    fn jar_entries(jar: &Path) -> Result<Vec<String>> {
        let mut archive = ZipArchive::new(File::open(jar)?)?;
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            names.push(archive.by_index(i)?.name().to_string());
        }
        Ok(names)
    }

    fn read_entry(jar: &Path, name: &str) -> Result<String> {
        let mut archive = ZipArchive::new(File::open(jar)?)?;
        let mut entry = archive.by_name(name)?;
        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        Ok(content)
    }

    fn create_jar(path: &Path, entries: &[(&str, &str)]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_merges_app_and_dependencies() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_jar(
            &root.join("app.jar"),
            &[
                ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\r\n"),
                ("moe/", ""),
                ("moe/mewore/SaveRabbit.class", "app"),
            ],
        );
        create_jar(
            &root.join("libs/lib.jar"),
            &[
                ("META-INF/MANIFEST.MF", "lib manifest"),
                ("META-INF/LICENSE", "license"),
                ("about.html", "<html/>"),
                ("org/lib/Util.class", "lib"),
            ],
        );

        let mut cfg = test_config(root);
        cfg.app = Some(root.join("app.jar"));
        cfg.dependencies = vec![root.join("libs/lib.jar")];
        let layout = BuildLayout::from_config(&cfg).unwrap();

        let jar = build_fat_jar(&cfg, &layout).unwrap();
        assert_eq!(jar, layout.fat_jar());
        assert_eq!(
            jar_entries(&jar).unwrap(),
            vec![
                "META-INF/",
                "META-INF/MANIFEST.MF",
                "moe/",
                "moe/mewore/SaveRabbit.class",
                "org/lib/Util.class",
            ]
        );
        assert_eq!(
            read_entry(&jar, "META-INF/MANIFEST.MF").unwrap(),
            "Manifest-Version: 1.0\r\nMain-Class: moe.mewore.saverabbit.SaveRabbit\r\n\r\n"
        );
    }

    #[test]
    fn test_first_duplicate_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_jar(&root.join("app.jar"), &[("shared/Config.class", "app")]);
        create_jar(&root.join("a.jar"), &[("shared/", ""), ("shared/Config.class", "a")]);
        create_jar(&root.join("b.jar"), &[("shared/", ""), ("shared/Other.class", "b")]);

        let mut cfg = test_config(root);
        cfg.app = Some(root.join("app.jar"));
        cfg.dependencies = vec![root.join("a.jar"), root.join("b.jar")];
        let layout = BuildLayout::from_config(&cfg).unwrap();

        let jar = build_fat_jar(&cfg, &layout).unwrap();
        assert_eq!(read_entry(&jar, "shared/Config.class").unwrap(), "app");
        let entries = jar_entries(&jar).unwrap();
        assert_eq!(entries.iter().filter(|e| *e == "shared/").count(), 1);
        assert!(entries.contains(&"shared/Other.class".to_string()));
    }

    #[test]
    fn test_classes_directory_input() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let classes = root.join("build/classes/java/main");
        fs::create_dir_all(classes.join("moe/mewore")).unwrap();
        fs::write(classes.join("moe/mewore/SaveRabbit.class"), "app").unwrap();
        fs::create_dir_all(classes.join("META-INF")).unwrap();
        fs::write(classes.join("META-INF/MANIFEST.MF"), "stale").unwrap();

        let mut cfg = test_config(root);
        cfg.app = Some(classes);
        let layout = BuildLayout::from_config(&cfg).unwrap();

        let jar = build_fat_jar(&cfg, &layout).unwrap();
        let entries = jar_entries(&jar).unwrap();
        assert!(entries.contains(&"moe/mewore/SaveRabbit.class".to_string()));
        assert!(entries.contains(&"moe/mewore/".to_string()));
        assert!(read_entry(&jar, MANIFEST_PATH).unwrap().contains("Main-Class"));
    }

    #[test]
    fn test_non_jar_dependencies_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("notes.txt"), "x").unwrap();
        fs::create_dir_all(root.join("dir.jar")).unwrap();
        create_jar(&root.join("ok.jar"), &[]);

        let found = dependency_jars(&[
            root.join("notes.txt"),
            root.join("dir.jar"),
            root.join("missing.jar"),
            root.join("ok.jar"),
        ]);
        assert_eq!(found, vec![root.join("ok.jar")]);
    }

    #[test]
    fn test_dependency_entry_filter() {
        assert!(keep_dependency_entry("org/lib/Util.class"));
        assert!(keep_dependency_entry("docs/about.html"));
        assert!(!keep_dependency_entry("about.html"));
        assert!(!keep_dependency_entry("META-INF/"));
        assert!(!keep_dependency_entry("META-INF"));
        assert!(!keep_dependency_entry("META-INF/services/java.sql.Driver"));
    }

    #[test]
    fn test_missing_inputs_are_reported() {
        let temp_dir = TempDir::new().unwrap();
        let mut cfg = test_config(temp_dir.path());
        let layout = BuildLayout::from_config(&cfg).unwrap();
        let err = build_fat_jar(&cfg, &layout).unwrap_err();
        assert!(err.to_string().contains("--app"));

        cfg.app = Some(temp_dir.path().join("missing.jar"));
        let err = build_fat_jar(&cfg, &layout).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let rel = Path::new("moe").join("mewore").join("A.class");
        assert_eq!(entry_name(&rel), "moe/mewore/A.class");
    }
}

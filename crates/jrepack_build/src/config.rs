use anyhow::{Result, anyhow};
use clap::Parser;
use log::{debug, info};
use std::{env, path::PathBuf};

use jrepack_core::constants::{LAUNCH4J_FALLBACK, LINUX_JDK_FALLBACK, WINDOWS_JDK_FALLBACK};

#[derive(Debug, Clone, Parser)]
#[command(name = "build")]
#[command(about = "Package a Java application with minimized runtimes")]
pub struct Config {
    /// Root directory of the project (defaults to the nearest project root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Application name used for the jar and the bundle directories
    #[arg(long)]
    pub name: Option<String>,

    /// Version appended to the jar name
    #[arg(long)]
    pub app_version: Option<String>,

    /// Compiled application: a classes directory or a jar
    #[arg(long)]
    pub app: Option<PathBuf>,

    /// Runtime dependency jar merged into the fat jar (repeatable)
    #[arg(long = "dependency")]
    pub dependencies: Vec<PathBuf>,

    /// Fully qualified class written as Main-Class
    #[arg(long)]
    pub main_class: Option<String>,

    /// Output directory, relative to the root
    #[arg(long, default_value = "build")]
    pub build_dir: PathBuf,

    /// Launch4J template with <jar/> and <outfile/> placeholders
    #[arg(long, default_value = "launch4j-config.xml")]
    pub launch4j_config: PathBuf,

    /// Linux JDK used for jdeps and jlink [default: ~/.jdks/jdk-lin64]
    #[arg(long, env = "LINUX_JAVA_PATH")]
    pub linux_java_path: Option<PathBuf>,

    /// Windows JDK whose jlink.exe runs under wine [default: ~/.jdks/jdk-win64]
    #[arg(long, env = "WINDOWS_JAVA_PATH")]
    pub windows_java_path: Option<PathBuf>,

    /// Launch4J installation [default: ~/.jdks/launch4j]
    #[arg(long, env = "LAUNCH4J_PATH")]
    pub launch4j_path: Option<PathBuf>,

    /// Top-level directory inside the Linux archive [default: <name>-lin64]
    #[arg(long, env = "LINUX_ROOT_DIR")]
    pub linux_root_dir: Option<String>,

    /// Top-level directory inside the Windows archive [default: "<name> x64"]
    #[arg(long, env = "WINDOWS_ROOT_DIR")]
    pub windows_root_dir: Option<String>,

    /// Linux archive name without .tar.gz [default: the root directory name]
    #[arg(long, env = "LINUX_ARCHIVE_NAME")]
    pub linux_archive_name: Option<String>,

    /// Windows archive name without .zip [default: the root directory name]
    #[arg(long, env = "WINDOWS_ARCHIVE_NAME")]
    pub windows_archive_name: Option<String>,

    /// Program used to run Windows binaries
    #[arg(long, env = "WINE", default_value = "wine")]
    pub wine: String,
}

impl Config {
    /// Resolve the root directory and anchor relative paths on it
    pub fn initialize(&mut self) -> Result<()> {
        let root = if let Some(r) = self.root.take() {
            debug!("Using provided root directory: {:?}", r);
            r.canonicalize().unwrap_or(r)
        } else {
            debug!("No root provided, searching for project root");
            jrepack_core::find_project_root(&env::current_dir()?)?
        };
        info!("Using root directory: {}", root.display());

        if self.name.is_none() {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| anyhow!("Cannot derive a name from {}", root.display()))?;
            debug!("Using directory name as application name: {}", name);
            self.name = Some(name);
        }

        self.app = self.app.take().map(|p| root.join(p));
        self.dependencies = self.dependencies.iter().map(|p| root.join(p)).collect();
        self.build_dir = root.join(&self.build_dir);
        self.launch4j_config = root.join(&self.launch4j_config);

        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }

    pub fn name(&self) -> Result<&str> {
        self.name
            .as_deref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }

    pub fn linux_jdk(&self) -> Result<PathBuf> {
        jrepack_core::tool_home(self.linux_java_path.as_deref(), LINUX_JDK_FALLBACK)
    }

    pub fn windows_jdk(&self) -> Result<PathBuf> {
        jrepack_core::tool_home(self.windows_java_path.as_deref(), WINDOWS_JDK_FALLBACK)
    }

    pub fn launch4j_home(&self) -> Result<PathBuf> {
        jrepack_core::tool_home(self.launch4j_path.as_deref(), LAUNCH4J_FALLBACK)
    }
}

#[cfg(test)]
pub(crate) fn test_config(root: &std::path::Path) -> Config {
    let mut cfg = Config::parse_from([
        "build",
        "--root",
        root.to_str().unwrap(),
        "--name",
        "saverabbit",
        "--app-version",
        "1.0-SNAPSHOT",
        "--main-class",
        "moe.mewore.saverabbit.SaveRabbit",
        "--linux-java-path",
        "/opt/jdk-lin64",
        "--windows-java-path",
        "/opt/jdk-win64",
        "--launch4j-path",
        "/opt/launch4j",
    ]);
    clear_env_fallbacks(&mut cfg);
    cfg.initialize().unwrap();
    cfg
}

/// Drops values clap picked up from the environment rather than the arguments.
#[cfg(test)]
pub(crate) fn clear_env_fallbacks(cfg: &mut Config) {
    cfg.linux_root_dir = None;
    cfg.windows_root_dir = None;
    cfg.linux_archive_name = None;
    cfg.windows_archive_name = None;
    cfg.wine = "wine".to_string();
}

use anyhow::Result;
use std::path::PathBuf;

use crate::{config::Config, types::Platform};

/// Locations of every stage output under the build directory.
#[derive(Debug, Clone)]
pub struct BuildLayout {
    build_dir: PathBuf,
    name: String,
    stem: String,
    linux_root_dir: Option<String>,
    windows_root_dir: Option<String>,
    linux_archive_name: Option<String>,
    windows_archive_name: Option<String>,
}

impl BuildLayout {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let name = cfg.name()?.to_string();
        let stem = match &cfg.app_version {
            Some(version) => format!("{}-{}", name, version),
            None => name.clone(),
        };
        Ok(Self {
            build_dir: cfg.build_dir.clone(),
            name,
            stem,
            linux_root_dir: cfg.linux_root_dir.clone(),
            windows_root_dir: cfg.windows_root_dir.clone(),
            linux_archive_name: cfg.linux_archive_name.clone(),
            windows_archive_name: cfg.windows_archive_name.clone(),
        })
    }

    /// `<name>-<version>`, or just the name without a version
    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn fat_jar(&self) -> PathBuf {
        self.build_dir.join("libs").join(format!("{}.jar", self.stem))
    }

    pub fn dependencies_file(&self) -> PathBuf {
        self.build_dir.join("jar-dependencies").join("dependencies.txt")
    }

    pub fn runtime_dir(&self, platform: Platform) -> PathBuf {
        self.build_dir.join("jre").join(platform.dir_name())
    }

    pub fn executable_dir(&self) -> PathBuf {
        self.build_dir.join("windows-executable")
    }

    pub fn executable(&self) -> PathBuf {
        self.executable_dir().join(format!("{}.exe", self.stem))
    }

    pub fn launch4j_config(&self) -> PathBuf {
        self.executable_dir().join("launch4j-config.xml")
    }

    fn bundle_parent(&self, platform: Platform) -> PathBuf {
        self.build_dir.join("executable").join(platform.dir_name())
    }

    pub fn bundle_root_name(&self, platform: Platform) -> String {
        let configured = match platform {
            Platform::Linux => &self.linux_root_dir,
            Platform::Windows => &self.windows_root_dir,
        };
        configured.clone().unwrap_or_else(|| match platform {
            Platform::Linux => format!("{}-lin64", self.name),
            Platform::Windows => format!("{} x64", self.name),
        })
    }

    /// Directory that becomes the single top-level entry of the archive
    pub fn bundle_root(&self, platform: Platform) -> PathBuf {
        self.bundle_parent(platform).join(self.bundle_root_name(platform))
    }

    pub fn launcher_script(&self) -> PathBuf {
        self.bundle_root(Platform::Linux).join(format!("{}.sh", self.stem))
    }

    pub fn archive(&self, platform: Platform) -> PathBuf {
        let (configured, extension) = match platform {
            Platform::Linux => (&self.linux_archive_name, "tar.gz"),
            Platform::Windows => (&self.windows_archive_name, "zip"),
        };
        let base = configured.clone().unwrap_or_else(|| self.bundle_root_name(platform));
        self.bundle_parent(platform).join(format!("{}.{}", base, extension))
    }
}

use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

use jrepack_core::Tool;

use crate::{config::Config, deps::read_module_list, layout::BuildLayout, types::Platform};

const JLINK_FLAGS: &[&str] = &["--strip-debug", "--no-man-pages", "--no-header-files"];

/// Links a minimized runtime for `platform` from the collected module list.
pub fn create_runtime(cfg: &Config, layout: &BuildLayout, platform: Platform) -> Result<PathBuf> {
    let modules = read_module_list(&layout.dependencies_file())?;
    let output = layout.runtime_dir(platform);
    info!("Creating the {} runtime with modules {}", platform, modules);

    // jlink refuses to write into an existing directory
    jrepack_core::remove_dir(&output)?;
    if let Some(parent) = output.parent() {
        jrepack_core::ensure_dir(parent)?;
    }

    jlink_command(cfg, platform, &modules, &output)?.run()?;
    Ok(output)
}

pub(crate) fn jlink_command(
    cfg: &Config,
    platform: Platform,
    modules: &str,
    output: &Path,
) -> Result<Tool> {
    let tool = match platform {
        Platform::Linux => Tool::new(cfg.linux_jdk()?.join("bin").join("jlink")),
        Platform::Windows => {
            Tool::new(&cfg.wine).arg(cfg.windows_jdk()?.join("bin").join("jlink.exe"))
        }
    };
    Ok(tool.arg("--add-modules").arg(modules).args(JLINK_FLAGS).arg("--output").arg(output))
}

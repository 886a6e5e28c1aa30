use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use std::{fs, path::Path, path::PathBuf};

use jrepack_core::Tool;

use crate::{config::Config, layout::BuildLayout};

const JAR_PLACEHOLDER: &str = "<jar/>";
const OUTFILE_PLACEHOLDER: &str = "<outfile/>";

/// Fills the jar and output placeholders of a Launch4J template.
pub fn render_launch4j_config(template: &str, jar: &Path, exe: &Path) -> String {
    for placeholder in [JAR_PLACEHOLDER, OUTFILE_PLACEHOLDER] {
        if !template.contains(placeholder) {
            warn!("Launch4J template has no {} placeholder", placeholder);
        }
    }
    template
        .replace(JAR_PLACEHOLDER, &format!("<jar>{}</jar>", jar.display()))
        .replace(OUTFILE_PLACEHOLDER, &format!("<outfile>{}</outfile>", exe.display()))
}

/// Wraps the fat jar into a Windows executable with launch4jc.
pub fn create_windows_executable(cfg: &Config, layout: &BuildLayout) -> Result<PathBuf> {
    let jar = layout.fat_jar();
    if !jar.is_file() {
        return Err(anyhow!("Fat jar {} not found; run the fat-jar stage first", jar.display()));
    }
    let template = fs::read_to_string(&cfg.launch4j_config).with_context(|| {
        format!("Failed to read Launch4J template {}", cfg.launch4j_config.display())
    })?;

    let exe = layout.executable();
    let config = layout.launch4j_config();
    jrepack_core::ensure_dir(&layout.executable_dir())?;
    fs::write(&config, render_launch4j_config(&template, &jar, &exe))
        .with_context(|| format!("Failed to write {}", config.display()))?;
    info!("Prepared Launch4J config at {}", config.display());

    Tool::new(cfg.launch4j_home()?.join("launch4jc")).arg(&config).run()?;
    Ok(exe)
}

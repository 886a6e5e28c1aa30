use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use jrepack_core::{ModuleListWriter, Tool};

use crate::{config::Config, layout::BuildLayout};

/// Runs jdeps on the fat jar and writes the filtered module list.
pub fn determine_jar_dependencies(cfg: &Config, layout: &BuildLayout) -> Result<PathBuf> {
    let jar = layout.fat_jar();
    if !jar.is_file() {
        return Err(anyhow!("Fat jar {} not found; run the fat-jar stage first", jar.display()));
    }
    let jdeps = Tool::new(cfg.linux_jdk()?.join("bin").join("jdeps")).arg(&jar);
    write_module_list(&jdeps, &layout.dependencies_file())
}

/// Streams the tool's stdout through the module collector into `output`.
pub fn write_module_list(tool: &Tool, output: &Path) -> Result<PathBuf> {
    if let Some(parent) = output.parent() {
        jrepack_core::ensure_dir(parent)?;
    }
    let file =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = ModuleListWriter::new(BufWriter::new(file));
    tool.run_streaming(&mut writer)?;

    let count = writer.module_count();
    writer.into_inner().flush()?;
    if count == 0 {
        warn!("No java.* modules found in the analyzer output");
    }
    info!("Found {} runtime modules, written to {}", count, output.display());
    Ok(output.to_path_buf())
}

/// Reads the comma-separated module list produced by the dependency stage.
pub fn read_module_list(path: &Path) -> Result<String> {
    let modules = fs::read_to_string(path).with_context(|| {
        format!("Failed to read {}; run the jar-dependencies stage first", path.display())
    })?;
    if modules.is_empty() {
        return Err(anyhow!("Module list {} is empty", path.display()));
    }
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_write_module_list_from_tool_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("jar-dependencies/dependencies.txt");
        let tool = Tool::new("sh").args([
            "-c",
            "printf 'app.jar -> java.base\\napp.jar -> java.desktop\\n   p -> java.io   java.base\\n'",
        ]);

        write_module_list(&tool, &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "java.base,java.desktop");
        assert_eq!(read_module_list(&output).unwrap(), "java.base,java.desktop");
    }

    #[cfg(unix)]
    #[test]
    fn test_output_is_truncated_each_run() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("dependencies.txt");
        fs::write(&output, "java.sql,java.xml,java.logging").unwrap();

        let tool = Tool::new("sh").args(["-c", "printf 'a -> java.base\\n'"]);
        write_module_list(&tool, &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "java.base");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_analyzer_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let tool = Tool::new("sh").args(["-c", "exit 2"]);
        assert!(write_module_list(&tool, &temp_dir.path().join("deps.txt")).is_err());
    }

    #[test]
    fn test_empty_module_list_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dependencies.txt");
        fs::write(&path, "").unwrap();
        assert!(read_module_list(&path).unwrap_err().to_string().contains("is empty"));
        assert!(read_module_list(&temp_dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_requires_fat_jar() {
        let temp_dir = TempDir::new().unwrap();
        let cfg = test_config(temp_dir.path());
        let layout = BuildLayout::from_config(&cfg).unwrap();
        let err = determine_jar_dependencies(&cfg, &layout).unwrap_err();
        assert!(err.to_string().contains("fat-jar"));
    }
}

use anyhow::{Context, Result};
use log::{debug, info};
use std::{fs, path::PathBuf, time::Instant};

use crate::{
    archive, bundle,
    config::Config,
    deps, jar, launcher,
    layout::BuildLayout,
    plan::{Stage, plan},
    runtime,
    types::{BuildReport, Platform, StageReport},
};

/// Runs `target` and, unless `only` is set, every stage it depends on.
pub fn run_build(mut cfg: Config, target: Stage, only: bool) -> Result<BuildReport> {
    info!("Starting build of {}", target);

    cfg.initialize()?;
    let layout = BuildLayout::from_config(&cfg)?;
    let stages = if only { vec![target] } else { plan(target) };
    debug!("Stage order: {:?}", stages);

    let mut report = BuildReport::default();
    for stage in stages {
        info!("> {}", stage);
        let start = Instant::now();
        let outputs = run_stage(&cfg, &layout, stage)
            .with_context(|| format!("Stage {} failed", stage))?;

        if stage == Stage::JarDependencies {
            report.modules = Some(module_summary(&layout)?);
        }
        report.stages.push(StageReport {
            stage,
            outputs,
            elapsed_ms: start.elapsed().as_millis(),
        });
    }

    info!("Build of {} complete ({} stages)", target, report.stages.len());
    Ok(report)
}

fn module_summary(layout: &BuildLayout) -> Result<String> {
    let path = layout.dependencies_file();
    fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run_stage(cfg: &Config, layout: &BuildLayout, stage: Stage) -> Result<Vec<PathBuf>> {
    let output = match stage {
        Stage::FatJar => jar::build_fat_jar(cfg, layout)?,
        Stage::JarDependencies => deps::determine_jar_dependencies(cfg, layout)?,
        Stage::LinuxRuntime => runtime::create_runtime(cfg, layout, Platform::Linux)?,
        Stage::WindowsRuntime => runtime::create_runtime(cfg, layout, Platform::Windows)?,
        Stage::WindowsExecutable => launcher::create_windows_executable(cfg, layout)?,
        Stage::PrepareWindows => bundle::prepare_windows(layout)?,
        Stage::WindowsZip => archive::package(layout, Platform::Windows)?,
        Stage::PrepareLinux => bundle::prepare_linux(layout)?,
        Stage::LinuxTar => archive::package(layout, Platform::Linux)?,
        Stage::PackageAll => return Ok(Vec::new()),
    };
    Ok(vec![output])
}

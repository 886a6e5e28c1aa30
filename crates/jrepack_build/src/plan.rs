use clap::ValueEnum;
use log::trace;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Merge the application and its dependency jars
    FatJar,
    /// Ask jdeps which platform modules the fat jar needs
    JarDependencies,
    LinuxRuntime,
    WindowsRuntime,
    /// Wrap the fat jar with Launch4J
    WindowsExecutable,
    PrepareWindows,
    WindowsZip,
    PrepareLinux,
    LinuxTar,
    /// Build both distributable archives
    PackageAll,
}

impl Stage {
    pub const ALL: [Stage; 10] = [
        Stage::FatJar,
        Stage::JarDependencies,
        Stage::LinuxRuntime,
        Stage::WindowsRuntime,
        Stage::WindowsExecutable,
        Stage::PrepareWindows,
        Stage::WindowsZip,
        Stage::PrepareLinux,
        Stage::LinuxTar,
        Stage::PackageAll,
    ];

    pub fn depends_on(self) -> &'static [Stage] {
        match self {
            Stage::FatJar => &[],
            Stage::JarDependencies => &[Stage::FatJar],
            Stage::LinuxRuntime | Stage::WindowsRuntime => &[Stage::JarDependencies],
            Stage::WindowsExecutable => &[Stage::FatJar],
            Stage::PrepareWindows => &[Stage::WindowsExecutable, Stage::WindowsRuntime],
            Stage::WindowsZip => &[Stage::PrepareWindows],
            Stage::PrepareLinux => &[Stage::LinuxRuntime, Stage::FatJar],
            Stage::LinuxTar => &[Stage::PrepareLinux],
            Stage::PackageAll => &[Stage::WindowsZip, Stage::LinuxTar],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::FatJar => "fat-jar",
            Stage::JarDependencies => "jar-dependencies",
            Stage::LinuxRuntime => "linux-runtime",
            Stage::WindowsRuntime => "windows-runtime",
            Stage::WindowsExecutable => "windows-executable",
            Stage::PrepareWindows => "prepare-windows",
            Stage::WindowsZip => "windows-zip",
            Stage::PrepareLinux => "prepare-linux",
            Stage::LinuxTar => "linux-tar",
            Stage::PackageAll => "package-all",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Orders `target` and everything it depends on so that each stage comes after
/// all of its dependencies. Every stage appears once.
pub fn plan(target: Stage) -> Vec<Stage> {
    let mut order = Vec::new();
    visit(target, &mut order);
    trace!("Planned {:?}", order);
    order
}

fn visit(stage: Stage, order: &mut Vec<Stage>) {
    if order.contains(&stage) {
        return;
    }
    for &dep in stage.depends_on() {
        visit(dep, order);
    }
    order.push(stage);
}

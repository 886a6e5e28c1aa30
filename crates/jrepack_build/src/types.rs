use serde::Serialize;
use std::{fmt, path::PathBuf};

use crate::plan::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Windows,
}

impl Platform {
    pub fn dir_name(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    /// Files and directories the stage produced
    pub outputs: Vec<PathBuf>,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub stages: Vec<StageReport>,
    /// Module list handed to jlink, when the dependency stage ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<String>,
}

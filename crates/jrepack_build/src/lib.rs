//! Packaging stages for Java desktop applications.
//!
//! This crate turns a compiled application into distributable archives: a fat jar,
//! minimized Linux and Windows runtimes linked from the modules `jdeps` reports, a
//! Launch4J executable, and `.tar.gz`/`.zip` bundles. Stages form a small
//! dependency graph and run sequentially; the first failure aborts the build.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//! use jrepack_build::{Config, Stage, run_build};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::parse_from([
//!     "build",
//!     "--app",
//!     "build/classes/java/main",
//!     "--main-class",
//!     "moe.mewore.saverabbit.SaveRabbit",
//! ]);
//!
//! let report = run_build(cfg, Stage::PackageAll, false)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! jrepack_build::print_report(&mut stdout, &report)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod archive;
mod bundle;
mod config;
mod deps;
mod jar;
mod launcher;
mod layout;
mod pipeline;
mod plan;
mod reporter;
mod runtime;
mod types;

// Re-export public API
pub use config::Config;
pub use layout::BuildLayout;
pub use pipeline::run_build;
pub use plan::{Stage, plan};
pub use reporter::{print_plan, print_report, print_report_json};
pub use types::{BuildReport, Platform, StageReport};

//! Core utilities for jrepack.
//!
//! This crate provides the pieces the build stages share:
//! - Filtering `jdeps` output into a `jlink` module list
//! - Running external tools and streaming their output
//! - Copying and cleaning build directories
//! - Resolving toolchain locations from flags and the environment

pub mod constants;
mod fs;
mod modules;
mod tool;
mod toolchain;

// Re-export public API
pub use fs::{
    copy_dir_filtered, copy_file_into, ensure_dir, is_read_write, remove_dir, set_executable,
};
pub use modules::{
    ByteClass, ModuleCollector, ModuleListWriter, ScanState, classify, collect_modules, step,
};
pub use tool::Tool;
pub use toolchain::{find_project_root, require_env, resolve_tool_home, tool_home};

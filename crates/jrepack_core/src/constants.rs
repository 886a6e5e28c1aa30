//! Fixed names shared by the collector and the build stages.
//!
//! ## Toolchain fallbacks
//!
//! When no explicit path (flag or environment variable) is given, each toolchain
//! is looked up under `$HOME`:
//!
//! - Linux JDK: `~/.jdks/jdk-lin64`
//! - Windows JDK: `~/.jdks/jdk-win64`
//! - Launch4J: `~/.jdks/launch4j`

/// Only module names starting with this prefix are handed to the runtime linker
pub const MODULE_PREFIX: &[u8] = b"java.";

/// Separator placed between module names in the dependency list
pub const MODULE_SEPARATOR: u8 = b',';

pub const LINUX_JDK_FALLBACK: &str = ".jdks/jdk-lin64";
pub const WINDOWS_JDK_FALLBACK: &str = ".jdks/jdk-win64";
pub const LAUNCH4J_FALLBACK: &str = ".jdks/launch4j";

/// Files whose presence marks the project root (checked in order)
pub const PROJECT_MARKERS: &[&str] = &[
    ".git",                // repository root
    "launch4j-config.xml", // executable wrapper template
];

/// Entries of dependency jars that never make it into the fat jar
pub const EXCLUDED_DEPENDENCY_FILES: &[&str] = &["about.html"];
pub const EXCLUDED_DEPENDENCY_DIRS: &[&str] = &["META-INF/"];

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

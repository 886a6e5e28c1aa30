//! Reduces `jdeps` output to the comma-separated module list `jlink` expects.
//!
//! `jdeps` prints one dependency per line with a variable amount of leading text:
//!
//! ```text
//! app.jar -> java.base
//! app.jar -> java.desktop
//!    moe.mewore.saverabbit      -> java.awt       java.desktop
//! ```
//!
//! Only the last whitespace-delimited field of each line is a candidate, and only
//! candidates in the `java.` namespace are kept. The scan runs one byte at a time
//! so it can sit directly on the analyzer's stdout.

use log::trace;
use std::{
    collections::HashSet,
    io::{self, Write},
};

use crate::constants::{MODULE_PREFIX, MODULE_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    LineEnd,
    Blank,
    Other,
}

pub fn classify(byte: u8) -> ByteClass {
    match byte {
        b'\n' => ByteClass::LineEnd,
        b' ' | b'\t' => ByteClass::Blank,
        _ => ByteClass::Other,
    }
}

/// Tokenizer state between two bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanState {
    /// Nothing accumulated since the last blank or line end
    #[default]
    Idle,
    Accumulating(Vec<u8>),
}

/// Advances the tokenizer by one byte.
///
/// Returns the finished candidate when `byte` ends a line that has a non-empty
/// trailing field. Blanks discard whatever was accumulated.
pub fn step(state: ScanState, byte: u8) -> (ScanState, Option<Vec<u8>>) {
    match (classify(byte), state) {
        (ByteClass::LineEnd, ScanState::Accumulating(token)) => (ScanState::Idle, Some(token)),
        (ByteClass::LineEnd, ScanState::Idle) | (ByteClass::Blank, _) => (ScanState::Idle, None),
        (ByteClass::Other, ScanState::Idle) => (ScanState::Accumulating(vec![byte]), None),
        (ByteClass::Other, ScanState::Accumulating(mut token)) => {
            token.push(byte);
            (ScanState::Accumulating(token), None)
        }
    }
}

/// Deduplicating module filter fed one byte at a time.
#[derive(Debug, Default)]
pub struct ModuleCollector {
    state: ScanState,
    seen: HashSet<Vec<u8>>,
    emitted_any: bool,
}

impl ModuleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one byte and returns the bytes to append to the output, if any.
    ///
    /// An unterminated last line is never evaluated; there is no flush.
    pub fn process(&mut self, byte: u8) -> Option<Vec<u8>> {
        let (next, candidate) = step(std::mem::take(&mut self.state), byte);
        self.state = next;

        let name = candidate?;
        if !name.starts_with(MODULE_PREFIX) {
            trace!("Ignoring non-platform token: {}", String::from_utf8_lossy(&name));
            return None;
        }
        if self.seen.contains(&name) {
            return None;
        }

        trace!("Collected module: {}", String::from_utf8_lossy(&name));
        let mut out = Vec::with_capacity(name.len() + 1);
        if self.emitted_any {
            out.push(MODULE_SEPARATOR);
        }
        out.extend_from_slice(&name);
        self.seen.insert(name);
        self.emitted_any = true;
        Some(out)
    }

    /// Number of distinct modules emitted so far
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// `io::Write` adapter that runs everything written through a [`ModuleCollector`].
pub struct ModuleListWriter<W: Write> {
    collector: ModuleCollector,
    sink: W,
}

impl<W: Write> ModuleListWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { collector: ModuleCollector::new(), sink }
    }

    pub fn module_count(&self) -> usize {
        self.collector.len()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> Write for ModuleListWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            if let Some(out) = self.collector.process(byte) {
                self.sink.write_all(&out)?;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

/// Runs a whole buffer through a fresh collector.
pub fn collect_modules(input: &[u8]) -> String {
    let mut writer = ModuleListWriter::new(Vec::new());
    // Writing into a Vec cannot fail
    let _ = writer.write_all(input);
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

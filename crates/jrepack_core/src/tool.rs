use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::{
    ffi::{OsStr, OsString},
    fmt, io,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

/// A single invocation of an external command-line tool.
#[derive(Debug, Clone)]
pub struct Tool {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Tool {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self { program: program.as_ref().to_os_string(), args: Vec::new(), cwd: None }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Runs the tool with inherited stdio and fails on a non-zero exit.
    pub fn run(&self) -> Result<()> {
        info!("Running {}", self);
        let status = self
            .command()
            .status()
            .with_context(|| format!("Failed to launch '{}'", self.program.to_string_lossy()))?;
        if !status.success() {
            bail!("{} failed with {}", self, status);
        }
        debug!("{} finished", self.program.to_string_lossy());
        Ok(())
    }

    /// Runs the tool and streams its stdout into `sink` as it is produced.
    ///
    /// Stderr stays attached to the terminal. Returns the number of bytes read.
    pub fn run_streaming<W: Write>(&self, sink: &mut W) -> Result<u64> {
        info!("Running {}", self);
        let mut child = self
            .command()
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to launch '{}'", self.program.to_string_lossy()))?;

        let streamed = match child.stdout.take() {
            Some(mut stdout) => io::copy(&mut stdout, sink),
            None => Ok(0),
        }
        .and_then(|n| sink.flush().map(|()| n));
        let copied = match streamed {
            Ok(n) => n,
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(err).with_context(|| format!("Failed to read output of {}", self));
            }
        };

        let status = child.wait().with_context(|| format!("Failed to wait for {}", self))?;
        if !status.success() {
            bail!("{} failed with {}", self, status);
        }
        debug!("{} produced {} bytes", self.program.to_string_lossy(), copied);
        Ok(copied)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " '{}'", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_every_word() {
        let tool = Tool::new("/opt/launch4j/launch4jc").arg("build/windows executable/config.xml");
        assert_eq!(
            tool.to_string(),
            "'/opt/launch4j/launch4jc' 'build/windows executable/config.xml'"
        );
    }

    #[test]
    fn test_missing_program_names_it() {
        let err = Tool::new("/nonexistent/bin/jdeps").run().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bin/jdeps"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_streaming_captures_stdout() {
        let mut out = Vec::new();
        let tool = Tool::new("sh").args(["-c", "printf 'a -> java.base\\n'"]);
        let n = tool.run_streaming(&mut out).unwrap();
        assert_eq!(n, 15);
        assert_eq!(out, b"a -> java.base\n".to_vec());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_an_error() {
        let err = Tool::new("sh").args(["-c", "exit 3"]).run().unwrap_err();
        assert!(err.to_string().contains("'sh' '-c' 'exit 3' failed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_streaming_non_zero_exit_is_an_error() {
        let mut out = Vec::new();
        let result = Tool::new("sh").args(["-c", "echo partial; exit 1"]).run_streaming(&mut out);
        assert!(result.is_err());
        assert_eq!(out, b"partial\n".to_vec());
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_sink_failure_stops_the_tool() {
        let start = std::time::Instant::now();
        let tool = Tool::new("sh").args(["-c", "echo java.base; exec sleep 30"]);
        let err = tool.run_streaming(&mut FullDisk).unwrap_err();

        assert!(err.to_string().starts_with("Failed to read output of 'sh'"));
        assert!(format!("{:#}", err).contains("no space left on device"));
        // The sleeping child is killed, not waited out
        assert!(start.elapsed() < std::time::Duration::from_secs(20));
    }

    #[cfg(unix)]
    #[test]
    fn test_current_dir_is_applied() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut out = Vec::new();
        Tool::new("pwd").current_dir(temp_dir.path()).run_streaming(&mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        let printed = Path::new(printed.trim()).canonicalize().unwrap();
        assert_eq!(printed, temp_dir.path().canonicalize().unwrap());
    }
}

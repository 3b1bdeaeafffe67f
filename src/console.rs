//! Human-facing status output.
//!
//! Everything the pipeline shows the operator goes through a [`Console`], so
//! quiet mode is decided in one place and tests can capture the text.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Status and error sink shared by the progress runner and the pipeline.
///
/// Status text goes to the output stream and is dropped in quiet mode.
/// Error lines and prompts always go out.
#[derive(Clone)]
pub struct Console {
    out: SharedWriter,
    err: SharedWriter,
    quiet: bool,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("quiet", &self.quiet)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Creates a console over arbitrary writers.
    pub fn new(
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
        quiet: bool,
    ) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
            err: Arc::new(Mutex::new(Box::new(err))),
            quiet,
        }
    }

    /// Console bound to the process stdout/stderr.
    #[must_use]
    pub fn stdio(quiet: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), quiet)
    }

    /// Returns true when status text is suppressed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Writes status text without a newline and flushes it.
    pub fn status(&self, text: &str) {
        if self.quiet {
            return;
        }
        write_flushed(&self.out, text.as_bytes());
    }

    /// Writes one status line.
    pub fn status_line(&self, line: &str) {
        if self.quiet {
            return;
        }
        write_flushed(&self.out, format!("{line}\n").as_bytes());
    }

    /// Writes a prompt to the output stream regardless of quiet mode.
    pub fn prompt(&self, text: &str) {
        write_flushed(&self.out, text.as_bytes());
    }

    /// Writes `Error: <message>` to the error stream regardless of quiet mode.
    pub fn error_line(&self, message: &str) {
        write_flushed(&self.err, format!("Error: {message}\n").as_bytes());
    }
}

fn write_flushed(writer: &SharedWriter, bytes: &[u8]) {
    let mut guard = writer.lock().unwrap_or_else(PoisonError::into_inner);
    // Status output is best effort; a closed stdout must not fail the run.
    let _ = guard.write_all(bytes);
    let _ = guard.flush();
}

/// Cloneable in-memory writer for capturing console output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&guard).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

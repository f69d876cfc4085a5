//! Diagnostic output sinks.
//!
//! Progress lines and everything a module passes to `print` are written to
//! one [`DiagnosticLog`]. The loader receives it as a collaborator, so tests
//! can swap in a [`MemoryLog`] and inspect exactly what was written.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// A sink for unstructured diagnostic lines.
pub trait DiagnosticLog: Send + Sync {
    /// Write one line.
    fn line(&self, line: &str);
}

/// Shared handle to a diagnostic sink.
pub type SharedLog = Arc<dyn DiagnosticLog>;

/// Writes each line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLog;

impl DiagnosticLog for ConsoleLog {
    fn line(&self, line: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        // A closed stdout is not a load failure.
        let _ = writeln!(handle, "{}", line);
    }
}

/// Forwards each line to `tracing` at INFO level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl DiagnosticLog for TracingLog {
    fn line(&self, line: &str) {
        tracing::info!(target: "bootwasm::diagnostic", "{}", line);
    }
}

/// Records lines in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of lines written so far.
    pub fn len(&self) -> usize {
        self.lines().len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of times `line` was written.
    pub fn count(&self, line: &str) -> usize {
        self.lines().iter().filter(|l| l.as_str() == line).count()
    }

    /// Index of the first occurrence of `line`.
    pub fn position(&self, line: &str) -> Option<usize> {
        self.lines().iter().position(|l| l == line)
    }
}

impl DiagnosticLog for MemoryLog {
    fn line(&self, line: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_string());
    }
}

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fire-and-forget console output used by the dispatcher's handlers.
//!
//! Diagnostics go through `tracing`; the console carries only the lines a
//! user of the workload is meant to read.

use std::io::Write;
use std::sync::Mutex;

/// Text sink.  Callers treat every write as successful.
pub trait ConsoleSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes each line to standard output.  Write errors are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl ConsoleSink for StdoutConsole {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
    }
}

/// Keeps every line in memory.  Used by tests and by callers that want to
/// inspect what the dispatcher produced.
#[derive(Debug, Default)]
pub struct BufferConsole {
    lines: Mutex<Vec<String>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ConsoleSink for BufferConsole {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_console_keeps_lines_in_order() {
        let console = BufferConsole::new();
        console.write_line("Working");
        console.write_line("HyperPeriod reached");
        assert_eq!(console.lines(), vec!["Working", "HyperPeriod reached"]);
    }
}

//! Shared fixtures for the integration tests

#![allow(dead_code)]
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use turbo::prelude::*;

/// In-memory console that can be inspected after logging
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A logging context writing into a temporary directory and an
/// in-memory console
pub struct TestLogging {
    pub dir: TempDir,
    pub console: SharedBuffer,
    pub context: LoggingContext,
}

impl TestLogging {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let console = SharedBuffer::default();
        let context = LoggingContext::new()
            .log_file(dir.path().join("test.log"))
            .console(ConsoleTarget::Writer(Box::new(console.clone())))
            .build()
            .expect("Failed to build the logging context");
        Self {
            dir,
            console,
            context,
        }
    }

    pub fn logger(&self) -> &slog::Logger {
        self.context.logger()
    }

    pub fn file_contents(&self) -> String {
        std::fs::read_to_string(self.context.log_path()).unwrap()
    }

    /// Lines of the log file written on the critical level
    pub fn critical_lines(&self) -> Vec<String> {
        self.file_contents()
            .lines()
            .filter(|line| line.contains("] CRITICAL ("))
            .map(str::to_owned)
            .collect()
    }

    /// Write `contents` to `name` inside the temporary directory
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        write_file(self.dir.path(), name, contents)
    }
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

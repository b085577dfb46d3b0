use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use slog::{o, Drain, Level, Logger};
use slog_async::AsyncGuard;
use slog_term::{Decorator, PlainDecorator, TermDecorator};

use crate::format::{ConsoleFormat, FileFormat};
use crate::prelude::*;

pub const DEFAULT_LOG_FILE: &str = "turbo.log";

/// Where the console sink writes to
pub enum ConsoleTarget {
    Stdout,
    Stderr,
    /// Any writer, printed without colors
    Writer(Box<dyn io::Write + Send>),
}

/// Owner of the root logger and its two sinks. Clones of [`Self::logger`]
/// are handed to every component that logs. Dropping the context flushes
/// records that are still queued.
pub struct LoggingContext {
    logger: Logger,
    log_path: PathBuf,
    _guard: Option<AsyncGuard>,
}

impl LoggingContext {
    pub fn new() -> LoggingContextBuilder {
        LoggingContextBuilder::default()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

pub struct LoggingContextBuilder {
    log_path: PathBuf,
    console: ConsoleTarget,
    file_level: Level,
    console_level: Level,
    asynchronous: bool,
}

impl Default for LoggingContextBuilder {
    fn default() -> Self {
        LoggingContextBuilder {
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            console: ConsoleTarget::Stderr,
            file_level: Level::Debug,
            console_level: Level::Info,
            asynchronous: false,
        }
    }
}

impl LoggingContextBuilder {
    pub fn log_file(self, path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: path.into(),
            ..self
        }
    }

    pub fn console(self, target: ConsoleTarget) -> Self {
        Self {
            console: target,
            ..self
        }
    }

    pub fn file_level(self, level: Level) -> Self {
        Self {
            file_level: level,
            ..self
        }
    }

    pub fn console_level(self, level: Level) -> Self {
        Self {
            console_level: level,
            ..self
        }
    }

    /// Hand records over to a background thread instead of writing them
    /// on the calling one
    pub fn asynchronous(self, enabled: bool) -> Self {
        Self {
            asynchronous: enabled,
            ..self
        }
    }

    /// Create (or truncate) the log file and assemble the root logger
    pub fn build(self) -> io::Result<LoggingContext> {
        let LoggingContextBuilder {
            log_path,
            console,
            file_level,
            console_level,
            asynchronous,
        } = self;

        let file = std::fs::File::create(&log_path)?;
        let file_drain = FileFormat::new(PlainDecorator::new(file)).filter_level(file_level);
        let sinks = Sinks {
            console_level,
            asynchronous,
        };

        let (logger, guard) = match console {
            ConsoleTarget::Stdout => {
                sinks.assemble(file_drain, TermDecorator::new().stdout().build())
            }
            ConsoleTarget::Stderr => {
                sinks.assemble(file_drain, TermDecorator::new().stderr().build())
            }
            ConsoleTarget::Writer(writer) => sinks.assemble(file_drain, PlainDecorator::new(writer)),
        };

        debug!(logger, "Logger initialised";
            "file" => %log_path.display(),
            "file_level" => file_level.as_str(),
            "console_level" => console_level.as_str(),
        );

        Ok(LoggingContext {
            logger,
            log_path,
            _guard: guard,
        })
    }
}

struct Sinks {
    console_level: Level,
    asynchronous: bool,
}

impl Sinks {
    fn assemble<F, D>(&self, file_drain: F, decorator: D) -> (Logger, Option<AsyncGuard>)
    where
        F: Drain<Ok = Option<()>, Err = io::Error> + Send + 'static,
        D: Decorator + Send + 'static,
    {
        let console_drain = ConsoleFormat::new(decorator).filter_level(self.console_level);
        let drain = slog::Duplicate::new(file_drain, console_drain).fuse();

        if self.asynchronous {
            let (drain, guard) = slog_async::Async::new(drain).build_with_guard();
            (Logger::root(drain.fuse(), o!()), Some(guard))
        } else {
            let drain = Mutex::new(drain).fuse();
            (Logger::root(drain, o!()), None)
        }
    }
}

/// Dual sink logger writing everything from debug up to `log_path` and
/// info and above to the colored terminal
pub fn configure_dual_root(log_path: impl Into<PathBuf>) -> io::Result<LoggingContext> {
    LoggingContext::new().log_file(log_path).build()
}

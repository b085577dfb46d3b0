//! Record layouts of the two log sinks

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use slog::{Drain, Level, OwnedKVList, Record, KV};
use slog_term::{Decorator, RecordDecorator};

const FILE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Critical => "CRITICAL",
        Level::Error => "ERROR",
        Level::Warning => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Only the file name, `record.file()` carries the whole source path
fn short_file(record: &Record) -> &'static str {
    let file = record.file();
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

fn write_location(d: &mut dyn RecordDecorator, record: &Record) -> io::Result<()> {
    write!(
        d,
        "({} L{}, {})",
        short_file(record),
        record.line(),
        record.module()
    )
}

/// Appends the record's and the logger's key-value pairs as
/// `, key: value`
struct KvWriter<'a> {
    decorator: &'a mut dyn RecordDecorator,
}

impl<'a> slog::Serializer for KvWriter<'a> {
    fn emit_arguments(&mut self, key: slog::Key, val: &fmt::Arguments) -> slog::Result {
        self.decorator.start_comma()?;
        write!(self.decorator, ", ")?;
        self.decorator.start_key()?;
        write!(self.decorator, "{}", key)?;
        self.decorator.start_separator()?;
        write!(self.decorator, ": ")?;
        self.decorator.start_value()?;
        write!(self.decorator, "{}", val)?;
        Ok(())
    }
}

fn write_kv(d: &mut dyn RecordDecorator, record: &Record, values: &OwnedKVList) -> io::Result<()> {
    let mut serializer = KvWriter { decorator: d };
    record.kv().serialize(record, &mut serializer)?;
    values.serialize(record, &mut serializer)?;
    Ok(())
}

/// Persistent sink layout:
/// `[timestamp] LEVEL (file Lline, module): message, key: value`
pub struct FileFormat<D: Decorator> {
    decorator: D,
}

impl<D: Decorator> FileFormat<D> {
    pub fn new(decorator: D) -> Self {
        Self { decorator }
    }
}

impl<D: Decorator> Drain for FileFormat<D> {
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record, values: &OwnedKVList) -> io::Result<()> {
        self.decorator.with_record(record, values, |d| {
            d.start_timestamp()?;
            write!(d, "[{}]", chrono::Local::now().format(FILE_TIMESTAMP))?;
            d.start_whitespace()?;
            write!(d, " ")?;
            d.start_level()?;
            write!(d, "{}", level_name(record.level()))?;
            d.start_whitespace()?;
            write!(d, " ")?;
            d.reset()?;
            write_location(d, record)?;
            write!(d, ":")?;
            d.start_whitespace()?;
            write!(d, " ")?;
            d.start_msg()?;
            write!(d, "{}", record.msg())?;
            write_kv(d, record, values)?;
            d.reset()?;
            writeln!(d)?;
            d.flush()
        })
    }
}

/// Terminal sink layout. Info and below print the bare message in the
/// level's color, warnings and worse also name the level and the source
/// location.
pub struct ConsoleFormat<D: Decorator> {
    decorator: D,
}

impl<D: Decorator> ConsoleFormat<D> {
    pub fn new(decorator: D) -> Self {
        Self { decorator }
    }
}

impl<D: Decorator> Drain for ConsoleFormat<D> {
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record, values: &OwnedKVList) -> io::Result<()> {
        self.decorator.with_record(record, values, |d| {
            if record.level().is_at_least(Level::Warning) {
                d.start_level()?;
                write!(d, "{} ", level_name(record.level()))?;
                write_location(d, record)?;
                write!(d, ":")?;
                d.start_whitespace()?;
                write!(d, " ")?;
                d.start_msg()?;
            } else {
                d.start_level()?;
            }
            write!(d, "{}", record.msg())?;
            write_kv(d, record, values)?;
            d.reset()?;
            writeln!(d)?;
            d.flush()
        })
    }
}

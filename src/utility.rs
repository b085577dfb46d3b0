use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use slog::Logger;
use thiserror::Error;

use crate::prelude::*;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Load a JSON document
pub fn load_json<T>(file_path: impl AsRef<Path>) -> Result<T, DocumentError>
where
    T: DeserializeOwned,
{
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Write `value` as JSON, replacing whatever the file held before
pub fn dump_json<T>(file_path: impl AsRef<Path>, value: &T) -> Result<(), DocumentError>
where
    T: Serialize + ?Sized,
{
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// YAML documents that are allowed to be absent or broken. Failures are
/// logged on the critical level and reported as `None`.
pub struct Yaml;

impl Yaml {
    pub fn parse(file_path: impl AsRef<Path>, logger: &Logger) -> Option<serde_yaml::Value> {
        Self::parse_as(file_path, logger)
    }

    /// Same as [`Yaml::parse`] but deserializes into `T`. An empty
    /// document becomes `T`'s representation of null.
    pub fn parse_as<T>(file_path: impl AsRef<Path>, logger: &Logger) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let file_path = file_path.as_ref();
        let contents = match std::fs::read_to_string(file_path) {
            Ok(contents) => contents,
            Err(why) if why.kind() == io::ErrorKind::NotFound => {
                crit!(logger, "Problem opening {}: File was not found", file_path.display());
                return None;
            }
            Err(why) => {
                crit!(logger, "Problem opening {}: {}", file_path.display(), why);
                return None;
            }
        };

        let parsed = if is_blank_document(&contents) {
            serde_yaml::from_value(serde_yaml::Value::Null)
        } else {
            serde_yaml::from_str(&contents)
        };
        match parsed {
            Ok(document) => {
                debug!(logger, "Parsed YAML document"; "path" => %file_path.display());
                Some(document)
            }
            Err(why) => {
                crit!(logger, "Problem parsing {} as YAML: {}", file_path.display(), why);
                None
            }
        }
    }
}

/// Nothing but whitespace, comments and document markers
fn is_blank_document(contents: &str) -> bool {
    contents.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

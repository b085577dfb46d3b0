use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use slog::Logger;
use thiserror::Error;

use crate::prelude::*;
use crate::source::ConfigSource;

pub const PACKAGE_VERSION: &'static str = std::env!("CARGO_PKG_VERSION");

/// Failures while turning a configuration file into settings. Every
/// variant is fatal for the application.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse the configuration: {0}")]
    Parse(#[from] ini::ParseError),

    #[error("option '{key}' appears before any section header")]
    MissingSectionHeader { key: String },

    #[error("section [{0}] is defined more than once")]
    DuplicateSection(String),

    #[error("option '{key}' in section [{section}] is defined more than once")]
    DuplicateKey { section: String, key: String },

    #[error("[{section}] {key} = '{value}' is not a valid {expected}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("You must provide a token in the config")]
    MissingToken,
}

/// Bot settings, flattened from the `[Auth]`, `[General]`, `[Database]`
/// and `[Advanced]` sections. Only obtainable through validation, so the
/// token is never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    // [Auth]
    token: String,
    pub password: Option<String>,

    // [General]
    pub selfbot: bool,
    pub allow_pms: bool,
    pub prefix: String,
    pub delete: bool,

    // [Database]
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,

    // [Advanced]
    pub no_database: bool,
    pub read_aliases: bool,
    pub selfbot_message_edit: bool,
    pub db_table_tags: String,
    pub discrim_revert: bool,
    pub backup_tags: bool,
}

impl Config {
    /// Load and validate the settings stored at `path`. Failures are
    /// reported on the critical level before being returned.
    pub fn load(path: impl AsRef<Path>, logger: &Logger) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = read_source(path).and_then(|source| Self::from_source(&source));

        match config {
            Ok(config) => {
                debug!(logger, "Loaded configuration"; "path" => %path.display());
                Ok(config)
            }
            Err(why) => {
                crit!(logger, "{}", why; "path" => %path.display());
                Err(why)
            }
        }
    }

    /// Extract every field from an already parsed source and validate
    /// the result. Missing options take their fallback value.
    pub fn from_source(src: &ConfigSource) -> Result<Self, ConfigError> {
        let token = src.get_opt_str("Auth", "Token");
        ensure_token(token.as_deref())?;

        let config = Self {
            token: token.unwrap_or_default(),
            password: src.get_opt_str("Auth", "Password"),

            selfbot: src.get_bool("General", "Selfbot", false)?,
            allow_pms: src.get_bool("General", "AllowPms", true)?,
            prefix: src.get_str("General", "Prefix", "!"),
            delete: src.get_bool("General", "Delete", true)?,

            db_host: src.get_str("Database", "Host", "localhost"),
            db_port: src.get_int("Database", "Port", 28015)?,
            db_user: src.get_str("Database", "User", "admin"),
            db_password: src.get_str("Database", "Password", ""),
            db_name: src.get_str("Database", "Name", "turbo"),

            no_database: src.get_bool("Advanced", "NoDatabase", false)?,
            read_aliases: src.get_bool("Advanced", "ReadAliases", true)?,
            selfbot_message_edit: src.get_bool("Advanced", "SelfbotMessageEdit", true)?,
            db_table_tags: src.get_str("Advanced", "DbTable_Tags", "tags"),
            discrim_revert: src.get_bool("Advanced", "DiscrimRevert", true)?,
            backup_tags: src.get_bool("Advanced", "BackupTags", true)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check option values that have no usable fallback
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_token(Some(&self.token))
    }

    /// The validated API token
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    /// Parse and validate settings from INI text
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_source(&text.parse::<ConfigSource>()?)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("password", &redacted(&self.password))
            .field("selfbot", &self.selfbot)
            .field("allow_pms", &self.allow_pms)
            .field("prefix", &self.prefix)
            .field("delete", &self.delete)
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("no_database", &self.no_database)
            .field("read_aliases", &self.read_aliases)
            .field("selfbot_message_edit", &self.selfbot_message_edit)
            .field("db_table_tags", &self.db_table_tags)
            .field("discrim_revert", &self.discrim_revert)
            .field("backup_tags", &self.backup_tags)
            .finish()
    }
}

/// Settings of the reduced configuration format, which only knows
/// about `[Auth].Token`
#[derive(Clone, PartialEq, Eq)]
pub struct TokenConfig {
    token: String,
}

impl TokenConfig {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn load(path: impl AsRef<Path>, logger: &Logger) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let token = read_source(path).and_then(|source| {
            let token = source.get_opt_str("Auth", "Token");
            ensure_token(token.as_deref()).map(|_| token.unwrap_or_default())
        });

        match token {
            Ok(token) => {
                debug!(logger, "Loaded configuration"; "path" => %path.display());
                Ok(Self { token })
            }
            Err(why) => {
                crit!(logger, "{}", why; "path" => %path.display());
                Err(why)
            }
        }
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("token", &"<redacted>")
            .finish()
    }
}

fn read_source(path: &Path) -> Result<ConfigSource, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    ConfigSource::read(path)
}

fn ensure_token(token: Option<&str>) -> Result<(), ConfigError> {
    match token {
        Some(token) if !token.is_empty() => Ok(()),
        _ => Err(ConfigError::MissingToken),
    }
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}

const TEMPLATE: &str = r#"; turbo configuration
; Every option except Token may be omitted, the value shown is its default.

[Auth]
; Bot account token, required
Token =
; Account password, only needed for selfbots
;Password =

[General]
Selfbot = no
AllowPms = yes
Prefix = !
Delete = yes

[Database]
Host = localhost
Port = 28015
User = admin
Password =
Name = turbo

[Advanced]
NoDatabase = no
ReadAliases = yes
SelfbotMessageEdit = yes
DbTable_Tags = tags
DiscrimRevert = yes
BackupTags = yes
"#;

/// Write a commented configuration template to `cfg_path`. An existing
/// file is never overwritten.
pub fn write_template(cfg_path: impl AsRef<Path>) -> UResult {
    let cfg_path = cfg_path.as_ref();
    if let Some(parent) = cfg_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(cfg_path)?;
    write!(file, "{}", TEMPLATE)?;
    Ok(())
}

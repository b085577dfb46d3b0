use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;

use ini::{Ini, ParseOption};

use crate::config::ConfigError;

/// Section whose values are visible from every other section
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Parsed contents of an INI-style configuration file.
///
/// Section names are matched exactly, option names ignore ASCII case.
/// Lookups into an existing section fall back to the `[DEFAULT]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl ConfigSource {
    /// Read and parse the file at `path`
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Raw value of an option, `None` when the section or the option
    /// is missing
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let props = self.sections.get(section)?;
        let key = key.to_ascii_lowercase();
        props
            .get(&key)
            .or_else(|| {
                self.sections
                    .get(DEFAULT_SECTION)
                    .and_then(|defaults| defaults.get(&key))
            })
            .map(String::as_str)
    }

    pub fn get_str(&self, section: &str, key: &str, fallback: &str) -> String {
        self.get(section, key).unwrap_or(fallback).to_owned()
    }

    pub fn get_opt_str(&self, section: &str, key: &str) -> Option<String> {
        self.get(section, key).map(str::to_owned)
    }

    pub fn get_bool(&self, section: &str, key: &str, fallback: bool) -> Result<bool, ConfigError> {
        match self.get(section, key) {
            None => Ok(fallback),
            Some(raw) => parse_bool(raw).ok_or_else(|| invalid(section, key, raw, "boolean")),
        }
    }

    pub fn get_int<T>(&self, section: &str, key: &str, fallback: T) -> Result<T, ConfigError>
    where
        T: FromStr,
    {
        match self.get(section, key) {
            None => Ok(fallback),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|_| invalid(section, key, raw, "integer")),
        }
    }
}

impl FromStr for ConfigSource {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            enabled_indented_mutiline_value: true,
            ..Default::default()
        };
        let ini = Ini::load_from_str_opt(text, opt)?;

        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut seen = BTreeSet::new();
        for (name, props) in ini.iter() {
            let name = match name {
                Some(name) => name,
                None => match props.iter().next() {
                    Some((key, _)) => {
                        return Err(ConfigError::MissingSectionHeader {
                            key: key.to_owned(),
                        })
                    }
                    None => continue,
                },
            };
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateSection(name.to_owned()));
            }

            let options = sections.entry(name.to_owned()).or_default();
            for (key, value) in props.iter() {
                match options.entry(key.to_ascii_lowercase()) {
                    Entry::Vacant(slot) => {
                        slot.insert(value.to_owned());
                    }
                    Entry::Occupied(_) => {
                        return Err(ConfigError::DuplicateKey {
                            section: name.to_owned(),
                            key: key.to_owned(),
                        })
                    }
                }
            }
        }
        Ok(Self { sections })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(section: &str, key: &str, raw: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_owned(),
        key: key.to_owned(),
        value: raw.to_owned(),
        expected,
    }
}

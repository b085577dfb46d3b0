//! Configuration loading and logging bootstrap of the turbo chat bot

pub mod config;
pub mod format;
pub mod logger;
pub mod prelude;
pub mod source;
pub mod utility;

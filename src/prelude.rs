/// Универсальное возвращаемое значение с возможностью типизирования параметра
pub type UResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use crate::config::{Config, ConfigError, TokenConfig};
pub use crate::logger::*;
pub use crate::source::ConfigSource;
pub use crate::utility::*;
pub use slog::{crit, debug, error, info, o, warn};

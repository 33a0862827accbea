pub mod config;
pub mod error;

pub use config::{Config, ConfigError, ConfigSeverity};
pub use error::{Error, Result};

pub mod config;
pub mod error;
pub mod logging;
pub mod transcript;

pub use config::{Config, ConfigError, FileLoggingConfig, HistoryConfig, LoggingConfig, ProviderConfig};
pub use error::{Error, ProviderError, Result};
pub use transcript::{Role, Transcript, Turn};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "palaver.toml";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variables consulted after the file is parsed
pub const ENV_API_KEY: &str = "PALAVER_API_KEY";
pub const ENV_MODEL: &str = "PALAVER_MODEL";
pub const ENV_MAX_TOKENS: &str = "PALAVER_MAX_TOKENS";
pub const ENV_TEMPERATURE: &str = "PALAVER_TEMPERATURE";
pub const ENV_DB_FILE: &str = "PALAVER_DB_FILE";

/// Completion provider selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// OpenAI-compatible chat completions endpoint
    #[serde(rename = "openai")]
    OpenAi {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        model: String,
        #[serde(default = "default_openai_base_url")]
        base_url: String,
        #[serde(default)]
        max_tokens: Option<u32>,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    /// Scripted replies for offline use
    Mock {
        #[serde(default)]
        responses_file: Option<PathBuf>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

fn default_openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderConfig::OpenAi { .. } => "openai",
            ProviderConfig::Mock { .. } => "mock",
        }
    }

    /// Upper bound on a single completion; `None` waits indefinitely
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            ProviderConfig::OpenAi { timeout_secs, .. } | ProviderConfig::Mock { timeout_secs, .. } => {
                timeout_secs.map(Duration::from_secs)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let timeout_secs = match self {
            ProviderConfig::OpenAi { api_key, model, temperature, timeout_secs, .. } => {
                if api_key.trim().is_empty() {
                    return Err(ConfigError::Missing(format!("provider.api_key (or {ENV_API_KEY})")).into());
                }
                if model.trim().is_empty() {
                    return Err(ConfigError::Missing(format!("provider.model (or {ENV_MODEL})")).into());
                }
                if let Some(t) = temperature
                    && !t.is_finite()
                {
                    return Err(ConfigError::Invalid(format!("provider.temperature must be finite, got {t}")).into());
                }
                timeout_secs
            }
            ProviderConfig::Mock { timeout_secs, .. } => timeout_secs,
        };

        if *timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("provider.timeout_secs must be greater than 0".to_string()).into());
        }
        Ok(())
    }
}

/// Persistent prompt history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// When false, history lives only for the current session
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// SQLite database file; `~/` is expanded
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { enabled: true, db_path: None }
    }
}

impl HistoryConfig {
    /// Database location, defaulting to `~/.palaver/history.db`
    pub fn resolved_db_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(path) => expand_home(path),
            None => Ok(palaver_home()?.join("history.db")),
        }
    }
}

/// `[logging]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// pretty, json or compact
    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default)]
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format(), file: FileLoggingConfig::default() }
    }
}

/// `[logging.file]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: true, directory: None }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Root configuration structure for palaver.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub provider: ProviderConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config = Self::parse(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a file, apply `PALAVER_*` overrides, then validate
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn parse(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::TomlParse(e.to_string()).into())
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let ProviderConfig::OpenAi { api_key, model, max_tokens, temperature, .. } = &mut self.provider {
            if let Some(value) = get(ENV_API_KEY) {
                *api_key = value;
            }
            if let Some(value) = get(ENV_MODEL) {
                *model = value;
            }
            if let Some(value) = get(ENV_MAX_TOKENS) {
                let parsed = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| ConfigError::Invalid(format!("{ENV_MAX_TOKENS}={value}: {e}")))?;
                *max_tokens = Some(parsed);
            }
            if let Some(value) = get(ENV_TEMPERATURE) {
                let parsed = value
                    .trim()
                    .parse::<f32>()
                    .map_err(|e| ConfigError::Invalid(format!("{ENV_TEMPERATURE}={value}: {e}")))?;
                *temperature = Some(parsed);
            }
        }

        if let Some(value) = get(ENV_DB_FILE) {
            self.history.db_path = Some(PathBuf::from(value));
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()
    }

    /// Annotated example written when no config file exists
    pub fn example() -> &'static str {
        r#"# palaver configuration

[provider]
# "openai" or "mock"
provider = "openai"
# API key (or set PALAVER_API_KEY)
api_key = ""
# Model name (or set PALAVER_MODEL)
model = "gpt-4o-mini"
# Any OpenAI-compatible endpoint
# base_url = "https://api.openai.com/v1"
# max_tokens = 1024
# temperature = 0.7
# Seconds to wait for a reply; omit to wait indefinitely
# timeout_secs = 60

[history]
# false keeps history in memory for this session only
enabled = true
# db_path = "~/.palaver/history.db"

[logging]
# Filter directive; PALAVER_LOG or RUST_LOG take precedence
level = "info"
# pretty, json or compact
format = "json"

[logging.file]
# When disabled, logs go to stderr underneath the terminal UI
enabled = true
# directory = "~/.palaver/logs"
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required value absent or empty
    #[error("missing required setting: {0}")]
    Missing(String),

    /// Value present but unusable
    #[error("invalid setting: {0}")]
    Invalid(String),

    /// No home directory to resolve default paths against
    #[error("could not determine home directory")]
    NoHomeDir,

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}

/// `~/.palaver`
pub fn palaver_home() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".palaver"))
}

/// Expand a leading `~/` against the home directory
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const OPENAI_TOML: &str = r#"
[provider]
provider = "openai"
api_key = "sk-test"
model = "gpt-4o-mini"
"#;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_from_toml_str_defaults() {
        let config = Config::from_toml_str(OPENAI_TOML).unwrap();

        match &config.provider {
            ProviderConfig::OpenAi { api_key, model, base_url, max_tokens, temperature, timeout_secs } => {
                assert_eq!(api_key, "sk-test");
                assert_eq!(model, "gpt-4o-mini");
                assert_eq!(base_url, DEFAULT_OPENAI_BASE_URL);
                assert!(max_tokens.is_none());
                assert!(temperature.is_none());
                assert!(timeout_secs.is_none());
            }
            other => panic!("expected openai provider, got {other:?}"),
        }
        assert!(config.history.enabled);
        assert!(config.history.db_path.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
        assert!(config.logging.file.enabled);
        assert!(config.provider.timeout().is_none());
    }

    #[test]
    fn test_config_full_toml() {
        let toml = r#"
[provider]
provider = "openai"
api_key = "sk-test"
model = "gpt-4o"
base_url = "http://localhost:8080/v1"
max_tokens = 512
temperature = 0.2
timeout_secs = 30

[history]
enabled = false
db_path = "/tmp/palaver.db"

[logging]
level = "debug"
format = "compact"

[logging.file]
enabled = false
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.provider.name(), "openai");
        assert_eq!(config.provider.timeout(), Some(Duration::from_secs(30)));
        assert!(!config.history.enabled);
        assert_eq!(config.history.resolved_db_path().unwrap(), PathBuf::from("/tmp/palaver.db"));
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.file.enabled);
    }

    #[test]
    fn test_mock_provider_needs_no_credentials() {
        let toml = r#"
[provider]
provider = "mock"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.provider, ProviderConfig::Mock { responses_file: None, timeout_secs: None });
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let toml = r#"
[provider]
provider = "openai"
model = "gpt-4o-mini"
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("provider.api_key"));
    }

    #[test]
    fn test_missing_model_is_rejected() {
        let toml = r#"
[provider]
provider = "openai"
api_key = "sk-test"
model = "  "
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("provider.model"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let toml = r#"
[provider]
provider = "mock"
timeout_secs = 0
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let toml = r#"
[provider]
provider = "gopher"
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_top_level_key_is_rejected() {
        let toml = format!("{OPENAI_TOML}\n[extras]\nfoo = 1\n");
        assert!(Config::from_toml_str(&toml).is_err());
    }

    #[test]
    fn test_overrides_fill_credentials() {
        let mut config = Config::parse(
            r#"
[provider]
provider = "openai"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        config
            .apply_overrides(lookup(&[
                (ENV_API_KEY, "sk-env"),
                (ENV_MODEL, "gpt-env"),
                (ENV_MAX_TOKENS, "256"),
                (ENV_TEMPERATURE, "0.5"),
                (ENV_DB_FILE, "/var/tmp/h.db"),
            ]))
            .unwrap();
        config.validate().unwrap();

        match &config.provider {
            ProviderConfig::OpenAi { api_key, model, max_tokens, temperature, .. } => {
                assert_eq!(api_key, "sk-env");
                assert_eq!(model, "gpt-env");
                assert_eq!(*max_tokens, Some(256));
                assert_eq!(*temperature, Some(0.5));
            }
            other => panic!("expected openai provider, got {other:?}"),
        }
        assert_eq!(config.history.db_path, Some(PathBuf::from("/var/tmp/h.db")));
    }

    #[test]
    fn test_overrides_ignore_empty_values() {
        let mut config = Config::parse(OPENAI_TOML).unwrap();
        config.apply_overrides(lookup(&[(ENV_API_KEY, "")])).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_invalid_max_tokens_override() {
        let mut config = Config::parse(OPENAI_TOML).unwrap();
        let err = config.apply_overrides(lookup(&[(ENV_MAX_TOKENS, "lots")])).unwrap_err();
        assert!(err.to_string().contains(ENV_MAX_TOKENS));
    }

    #[test]
    fn test_non_finite_temperature_is_rejected() {
        let mut config = Config::parse(OPENAI_TOML).unwrap();
        config.apply_overrides(lookup(&[(ENV_TEMPERATURE, "NaN")])).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, OPENAI_TOML).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.provider.name(), "openai");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = Config::load(&temp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_example_parses_but_requires_api_key() {
        let parsed = Config::parse(Config::example()).unwrap();
        assert_eq!(parsed.provider.name(), "openai");
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn test_expand_home() {
        let absolute = PathBuf::from("/etc/palaver.db");
        assert_eq!(expand_home(&absolute).unwrap(), absolute);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/x/h.db")).unwrap(), home.join("x/h.db"));
        }
    }
}

use derivative::Derivative;
use log::LevelFilter;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// What happens to the selection when only part of a batch was uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialSuccessPolicy {
    /// Clear the selection and reload the board, like a full success.
    #[default]
    ClearAndReload,
    /// Clear the selection but keep the board as it is.
    ClearOnly,
    /// Leave the selection untouched so the user can retry.
    Retain,
}

impl FromStr for PartialSuccessPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear-and-reload" | "reload" => Ok(Self::ClearAndReload),
            "clear-only" | "clear" => Ok(Self::ClearOnly),
            "retain" | "keep" => Ok(Self::Retain),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct BoardConfig {
    #[derivative(Default(value = "\"http://localhost:8080\".to_string()"))]
    pub server_url: String,
    #[derivative(Default(value = "500"))]
    pub max_file_size_mb: u64,
    #[derivative(Default(value = "\"500MB\".to_string()"))]
    pub max_file_size_text: String,
    pub message_content_required: bool,
    pub partial_success: PartialSuccessPolicy,
    #[derivative(Default(value = "Duration::from_millis(3000)"))]
    pub notification_duration: Duration,
    #[derivative(Default(value = "Duration::from_millis(1500)"))]
    pub reload_delay: Duration,
    #[derivative(Default(value = "Duration::from_secs(60)"))]
    pub timestamp_refresh: Duration,
    #[derivative(Default(value = "LevelFilter::Info"))]
    pub log_level: LevelFilter,
}

impl BoardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or empty keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("BOARD_SERVER_URL") {
            config.server_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = get("MAX_FILE_SIZE_MB") {
            config.max_file_size_mb = parse("MAX_FILE_SIZE_MB", &raw)?;
            config.max_file_size_text = format!("{}MB", config.max_file_size_mb);
        }
        if let Some(text) = get("MAX_FILE_SIZE_TEXT") {
            config.max_file_size_text = text;
        }

        if let Some(raw) = get("BOARD_MESSAGE_CONTENT_REQUIRED") {
            config.message_content_required = parse_bool("BOARD_MESSAGE_CONTENT_REQUIRED", &raw)?;
        }

        if let Some(raw) = get("BOARD_PARTIAL_SUCCESS") {
            config.partial_success =
                raw.parse().map_err(|_| invalid("BOARD_PARTIAL_SUCCESS", &raw))?;
        }

        if let Some(raw) = get("BOARD_NOTIFICATION_MS") {
            config.notification_duration =
                Duration::from_millis(parse("BOARD_NOTIFICATION_MS", &raw)?);
        }
        if let Some(raw) = get("BOARD_RELOAD_DELAY_MS") {
            config.reload_delay = Duration::from_millis(parse("BOARD_RELOAD_DELAY_MS", &raw)?);
        }

        if let Some(raw) = get("BOARD_LOG") {
            config.log_level = raw.trim().parse().map_err(|_| invalid("BOARD_LOG", &raw))?;
        }

        Ok(config)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| invalid(key, raw))
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, raw)),
    }
}

//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::search::SearchMode;

mod cli;

pub use cli::{CliArgs, Command, KeywordArgs, ListArgs, Overrides, SearchModeArg};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "postdeck";
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000/";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;
pub(crate) const DEFAULT_SEARCH_QUIET_PERIOD_MS: u64 = 350;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub quiet_period: Duration,
    pub mode: SearchMode,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("POSTDECK").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    search: RawSearchSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = overrides.api_base_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(seconds) = overrides.api_timeout_seconds {
            self.api.timeout_seconds = Some(seconds);
        }
        if let Some(millis) = overrides.search_quiet_period_ms {
            self.search.quiet_period_ms = Some(millis);
        }
        if let Some(mode) = overrides.search_mode {
            self.search.mode = Some(mode.as_str().to_string());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        Ok(Self {
            api: build_api_settings(raw.api)?,
            search: build_search_settings(raw.search)?,
            logging: build_logging_settings(raw.logging)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let candidate = api
        .base_url
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_BASE_URL);

    let base_url = Url::parse(candidate)
        .map_err(|err| LoadError::invalid("api.base_url", format!("`{candidate}`: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
        return Err(LoadError::invalid(
            "api.base_url",
            format!("`{candidate}` must be an http or https URL"),
        ));
    }

    let timeout_seconds = api.timeout_seconds.unwrap_or(DEFAULT_API_TIMEOUT_SECS);
    if timeout_seconds == 0 {
        return Err(LoadError::invalid(
            "api.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ApiSettings {
        base_url,
        timeout: Duration::from_secs(timeout_seconds),
    })
}

fn build_search_settings(search: RawSearchSettings) -> Result<SearchSettings, LoadError> {
    let quiet_period = Duration::from_millis(
        search
            .quiet_period_ms
            .unwrap_or(DEFAULT_SEARCH_QUIET_PERIOD_MS),
    );

    let mode = match search.mode {
        Some(mode) => SearchMode::from_str(mode.trim())
            .map_err(|err| LoadError::invalid("search.mode", err))?,
        None => SearchMode::default(),
    };

    Ok(SearchSettings { quiet_period, mode })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSearchSettings {
    quiet_period_ms: Option<u64>,
    mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

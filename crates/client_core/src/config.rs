use std::{fs, io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::notifications::DEFAULT_TOAST_TTL;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1/transcript";
pub const CONFIG_FILE: &str = "client.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid value for '{key}' in {path}: expected {expected}")]
    InvalidValue {
        path: String,
        key: &'static str,
        expected: &'static str,
    },
    #[error("invalid api base url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("api base url '{0}' must use http or https")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub api_base: String,
    pub toast_ttl_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            toast_ttl_ms: DEFAULT_TOAST_TTL.as_millis() as u64,
        }
    }
}

impl ClientSettings {
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }
}

/// Defaults, then `client.toml` in the working directory, then environment.
pub fn load_settings() -> Result<ClientSettings, ConfigError> {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, ConfigError> {
    let mut settings = ClientSettings::default();

    match fs::read_to_string(config_path) {
        Ok(raw) => apply_file(&mut settings, config_path, &raw)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                source,
            })
        }
    }

    if let Some(v) = env("TRANSCRIPT_API_BASE") {
        settings.api_base = v;
    }
    if let Some(v) = env("APP__API_BASE") {
        settings.api_base = v;
    }
    if let Some(v) = env("APP__TOAST_TTL_MS") {
        apply_ttl(&mut settings, &v);
    }

    settings.api_base = normalize_api_base(&settings.api_base)?;
    Ok(settings)
}

/// `toast_ttl_ms` may be written as an integer or a numeric string.
fn apply_file(settings: &mut ClientSettings, path: &Path, raw: &str) -> Result<(), ConfigError> {
    let table = raw
        .parse::<toml::Table>()
        .map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    let invalid = |key, expected| ConfigError::InvalidValue {
        path: path.display().to_string(),
        key,
        expected,
    };

    match table.get("api_base") {
        None => {}
        Some(toml::Value::String(v)) => settings.api_base = v.clone(),
        Some(_) => return Err(invalid("api_base", "a string")),
    }
    match table.get("toast_ttl_ms") {
        None => {}
        Some(toml::Value::Integer(ms)) => {
            settings.toast_ttl_ms =
                u64::try_from(*ms).map_err(|_| invalid("toast_ttl_ms", "a non-negative integer"))?;
        }
        Some(toml::Value::String(v)) => apply_ttl(settings, v),
        Some(_) => return Err(invalid("toast_ttl_ms", "a non-negative integer")),
    }
    Ok(())
}

fn apply_ttl(settings: &mut ClientSettings, raw: &str) {
    match raw.trim().parse::<u64>() {
        Ok(parsed) => settings.toast_ttl_ms = parsed,
        Err(_) => warn!(value = raw, "ignoring invalid toast ttl"),
    }
}

/// Validate an http(s) base address and strip trailing slashes.
/// A blank value falls back to [`DEFAULT_API_BASE`].
pub fn normalize_api_base(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_API_BASE.to_string());
    }

    let parsed = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

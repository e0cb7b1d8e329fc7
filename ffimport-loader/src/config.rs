//! Validated run configuration. Parsed and checked once, then read-only.

use std::fmt;
use std::time::Duration;

use ffimport_ingest::{DateOrder, NormalizeOptions, SignConvention};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub app: AppSection,
    pub firefly: FireflySection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    /// Transactions per API call.
    pub batch_size: usize,
    #[serde(default = "default_apply_rules")]
    pub apply_rules: bool,
    /// ISO 4217 code attached to every transaction.
    pub currency: String,
    #[serde(default)]
    pub sign_convention: SignConvention,
    #[serde(default)]
    pub date_order: DateOrder,
    /// Firefly III field limits (v6 API).
    #[serde(default = "default_description_max_len")]
    pub description_max_len: usize,
    #[serde(default = "default_account_name_max_len")]
    pub account_name_max_len: usize,
    #[serde(default = "default_success_delay_ms")]
    pub success_delay_ms: u64,
    #[serde(default = "default_failure_delay_ms")]
    pub failure_delay_ms: u64,
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FireflySection {
    pub base_url: String,
    /// Personal access token, sent as a bearer credential.
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Keeps the token out of logs and panics.
impl fmt::Debug for FireflySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FireflySection")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_apply_rules() -> bool {
    true
}

fn default_description_max_len() -> usize {
    255
}

fn default_account_name_max_len() -> usize {
    100
}

fn default_success_delay_ms() -> u64 {
    500
}

fn default_failure_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

/// Written by `ffimport init`.
pub const CONFIG_TEMPLATE: &str = r#"[app]
batch_size = 50
apply_rules = true
currency = "INR"
# "negative-is-incoming": card statements (purchases positive, payments negative)
# "negative-is-outgoing": most bank account statements
sign_convention = "negative-is-incoming"
# Preferred reading of NN/NN/YYYY dates: "month-first" or "day-first"
date_order = "month-first"
description_max_len = 255
account_name_max_len = 100
success_delay_ms = 500
failure_delay_ms = 1000

[firefly]
base_url = "http://localhost:8080"
token = ""
timeout_secs = 30
"#;

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let app = &self.app;
        if app.batch_size == 0 {
            return Err(invalid("app.batch_size", "must be greater than zero"));
        }
        if app.currency.len() != 3 || !app.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(invalid(
                "app.currency",
                format!("`{}` is not a three-letter ISO 4217 code", app.currency),
            ));
        }
        if app.description_max_len == 0 {
            return Err(invalid("app.description_max_len", "must be greater than zero"));
        }
        if app.account_name_max_len == 0 {
            return Err(invalid("app.account_name_max_len", "must be greater than zero"));
        }

        let ff = &self.firefly;
        let url = Url::parse(&ff.base_url)
            .map_err(|e| invalid("firefly.base_url", format!("`{}`: {e}", ff.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("firefly.base_url", "scheme must be http or https"));
        }
        if ff.token.trim().is_empty() {
            return Err(invalid("firefly.token", "is empty"));
        }
        if ff.timeout_secs == 0 {
            return Err(invalid("firefly.timeout_secs", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            sign_convention: self.app.sign_convention,
            date_order: self.app.date_order,
            description_max_len: self.app.description_max_len,
            account_name_max_len: self.app.account_name_max_len,
        }
    }

    pub fn success_delay(&self) -> Duration {
        Duration::from_millis(self.app.success_delay_ms)
    }

    pub fn failure_delay(&self) -> Duration {
        Duration::from_millis(self.app.failure_delay_ms)
    }
}

impl FireflySection {
    /// `POST` target for new transaction groups.
    pub fn transactions_endpoint(&self) -> Result<Url, ConfigError> {
        let raw = format!("{}/api/v1/transactions", self.base_url.trim_end_matches('/'));
        Url::parse(&raw).map_err(|e| invalid("firefly.base_url", format!("`{raw}`: {e}")))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}

// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the submission gate and its HTTP collaborators.
//!
//! Values come from serde (e.g. a JSON file) or from environment variables
//! via [`Config::from_env`]; anything unset falls back to the defaults below.

use crate::error::{ConfigError, InvalidConfiguration};
use crate::gate::validate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Document creation endpoint of the national labelling system.
pub const DEFAULT_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Admission gate parameters
    #[serde(default)]
    pub gate: GateConfig,

    /// Submission endpoint
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

/// Length of one rate limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowUnit {
    Second,
    Minute,
    Hour,
}

impl WindowUnit {
    pub fn duration(self) -> Duration {
        match self {
            WindowUnit::Second => Duration::from_secs(1),
            WindowUnit::Minute => Duration::from_secs(60),
            WindowUnit::Hour => Duration::from_secs(60 * 60),
        }
    }
}

impl FromStr for WindowUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "second" | "seconds" | "s" => Ok(WindowUnit::Second),
            "minute" | "minutes" | "m" => Ok(WindowUnit::Minute),
            "hour" | "hours" | "h" => Ok(WindowUnit::Hour),
            other => Err(format!("unknown window unit {other:?}")),
        }
    }
}

/// Admission gate parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Maximum submissions started per window (default: 10)
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Window length as a unit of time (default: minute)
    #[serde(default = "default_window")]
    pub window: WindowUnit,

    /// Explicit window length in milliseconds; overrides `window` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_ms: Option<u64>,
}

/// Submission endpoint and request headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Target URL for document creation
    #[serde(default = "default_url")]
    pub url: String,

    /// Name of the header carrying the auth token (default: AUTH)
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// Auth token; no auth header is sent when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

// Default value functions
fn default_limit() -> u32 {
    10
}

fn default_window() -> WindowUnit {
    WindowUnit::Minute
}

fn default_url() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_auth_header() -> String {
    "AUTH".to_string()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            window: default_window(),
            window_ms: None,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            auth_header: default_auth_header(),
            auth_token: None,
        }
    }
}

impl GateConfig {
    /// `limit` submissions per one `unit` of time.
    pub fn per(limit: u32, unit: WindowUnit) -> Self {
        Self {
            limit,
            window: unit,
            window_ms: None,
        }
    }

    pub fn window_duration(&self) -> Duration {
        match self.window_ms {
            Some(ms) => Duration::from_millis(ms),
            None => self.window.duration(),
        }
    }

    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        validate(self.limit, self.window_duration())
    }
}

impl EndpointConfig {
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        url::Url::parse(&self.url)
            .map_err(|e| InvalidConfiguration::new("endpoint.url", e.to_string()))?;
        if self.auth_header.trim().is_empty() {
            return Err(InvalidConfiguration::new(
                "endpoint.auth_header",
                "header name must not be empty",
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from environment variables:
    ///
    /// - `GATE_LIMIT`: submissions per window (default: 10)
    /// - `GATE_WINDOW`: `second`, `minute` or `hour` (default: minute)
    /// - `GATE_WINDOW_MS`: window length in milliseconds, overrides `GATE_WINDOW`
    /// - `SUBMIT_URL`: endpoint URL
    /// - `SUBMIT_AUTH_HEADER`: auth header name (default: AUTH)
    /// - `SUBMIT_AUTH_TOKEN`: auth token
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(limit) = parse_var(&lookup, "GATE_LIMIT")? {
            config.gate.limit = limit;
        }
        if let Some(unit) = parse_var(&lookup, "GATE_WINDOW")? {
            config.gate.window = unit;
        }
        if let Some(ms) = parse_var(&lookup, "GATE_WINDOW_MS")? {
            config.gate.window_ms = Some(ms);
        }
        if let Some(url) = lookup("SUBMIT_URL") {
            config.endpoint.url = url;
        }
        if let Some(header) = lookup("SUBMIT_AUTH_HEADER") {
            config.endpoint.auth_header = header;
        }
        config.endpoint.auth_token = lookup("SUBMIT_AUTH_TOKEN");

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        self.gate.validate()?;
        self.endpoint.validate()
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::Env {
                var,
                reason: e.to_string(),
            })
        })
        .transpose()
}

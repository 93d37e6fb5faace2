//! Connection configuration for a DIA tenant.
//!
//! # Design
//! `ClientConfig` is validated once at construction and immutable afterwards,
//! so a client can never reach the network with half a configuration. The
//! env loader is a convenience on top of the builder; nothing else in the
//! crate reads process state.

use std::fmt;

use crate::error::{DiaError, Result};

pub const ENV_WS_URL: &str = "DIA_WS_URL";
pub const ENV_USERNAME: &str = "DIA_USERNAME";
pub const ENV_PASSWORD: &str = "DIA_PASSWORD";
pub const ENV_API_KEY: &str = "DIA_API_KEY";
pub const ENV_FIRMA_KODU: &str = "DIA_FIRMA_KODU";
pub const ENV_DONEM_KODU: &str = "DIA_DONEM_KODU";

/// Validated connection settings for one tenant/period.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    username: String,
    password: String,
    api_key: String,
    firma_kodu: u32,
    donem_kodu: u32,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load the configuration from the `DIA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DiaError::Configuration(format!("missing env: {key}")))
        };
        let integer = |key: &str| -> Result<u32> {
            let raw = require(key)?;
            raw.trim()
                .parse()
                .map_err(|_| DiaError::Configuration(format!("env {key} must be an integer, got {raw:?}")))
        };

        Self::builder()
            .base_url(require(ENV_WS_URL)?)
            .username(require(ENV_USERNAME)?)
            .password(require(ENV_PASSWORD)?)
            .api_key(require(ENV_API_KEY)?)
            .firma_kodu(integer(ENV_FIRMA_KODU)?)
            .donem_kodu(integer(ENV_DONEM_KODU)?)
            .build()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Tenant (company) code.
    pub fn firma_kodu(&self) -> u32 {
        self.firma_kodu
    }

    /// Accounting period code.
    pub fn donem_kodu(&self) -> u32 {
        self.donem_kodu
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("firma_kodu", &self.firma_kodu)
            .field("donem_kodu", &self.donem_kodu)
            .finish()
    }
}

/// Builder for [`ClientConfig`]. Every field is required.
#[derive(Debug, Default, Clone)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    api_key: Option<String>,
    firma_kodu: Option<u32>,
    donem_kodu: Option<u32>,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn firma_kodu(mut self, code: u32) -> Self {
        self.firma_kodu = Some(code);
        self
    }

    pub fn donem_kodu(mut self, code: u32) -> Self {
        self.donem_kodu = Some(code);
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let base_url = required("base_url", self.base_url)?;
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| DiaError::Configuration(format!("invalid base_url '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DiaError::Configuration(format!(
                "base_url '{base_url}' must use http or https"
            )));
        }

        Ok(ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: required("username", self.username)?,
            password: required("password", self.password)?,
            api_key: required("api_key", self.api_key)?,
            firma_kodu: self
                .firma_kodu
                .ok_or_else(|| DiaError::Configuration("missing firma_kodu".to_string()))?,
            donem_kodu: self
                .donem_kodu
                .ok_or_else(|| DiaError::Configuration("missing donem_kodu".to_string()))?,
        })
    }
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DiaError::Configuration(format!("missing {name}"))),
    }
}

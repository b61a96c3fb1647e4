//! Service configuration for the geocoding and routing clients.
//!
//! Values come from serde defaults, optionally a JSON file, then environment
//! overrides:
//!
//! - `BELIB_GEOCODER_URL`: geocoding API base URL
//! - `BELIB_ROUTER_URL`: OSRM base URL
//! - `BELIB_ROUTER_PROFILE`: OSRM profile (default `driving`)
//! - `BELIB_HTTP_TIMEOUT_SECS`: timeout applied to both clients

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const GEOCODER_URL_ENV: &str = "BELIB_GEOCODER_URL";
pub const ROUTER_URL_ENV: &str = "BELIB_ROUTER_URL";
pub const ROUTER_PROFILE_ENV: &str = "BELIB_ROUTER_PROFILE";
pub const HTTP_TIMEOUT_ENV: &str = "BELIB_HTTP_TIMEOUT_SECS";

fn default_geocoder_url() -> String {
    "https://api-adresse.data.gouv.fr".to_string()
}

fn default_router_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_profile() -> String {
    "driving".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("belib-locator/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for the address geocoding client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl GeocoderConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Configuration for the OSRM routing client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_router_url")]
    pub base_url: String,
    /// OSRM profile segment of the request path (`driving`, `bike`, `foot`).
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_url: default_router_url(),
            profile: default_profile(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl RouterConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Configuration of both external services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub router: RouterConfig,
}

impl ServiceConfig {
    /// Read a JSON configuration file. Missing keys fall back to defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "loaded service configuration");
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `BELIB_*` environment overrides on top of the current values.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(GEOCODER_URL_ENV) {
            self.geocoder.base_url = url;
        }
        if let Some(url) = lookup(ROUTER_URL_ENV) {
            self.router.base_url = url;
        }
        if let Some(profile) = lookup(ROUTER_PROFILE_ENV) {
            self.router.profile = profile;
        }
        if let Some(value) = lookup(HTTP_TIMEOUT_ENV) {
            let secs = value.trim().parse::<u64>().map_err(|_| Error::InvalidConfig {
                message: format!("{HTTP_TIMEOUT_ENV} must be a whole number of seconds, got '{value}'"),
            })?;
            self.geocoder.timeout_secs = secs;
            self.router.timeout_secs = secs;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_url("geocoder.base_url", &self.geocoder.base_url)?;
        validate_url("router.base_url", &self.router.base_url)?;
        if self.router.profile.trim().is_empty() || self.router.profile.contains('/') {
            return Err(Error::InvalidConfig {
                message: "router.profile must be a single path segment".to_string(),
            });
        }
        if self.geocoder.timeout_secs == 0 || self.router.timeout_secs == 0 {
            return Err(Error::InvalidConfig {
                message: "timeout_secs must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

fn validate_url(name: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(Error::InvalidConfig {
            message: format!("{name} must not be empty"),
        });
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::InvalidConfig {
            message: format!("{name} must start with http:// or https://, got '{url}'"),
        });
    }
    Ok(())
}

//! Dashboard configuration.
//!
//! Defaults come from `config/dashboard.toml`, embedded at compile time.
//! Environment variables override individual fields.

use std::time::Duration;

use outbreak_map_dataset::BoundarySource;
use outbreak_map_region_models::jurisdiction;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../config/dashboard.toml");

/// Overrides [`DashboardConfig::boundary_url`].
pub const BOUNDARY_URL_VAR: &str = "OUTBREAK_MAP_BOUNDARY_URL";
/// Overrides [`DashboardConfig::jurisdiction_code`]; FIPS code or postal
/// abbreviation.
pub const JURISDICTION_VAR: &str = "OUTBREAK_MAP_JURISDICTION";
/// Overrides [`DashboardConfig::request_timeout_secs`].
pub const TIMEOUT_VAR: &str = "OUTBREAK_MAP_TIMEOUT_SECS";

/// Errors resolving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The embedded TOML is malformed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// An override or configured value is unusable.
    #[error("Invalid {name}: {message}")]
    Env {
        /// Variable or field name.
        name: &'static str,
        /// Description of what went wrong.
        message: String,
    },
}

/// Where boundaries come from and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    /// URL of the boundary `GeoJSON` document.
    pub boundary_url: String,
    /// Two-digit FIPS code of the mapped jurisdiction.
    pub jurisdiction_code: String,
    /// Timeout for the boundary request.
    pub request_timeout_secs: u64,
}

impl DashboardConfig {
    /// Embedded defaults with process environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the defaults are malformed or an
    /// override is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_overrides(|name| std::env::var(name).ok())
    }

    /// Embedded defaults with overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the defaults are malformed or an
    /// override is invalid.
    pub fn with_overrides(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(DEFAULT_CONFIG)?;

        if let Some(url) = lookup(BOUNDARY_URL_VAR) {
            config.boundary_url = url;
        }
        if let Some(code) = lookup(JURISDICTION_VAR) {
            config.jurisdiction_code = code;
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            config.request_timeout_secs = secs.trim().parse().map_err(|e| ConfigError::Env {
                name: TIMEOUT_VAR,
                message: format!("{secs:?}: {e}"),
            })?;
        }

        config.jurisdiction_code = resolve_jurisdiction(&config.jurisdiction_code)?;
        log::debug!("Resolved config: {config:?}");

        Ok(config)
    }

    /// The boundary source for the registry.
    #[must_use]
    pub fn boundary_source(&self) -> BoundarySource {
        BoundarySource {
            url: self.boundary_url.clone(),
            jurisdiction_code: self.jurisdiction_code.clone(),
        }
    }

    /// The boundary request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Accepts a FIPS code or postal abbreviation and returns the FIPS code.
fn resolve_jurisdiction(code: &str) -> Result<String, ConfigError> {
    let code = code.trim();
    jurisdiction::by_fips(code)
        .or_else(|| jurisdiction::by_abbr(code))
        .map(|found| found.fips.to_string())
        .ok_or_else(|| ConfigError::Env {
            name: JURISDICTION_VAR,
            message: format!("unknown jurisdiction {code:?}"),
        })
}

//! In-memory configuration for the map screen.
//!
//! Nothing is read from files or the environment. The shell may hand a JSON
//! document to [`AppConfig::from_json`] and send it with `Event::Configure`
//! before mounting the screen; otherwise the defaults below apply.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::model::GeoPoint;
use crate::tiles::TileStyle;

pub const OSRM_BASE_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_PROFILE: &str = "driving";
pub const DEFAULT_MAP_ZOOM: f64 = 13.0;
pub const MIN_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 19.0;
pub const SERVICE_CHECK_ATTEMPTS: u32 = 3;
pub const SERVICE_CHECK_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("zoom {name}={value} is not finite")]
    NonFiniteZoom { name: &'static str, value: f64 },
    #[error("zoom bounds inverted: min {min} > max {max}")]
    InvertedZoomBounds { min: f64, max: f64 },
    #[error("default zoom {zoom} outside [{min}, {max}]")]
    DefaultZoomOutOfBounds { zoom: f64, min: f64, max: f64 },
    #[error("invalid routing base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("routing profile cannot be empty")]
    EmptyProfile,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub base_url: String,
    pub profile: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: OSRM_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
        }
    }
}

/// How often to re-check a disabled location service before moving on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl RetryPolicy {
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: SERVICE_CHECK_ATTEMPTS,
            delay_ms: SERVICE_CHECK_DELAY_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub routing: RoutingConfig,
    pub default_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub service_retry: RetryPolicy,
    pub initial_tile_style: TileStyle,
    /// Camera centre used before the first fix arrives.
    pub fallback_center: GeoPoint,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            routing: RoutingConfig::default(),
            default_zoom: DEFAULT_MAP_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            service_retry: RetryPolicy::default(),
            initial_tile_style: TileStyle::default(),
            fallback_center: GeoPoint::new(0.0, 0.0),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("default_zoom", self.default_zoom),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteZoom { name, value });
            }
        }

        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvertedZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }

        if !(self.min_zoom..=self.max_zoom).contains(&self.default_zoom) {
            return Err(ConfigError::DefaultZoomOutOfBounds {
                zoom: self.default_zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }

        let base = Url::parse(&self.routing.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.routing.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.routing.base_url.clone(),
                reason: format!("unsupported scheme '{}'", base.scheme()),
            });
        }

        if self.routing.profile.trim().is_empty() {
            return Err(ConfigError::EmptyProfile);
        }

        Ok(())
    }
}

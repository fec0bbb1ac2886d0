//! Driving routes from an OSRM-compatible HTTP API.
//!
//! The wire format orders coordinates `[lon, lat]`; everything inside the
//! core is `(lat, lon)`. The swap happens in exactly two places: building the
//! request path and reading the response geometry.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::RoutingConfig;
use crate::model::{GeoPoint, RoutePath};

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteError {
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("could not parse response: {0}")]
    Parse(String),
    #[error("routing service answered '{code}'")]
    Rejected { code: String },
    #[error("response contained no route")]
    NoRoute,
    #[error("route geometry is not a usable line: {0}")]
    BadGeometry(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
}

impl RouteRequest {
    #[must_use]
    pub const fn new(origin: GeoPoint, destination: GeoPoint) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// `{base}/route/v1/{profile}/{oLon},{oLat};{dLon},{dLat}?geometries=geojson`
    pub fn url(&self, config: &RoutingConfig) -> Result<Url, RouteError> {
        let base = config.base_url.trim_end_matches('/');
        let raw = format!(
            "{base}/route/v1/{profile}/{olon},{olat};{dlon},{dlat}",
            profile = config.profile,
            olon = self.origin.lon,
            olat = self.origin.lat,
            dlon = self.destination.lon,
            dlat = self.destination.lat,
        );

        let mut url = Url::parse(&raw).map_err(|e| RouteError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("geometries", "geojson");
        Ok(url)
    }
}

#[derive(Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: geojson::Geometry,
}

/// Reads the first route's line geometry from a response body.
pub fn parse_route(body: &[u8]) -> Result<RoutePath, RouteError> {
    let response: OsrmResponse =
        serde_json::from_slice(body).map_err(|e| RouteError::Parse(e.to_string()))?;

    if let Some(code) = response.code {
        if code != "Ok" {
            return Err(RouteError::Rejected { code });
        }
    }

    let route = response.routes.into_iter().next().ok_or(RouteError::NoRoute)?;

    let positions = match route.geometry.value {
        geojson::Value::LineString(positions) => positions,
        _ => {
            return Err(RouteError::BadGeometry(
                "expected a LineString".to_string(),
            ))
        }
    };

    if positions.is_empty() {
        return Err(RouteError::NoRoute);
    }

    positions
        .iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(GeoPoint::from_lon_lat(*lon, *lat)),
            _ => Err(RouteError::BadGeometry(format!(
                "position with {} values",
                position.len()
            ))),
        })
        .collect()
}

/// Maps the HTTP outcome of a route request into a route or a typed failure.
/// Only a 200 response is considered for parsing.
pub fn route_from_response(
    result: crux_http::Result<crux_http::Response<Vec<u8>>>,
) -> Result<RoutePath, RouteError> {
    let mut response = result.map_err(|e| RouteError::Transport(e.to_string()))?;

    let status: u16 = response.status().into();
    if status != 200 {
        return Err(RouteError::Status(status));
    }

    let body = response.take_body().unwrap_or_default();
    debug!(bytes = body.len(), "route response received");
    parse_route(&body)
}

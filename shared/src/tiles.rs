//! Raster tile layers the shell can draw under the map.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::model::GeoPoint;

/// Web-Mercator cuts off just above 85 degrees.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileStyle {
    #[default]
    Satellite,
    Street,
}

impl TileStyle {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Satellite => Self::Street,
            Self::Street => Self::Satellite,
        }
    }

    #[must_use]
    pub const fn layer(self) -> TileLayer {
        match self {
            Self::Satellite => TileLayer {
                url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                subdomains: &[],
                attribution: "Tiles \u{a9} Esri",
                max_zoom: 19,
            },
            Self::Street => TileLayer {
                url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                subdomains: &["a", "b", "c"],
                attribution: "\u{a9} OpenStreetMap contributors",
                max_zoom: 19,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileLayer {
    pub url_template: &'static str,
    pub subdomains: &'static [&'static str],
    pub attribution: &'static str,
    pub max_zoom: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    /// Slippy-map tile containing `point` at zoom `z`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn containing(point: GeoPoint, z: u8) -> Self {
        let n = f64::from(1_u32 << z.min(31));
        let max_index = n - 1.0;

        let lat = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        let x = ((point.lon + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - lat.tan().asinh() / PI) / 2.0 * n).floor();

        Self {
            z,
            x: x.clamp(0.0, max_index) as u32,
            y: y.clamp(0.0, max_index) as u32,
        }
    }
}

impl TileLayer {
    /// Fills the template, spreading requests across subdomains by `(x + y) % n`.
    #[must_use]
    pub fn tile_url(&self, coord: TileCoord) -> String {
        let mut url = self
            .url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if !self.subdomains.is_empty() {
            let idx = (u64::from(coord.x) + u64::from(coord.y)) % self.subdomains.len() as u64;
            #[allow(clippy::cast_possible_truncation)]
            let sub = self.subdomains[idx as usize];
            url = url.replace("{s}", sub);
        }

        url
    }
}

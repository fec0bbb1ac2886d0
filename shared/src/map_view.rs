//! Camera ownership for the map widget.
//!
//! Programmatic moves bump `move_id`; the shell applies the camera whenever
//! the id changes. Gesture feedback only updates the zoom and the observed
//! viewport centre, so it never triggers a move back.

use serde::{Deserialize, Serialize};

use crate::model::{GeoPoint, MapCamera};

pub const ZOOM_STEP: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    camera: MapCamera,
    observed_center: Option<GeoPoint>,
    move_id: u64,
    min_zoom: f64,
    max_zoom: f64,
}

impl MapView {
    #[must_use]
    pub fn new(center: GeoPoint, zoom: f64, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            camera: MapCamera {
                center,
                zoom: zoom.clamp(min_zoom, max_zoom),
            },
            observed_center: None,
            move_id: 0,
            min_zoom,
            max_zoom,
        }
    }

    #[must_use]
    pub const fn camera(&self) -> MapCamera {
        self.camera
    }

    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    #[must_use]
    pub const fn move_id(&self) -> u64 {
        self.move_id
    }

    /// Where the user is currently looking: the last gesture-reported
    /// centre, or the last programmatic one.
    #[must_use]
    pub fn viewport_center(&self) -> GeoPoint {
        self.observed_center.unwrap_or(self.camera.center)
    }

    pub fn move_to(&mut self, center: GeoPoint, zoom: f64) -> MapCamera {
        self.camera = MapCamera {
            center,
            zoom: zoom.clamp(self.min_zoom, self.max_zoom),
        };
        self.observed_center = None;
        self.move_id += 1;
        self.camera
    }

    pub fn zoom_in(&mut self) -> MapCamera {
        self.move_to(self.viewport_center(), self.camera.zoom + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> MapCamera {
        self.move_to(self.viewport_center(), self.camera.zoom - ZOOM_STEP)
    }

    pub fn recenter_on(&mut self, point: GeoPoint) -> MapCamera {
        self.move_to(point, self.camera.zoom)
    }

    /// Gesture feedback from the map widget.
    pub fn camera_changed(&mut self, center: GeoPoint, zoom: f64) {
        if zoom.is_finite() {
            self.camera.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
        if center.lat.is_finite() && center.lon.is_finite() {
            self.observed_center = Some(center);
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::capabilities::{LocationSubscription, SubscriptionId};
use crate::config::AppConfig;
use crate::map_view::MapView;
use crate::tiles::TileStyle;

/// A WGS84 position. Internal order is always latitude first.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a point from a wire pair ordered `[lon, lat]`.
    #[must_use]
    pub const fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }
}

/// A single location sample reported by the platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub point: GeoPoint,
    pub accuracy_m: Option<f64>,
    pub timestamp_ms: Option<u64>,
}

impl LocationFix {
    #[must_use]
    pub const fn at(point: GeoPoint) -> Self {
        Self {
            point,
            accuracy_m: None,
            timestamp_ms: None,
        }
    }
}

/// Ordered polyline from the user's position to the destination.
/// Empty means there is nothing to draw.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePath(Vec<GeoPoint>);

impl RoutePath {
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn start(&self) -> Option<GeoPoint> {
        self.0.first().copied()
    }

    #[must_use]
    pub fn end(&self) -> Option<GeoPoint> {
        self.0.last().copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<GeoPoint>> for RoutePath {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }
}

impl FromIterator<GeoPoint> for RoutePath {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Viewport of the map.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapCamera {
    pub center: GeoPoint,
    pub zoom: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first acquisition to finish.
    Initializing,
    Ready,
    /// Acquisition finished without a fix. Terminal for the screen's life.
    LocationUnavailable,
}

/// Everything the map screen knows. Created at mount, dropped at unmount.
#[derive(Debug)]
pub struct Model {
    pub config: AppConfig,
    pub mounted: bool,
    pub loading: bool,
    pub current_location: Option<LocationFix>,
    pub selected_destination: Option<GeoPoint>,
    pub current_route: RoutePath,
    /// Sequence number of the most recently dispatched route request.
    pub route_seq: u64,
    pub map: MapView,
    pub tile_style: TileStyle,
    pub subscription: Option<LocationSubscription>,
    next_subscription: u64,
}

impl Model {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let map = MapView::new(
            config.fallback_center,
            config.default_zoom,
            config.min_zoom,
            config.max_zoom,
        );
        let tile_style = config.initial_tile_style;

        Self {
            config,
            mounted: false,
            loading: true,
            current_location: None,
            selected_destination: None,
            current_route: RoutePath::empty(),
            route_seq: 0,
            map,
            tile_style,
            subscription: None,
            next_subscription: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Initializing
        } else if self.current_location.is_some() {
            Phase::Ready
        } else {
            Phase::LocationUnavailable
        }
    }

    /// Starts a fresh screen from the current configuration. The route
    /// sequence and subscription counters keep counting so responses and
    /// updates addressed to the previous screen never match.
    pub fn remount(&mut self) {
        let route_seq = self.route_seq + 1;
        let next_subscription = self.next_subscription;
        *self = Self::new(self.config.clone());
        self.route_seq = route_seq;
        self.next_subscription = next_subscription;
        self.mounted = true;
    }

    pub fn next_subscription_id(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }

    #[must_use]
    pub fn active_subscription(&self) -> Option<SubscriptionId> {
        self.subscription.as_ref().map(LocationSubscription::id)
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lon_lat_constructor_swaps_into_lat_first() {
        let p = GeoPoint::from_lon_lat(12.0, 55.0);
        assert_eq!(p, GeoPoint::new(55.0, 12.0));
    }

    #[test]
    fn new_model_is_initializing() {
        let model = Model::default();
        assert!(model.loading);
        assert_eq!(model.phase(), Phase::Initializing);
        assert!(model.current_route.is_empty());
    }

    #[test]
    fn phase_after_loading() {
        let mut model = Model::default();
        model.loading = false;
        assert_eq!(model.phase(), Phase::LocationUnavailable);

        model.current_location = Some(LocationFix::at(GeoPoint::new(1.0, 2.0)));
        assert_eq!(model.phase(), Phase::Ready);
    }

    #[test]
    fn subscription_ids_increase() {
        let mut model = Model::default();
        let a = model.next_subscription_id();
        let b = model.next_subscription_id();
        assert!(b > a);
    }

    #[test]
    fn remount_resets_the_screen_but_keeps_counters() {
        let mut model = Model::default();
        model.loading = false;
        model.current_location = Some(LocationFix::at(GeoPoint::new(1.0, 2.0)));
        model.selected_destination = Some(GeoPoint::new(3.0, 4.0));
        model.current_route = vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)].into();
        model.route_seq = 4;
        let before = model.next_subscription_id();

        model.remount();

        assert!(model.mounted);
        assert_eq!(model.phase(), Phase::Initializing);
        assert!(model.current_location.is_none());
        assert!(model.selected_destination.is_none());
        assert!(model.current_route.is_empty());
        assert_eq!(model.route_seq, 5);
        assert!(model.next_subscription_id() > before);
    }

    #[test]
    fn route_path_endpoints() {
        let path: RoutePath = vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)].into();
        assert_eq!(path.start(), Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(path.end(), Some(GeoPoint::new(3.0, 4.0)));
        assert_eq!(path.len(), 2);
    }
}

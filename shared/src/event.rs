use serde::{Deserialize, Serialize};

use crate::capabilities::SubscriptionId;
use crate::config::AppConfig;
use crate::location::{LocationError, PermissionGranted};
use crate::model::{GeoPoint, LocationFix, RoutePath};
use crate::routing::RouteError;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Screen lifecycle
    /// Replaces the configuration. Only honoured before mount.
    Configure(Box<AppConfig>),
    ScreenMounted,
    ScreenUnmounted,

    // User input
    MapTapped {
        point: GeoPoint,
    },
    ZoomIn,
    ZoomOut,
    RecenterRequested,
    TileStyleToggled,
    /// Camera feedback from pan/zoom gestures.
    CameraChanged {
        center: GeoPoint,
        zoom: f64,
    },

    // Capability responses
    #[serde(skip)]
    PermissionChecked(Result<PermissionGranted, LocationError>),
    #[serde(skip)]
    FixAcquired(Result<LocationFix, LocationError>),
    #[serde(skip)]
    LocationUpdated {
        subscription: SubscriptionId,
        fix: LocationFix,
    },
    #[serde(skip)]
    RouteFetched {
        seq: u64,
        result: Result<RoutePath, RouteError>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::ScreenMounted => "screen_mounted",
            Self::ScreenUnmounted => "screen_unmounted",
            Self::MapTapped { .. } => "map_tapped",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::RecenterRequested => "recenter_requested",
            Self::TileStyleToggled => "tile_style_toggled",
            Self::CameraChanged { .. } => "camera_changed",
            Self::PermissionChecked(_) => "permission_checked",
            Self::FixAcquired(_) => "fix_acquired",
            Self::LocationUpdated { .. } => "location_updated",
            Self::RouteFetched { .. } => "route_fetched",
        }
    }

    /// Events that make sense before the screen is mounted.
    #[must_use]
    pub const fn allowed_while_unmounted(&self) -> bool {
        matches!(self, Self::Configure(_) | Self::ScreenMounted)
    }
}

//! Shared core for the single-screen map: live location, tile layers and
//! tap-to-route driving directions.
//!
//! The shell renders [`ViewModel`] and executes the [`Effect`]s the core
//! requests; all state transitions happen in [`App`].

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod location;
pub mod map_view;
pub mod model;
pub mod routing;
pub mod tiles;
pub mod view;

pub use app::App;
pub use capabilities::{
    Capabilities, Effect, LocationOperation, LocationOutput, LocationSubscription, SubscriptionId,
};
pub use config::{AppConfig, ConfigError, RetryPolicy, RoutingConfig};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use location::{LocationError, PermissionGranted, PermissionStatus};
pub use model::{GeoPoint, LocationFix, MapCamera, Model, Phase, RoutePath};
pub use routing::{RouteError, RouteRequest};
pub use tiles::{TileCoord, TileLayer, TileStyle};
pub use view::{CameraView, ScreenView, TileLayerView, ViewModel};

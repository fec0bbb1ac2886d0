use serde::{Deserialize, Serialize};

use crate::model::{GeoPoint, Model, Phase};
use crate::tiles::{TileLayer, TileStyle};

pub const COULD_NOT_GET_LOCATION: &str = "Could not get location";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CameraView {
    pub center: GeoPoint,
    pub zoom: f64,
    /// Changes whenever the core moves the camera on purpose.
    pub move_id: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScreenView {
    Loading,
    LocationUnavailable {
        message: String,
    },
    Map {
        user_marker: GeoPoint,
        destination_marker: Option<GeoPoint>,
        route: Vec<GeoPoint>,
        camera: CameraView,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TileLayerView {
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
    pub max_zoom: u8,
}

impl From<TileLayer> for TileLayerView {
    fn from(layer: TileLayer) -> Self {
        Self {
            url_template: layer.url_template.to_string(),
            subdomains: layer.subdomains.iter().map(ToString::to_string).collect(),
            attribution: layer.attribution.to_string(),
            max_zoom: layer.max_zoom,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub screen: ScreenView,
    pub tile_style: TileStyle,
    pub tile_layer: TileLayerView,
}

impl ViewModel {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        let screen = match (model.phase(), &model.current_location) {
            (Phase::Ready, Some(fix)) => {
                let camera = model.map.camera();
                ScreenView::Map {
                    user_marker: fix.point,
                    destination_marker: model.selected_destination,
                    route: model.current_route.points().to_vec(),
                    camera: CameraView {
                        center: camera.center,
                        zoom: camera.zoom,
                        move_id: model.map.move_id(),
                    },
                }
            }
            (Phase::LocationUnavailable, _) => ScreenView::LocationUnavailable {
                message: COULD_NOT_GET_LOCATION.to_string(),
            },
            _ => ScreenView::Loading,
        };

        Self {
            screen,
            tile_style: model.tile_style,
            tile_layer: model.tile_style.layer().into(),
        }
    }
}

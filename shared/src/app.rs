use tracing::{debug, info, warn};

use crate::capabilities::Capabilities;
use crate::event::Event;
use crate::model::{GeoPoint, LocationFix, Model, RoutePath};
use crate::routing::{self, RouteError, RouteRequest};
use crate::view::ViewModel;

#[derive(Default)]
pub struct App;

impl App {
    fn fix_acquired(fix: LocationFix, model: &mut Model, caps: &Capabilities) {
        info!(lat = fix.point.lat, lon = fix.point.lon, "first location fix");
        model.map.move_to(fix.point, model.map.zoom());
        model.current_location = Some(fix);

        if model.subscription.is_none() {
            let id = model.next_subscription_id();
            model.subscription = Some(caps.location.watch(id, move |fix| {
                Event::LocationUpdated {
                    subscription: id,
                    fix,
                }
            }));
        }
    }

    fn request_route(point: GeoPoint, model: &mut Model, caps: &Capabilities) {
        model.selected_destination = Some(point);
        model.current_route.clear();
        // Any response still in flight now belongs to an older tap.
        model.route_seq += 1;
        let seq = model.route_seq;

        let Some(origin) = model.current_location.as_ref().map(|fix| fix.point) else {
            debug!("tap before location is known, no route requested");
            return;
        };

        match RouteRequest::new(origin, point).url(&model.config.routing) {
            Ok(url) => {
                debug!(seq, %url, "requesting route");
                caps.http.get(url.as_str()).send(move |result| Event::RouteFetched {
                    seq,
                    result: routing::route_from_response(result),
                });
            }
            Err(e) => warn!(error = %e, "could not build route request"),
        }
    }

    fn route_fetched(seq: u64, result: Result<RoutePath, RouteError>, model: &mut Model) {
        if seq != model.route_seq {
            debug!(seq, latest = model.route_seq, "discarding stale route response");
            return;
        }

        match result {
            Ok(route) => {
                info!(points = route.len(), "route received");
                model.current_route = route;
            }
            Err(e) => warn!(error = %e, "route fetch failed"),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        if !model.mounted && !event.allowed_while_unmounted() {
            debug!(event = event.name(), "screen not mounted, ignoring event");
            return;
        }

        match event {
            Event::Configure(config) => {
                if model.mounted {
                    warn!("configuration can only change before mount");
                    return;
                }
                match config.validate() {
                    Ok(()) => *model = Model::new(*config),
                    Err(e) => warn!(error = %e, "rejected configuration"),
                }
            }

            Event::ScreenMounted => {
                if model.mounted {
                    debug!("screen already mounted");
                    return;
                }
                model.remount();
                info!("screen mounted, checking location permission");
                caps.location.check_permission(Event::PermissionChecked);
                caps.render.render();
            }

            Event::ScreenUnmounted => {
                model.mounted = false;
                if let Some(subscription) = model.subscription.take() {
                    info!(subscription = %subscription.id(), "screen unmounted");
                }
            }

            Event::PermissionChecked(result) => {
                match result {
                    Ok(_) => debug!("location permission granted"),
                    Err(e) => warn!(error = %e, "location permission check failed"),
                }
                caps.location
                    .acquire_fix(model.config.service_retry.clone(), Event::FixAcquired);
            }

            Event::FixAcquired(result) => {
                model.loading = false;
                match result {
                    Ok(fix) => Self::fix_acquired(fix, model, caps),
                    Err(e) => warn!(error = %e, "could not get location"),
                }
                caps.render.render();
            }

            Event::LocationUpdated { subscription, fix } => {
                if model.active_subscription() != Some(subscription) {
                    debug!(%subscription, "update from inactive subscription");
                    return;
                }
                model.current_location = Some(fix);
                caps.render.render();
            }

            Event::MapTapped { point } => {
                Self::request_route(point, model, caps);
                caps.render.render();
            }

            Event::RouteFetched { seq, result } => {
                Self::route_fetched(seq, result, model);
                caps.render.render();
            }

            Event::ZoomIn => {
                model.map.zoom_in();
                caps.render.render();
            }

            Event::ZoomOut => {
                model.map.zoom_out();
                caps.render.render();
            }

            Event::RecenterRequested => {
                match model.current_location.as_ref() {
                    Some(fix) => {
                        model.map.recenter_on(fix.point);
                    }
                    None => debug!("recenter requested without a location"),
                }
                caps.render.render();
            }

            Event::CameraChanged { center, zoom } => {
                model.map.camera_changed(center, zoom);
                caps.render.render();
            }

            Event::TileStyleToggled => {
                model.tile_style = model.tile_style.toggled();
                debug!(style = ?model.tile_style, "tile style toggled");
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from_model(model)
    }
}

use crux_core::testing::AppTester;
use shared::{
    App, AppConfig, Effect, Event, GeoPoint, LocationError, LocationFix, LocationOperation,
    Model, Phase, RouteError, RoutePath, ScreenView, TileStyle,
};

const HOME: GeoPoint = GeoPoint::new(55.6761, 12.5683);
const SHOP: GeoPoint = GeoPoint::new(55.6867, 12.5701);

fn app() -> AppTester<App, Effect> {
    AppTester::default()
}

fn location_ops(effects: &[Effect]) -> Vec<LocationOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Location(request) => Some(request.operation.clone()),
            _ => None,
        })
        .collect()
}

fn http_urls(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Http(request) => Some(request.operation.url.clone()),
            _ => None,
        })
        .collect()
}

fn renders(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Render(_)))
}

fn mounted_with_fix(app: &AppTester<App, Effect>, at: GeoPoint) -> Model {
    let mut model = Model::default();
    app.update(Event::ScreenMounted, &mut model);
    app.update(Event::FixAcquired(Ok(LocationFix::at(at))), &mut model);
    model
}

fn line(points: &[(f64, f64)]) -> RoutePath {
    points.iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)).collect()
}

#[test]
fn mount_starts_permission_check() {
    let app = app();
    let mut model = Model::default();

    let update = app.update(Event::ScreenMounted, &mut model);

    assert!(model.mounted);
    assert!(model.loading);
    assert_eq!(model.phase(), Phase::Initializing);
    assert_eq!(location_ops(&update.effects), vec![LocationOperation::IsServiceEnabled]);
    assert!(renders(&update.effects));
    assert_eq!(app.view(&model).screen, ScreenView::Loading);
}

#[test]
fn first_fix_centres_map_and_starts_watching() {
    let app = app();
    let mut model = Model::default();
    app.update(Event::ScreenMounted, &mut model);

    let fix = LocationFix {
        point: HOME,
        accuracy_m: Some(4.5),
        timestamp_ms: Some(1_700_000_000_000),
    };
    let update = app.update(Event::FixAcquired(Ok(fix.clone())), &mut model);

    assert!(!model.loading);
    assert_eq!(model.phase(), Phase::Ready);
    assert_eq!(model.current_location, Some(fix));
    assert_eq!(model.map.camera().center, HOME);
    assert!(model.subscription.is_some());
    assert_eq!(location_ops(&update.effects), vec![LocationOperation::Watch]);
    assert!(renders(&update.effects));

    let ScreenView::Map { user_marker, camera, .. } = app.view(&model).screen else {
        panic!("expected the map screen");
    };
    assert_eq!(user_marker, HOME);
    assert_eq!(camera.center, HOME);
}

#[test]
fn failed_acquisition_shows_could_not_get_location() {
    let app = app();
    let mut model = Model::default();
    app.update(Event::ScreenMounted, &mut model);

    let update = app.update(
        Event::FixAcquired(Err(LocationError::FixUnavailable("denied".into()))),
        &mut model,
    );

    assert!(!model.loading);
    assert_eq!(model.phase(), Phase::LocationUnavailable);
    assert!(model.subscription.is_none());
    assert!(location_ops(&update.effects).is_empty());
    assert!(matches!(
        app.view(&model).screen,
        ScreenView::LocationUnavailable { .. }
    ));
}

#[test]
fn remount_starts_a_fresh_screen() {
    let app = app();
    let mut model = Model::default();
    app.update(Event::ScreenMounted, &mut model);
    app.update(Event::FixAcquired(Err(LocationError::ServiceDisabled)), &mut model);
    assert!(!model.loading);

    app.update(Event::ScreenUnmounted, &mut model);
    let update = app.update(Event::ScreenMounted, &mut model);

    assert!(model.loading);
    assert_eq!(app.view(&model).screen, ScreenView::Loading);
    assert_eq!(location_ops(&update.effects), vec![LocationOperation::IsServiceEnabled]);
}

#[test]
fn route_requested_before_unmount_is_dropped_after_remount() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);
    app.update(Event::MapTapped { point: SHOP }, &mut model);
    let stale = model.route_seq;

    app.update(Event::ScreenUnmounted, &mut model);
    app.update(Event::ScreenMounted, &mut model);
    app.update(
        Event::RouteFetched {
            seq: stale,
            result: Ok(line(&[(1.0, 1.0), (2.0, 2.0)])),
        },
        &mut model,
    );

    assert!(model.loading);
    assert!(model.current_location.is_none());
    assert!(model.selected_destination.is_none());
    assert!(model.current_route.is_empty());
    assert_ne!(model.route_seq, stale);
}

#[test]
fn permission_result_triggers_acquisition_either_way() {
    let app = app();
    let mut model = Model::default();
    app.update(Event::ScreenMounted, &mut model);

    let update = app.update(
        Event::PermissionChecked(Err(LocationError::PermissionDenied)),
        &mut model,
    );
    assert_eq!(location_ops(&update.effects), vec![LocationOperation::IsServiceEnabled]);
}

#[test]
fn tap_without_location_does_not_fetch() {
    let app = app();
    let mut model = Model::default();
    app.update(Event::ScreenMounted, &mut model);

    let update = app.update(Event::MapTapped { point: SHOP }, &mut model);

    assert!(http_urls(&update.effects).is_empty());
    assert_eq!(model.selected_destination, Some(SHOP));
    assert!(model.current_route.is_empty());
}

#[test]
fn tap_requests_route_from_user_to_point() {
    let app = app();
    let mut model = mounted_with_fix(&app, GeoPoint::new(55.6, 12.5));

    let update = app.update(
        Event::MapTapped {
            point: GeoPoint::new(55.7, 12.6),
        },
        &mut model,
    );

    assert_eq!(
        http_urls(&update.effects),
        vec!["https://router.project-osrm.org/route/v1/driving/12.5,55.6;12.6,55.7?geometries=geojson"]
    );
    assert!(renders(&update.effects));
}

#[test]
fn fetched_route_is_displayed() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);
    app.update(Event::MapTapped { point: SHOP }, &mut model);

    let route = line(&[(55.0, 12.0), (55.1, 12.1)]);
    let update = app.update(
        Event::RouteFetched {
            seq: model.route_seq,
            result: Ok(route.clone()),
        },
        &mut model,
    );

    assert!(renders(&update.effects));
    assert_eq!(model.current_route, route);
    let ScreenView::Map {
        route: drawn,
        destination_marker,
        ..
    } = app.view(&model).screen
    else {
        panic!("expected the map screen");
    };
    assert_eq!(drawn, route.points());
    assert_eq!(destination_marker, Some(SHOP));
}

#[test]
fn failed_fetch_leaves_route_empty() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);

    for failure in [RouteError::Status(404), RouteError::NoRoute] {
        app.update(Event::MapTapped { point: SHOP }, &mut model);
        app.update(
            Event::RouteFetched {
                seq: model.route_seq,
                result: Err(failure),
            },
            &mut model,
        );
        assert!(model.current_route.is_empty());
        assert_eq!(model.phase(), Phase::Ready);
    }
}

#[test]
fn new_tap_clears_previous_route() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);
    app.update(Event::MapTapped { point: SHOP }, &mut model);
    app.update(
        Event::RouteFetched {
            seq: model.route_seq,
            result: Ok(line(&[(1.0, 1.0), (2.0, 2.0)])),
        },
        &mut model,
    );
    assert!(!model.current_route.is_empty());

    app.update(
        Event::MapTapped {
            point: GeoPoint::new(55.5, 12.4),
        },
        &mut model,
    );
    assert!(model.current_route.is_empty());
    assert_eq!(model.selected_destination, Some(GeoPoint::new(55.5, 12.4)));
}

#[test]
fn late_response_for_older_tap_is_discarded() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);

    app.update(Event::MapTapped { point: SHOP }, &mut model);
    let first = model.route_seq;
    app.update(
        Event::MapTapped {
            point: GeoPoint::new(55.5, 12.4),
        },
        &mut model,
    );
    let second = model.route_seq;

    app.update(
        Event::RouteFetched {
            seq: first,
            result: Ok(line(&[(1.0, 1.0), (2.0, 2.0)])),
        },
        &mut model,
    );
    assert!(model.current_route.is_empty());

    let latest = line(&[(3.0, 3.0), (4.0, 4.0)]);
    app.update(
        Event::RouteFetched {
            seq: second,
            result: Ok(latest.clone()),
        },
        &mut model,
    );
    assert_eq!(model.current_route, latest);
}

#[test]
fn live_updates_move_marker_but_keep_route() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);
    app.update(Event::MapTapped { point: SHOP }, &mut model);
    let route = line(&[(55.0, 12.0), (55.1, 12.1)]);
    app.update(
        Event::RouteFetched {
            seq: model.route_seq,
            result: Ok(route.clone()),
        },
        &mut model,
    );

    let subscription = model.active_subscription().unwrap();
    let moved = LocationFix::at(GeoPoint::new(55.68, 12.569));
    let update = app.update(
        Event::LocationUpdated {
            subscription,
            fix: moved.clone(),
        },
        &mut model,
    );

    assert!(renders(&update.effects));
    assert_eq!(model.current_location, Some(moved));
    assert_eq!(model.current_route, route);
    assert_eq!(model.map.camera().center, HOME);
}

#[test]
fn unmount_releases_subscription_and_silences_updates() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);
    let subscription = model.active_subscription().unwrap();

    let update = app.update(Event::ScreenUnmounted, &mut model);
    assert!(model.subscription.is_none());
    assert_eq!(location_ops(&update.effects), vec![LocationOperation::StopWatching]);

    let update = app.update(
        Event::LocationUpdated {
            subscription,
            fix: LocationFix::at(GeoPoint::new(0.0, 0.0)),
        },
        &mut model,
    );
    assert!(update.effects.is_empty());
    assert_eq!(model.current_location, Some(LocationFix::at(HOME)));
}

#[test]
fn zoom_round_trip_is_exact() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);
    let original = model.map.zoom();

    for _ in 0..4 {
        app.update(Event::ZoomIn, &mut model);
    }
    assert_eq!(model.map.zoom(), original + 4.0);
    for _ in 0..4 {
        app.update(Event::ZoomOut, &mut model);
    }
    assert_eq!(model.map.zoom(), original);
}

#[test]
fn recenter_returns_to_user_at_current_zoom() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);
    app.update(
        Event::CameraChanged {
            center: GeoPoint::new(40.0, -3.0),
            zoom: 8.0,
        },
        &mut model,
    );
    let before = model.map.move_id();

    app.update(Event::RecenterRequested, &mut model);

    let camera = model.map.camera();
    assert_eq!(camera.center, HOME);
    assert_eq!(camera.zoom, 8.0);
    assert_eq!(model.map.move_id(), before + 1);
}

#[test]
fn gestures_only_feed_back_zoom() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);
    let before = model.map.move_id();

    app.update(
        Event::CameraChanged {
            center: GeoPoint::new(40.0, -3.0),
            zoom: 11.0,
        },
        &mut model,
    );

    assert_eq!(model.map.zoom(), 11.0);
    assert_eq!(model.map.camera().center, HOME);
    assert_eq!(model.map.move_id(), before);
}

#[test]
fn tile_style_toggles_independently() {
    let app = app();
    let mut model = mounted_with_fix(&app, HOME);
    assert_eq!(model.tile_style, TileStyle::Satellite);

    app.update(Event::TileStyleToggled, &mut model);
    assert_eq!(model.tile_style, TileStyle::Street);
    assert_eq!(app.view(&model).tile_layer.subdomains, vec!["a", "b", "c"]);
    assert_eq!(model.phase(), Phase::Ready);

    app.update(Event::TileStyleToggled, &mut model);
    assert_eq!(model.tile_style, TileStyle::Satellite);
}

#[test]
fn events_before_mount_are_ignored() {
    let app = app();
    let mut model = Model::default();

    let update = app.update(Event::ZoomIn, &mut model);
    assert!(update.effects.is_empty());
    assert_eq!(model.map.zoom(), AppConfig::default().default_zoom);

    let update = app.update(Event::MapTapped { point: SHOP }, &mut model);
    assert!(update.effects.is_empty());
    assert!(model.selected_destination.is_none());
}

#[test]
fn configure_applies_only_before_mount() {
    let app = app();
    let mut model = Model::default();

    let config = AppConfig {
        default_zoom: 10.0,
        initial_tile_style: TileStyle::Street,
        ..AppConfig::default()
    };
    app.update(Event::Configure(Box::new(config)), &mut model);
    assert_eq!(model.map.zoom(), 10.0);
    assert_eq!(model.tile_style, TileStyle::Street);

    app.update(Event::ScreenMounted, &mut model);
    let late = AppConfig {
        default_zoom: 5.0,
        ..AppConfig::default()
    };
    app.update(Event::Configure(Box::new(late)), &mut model);
    assert_eq!(model.map.zoom(), 10.0);
}

#[test]
fn invalid_configuration_is_rejected() {
    let app = app();
    let mut model = Model::default();

    let config = AppConfig {
        min_zoom: 10.0,
        max_zoom: 3.0,
        ..AppConfig::default()
    };
    app.update(Event::Configure(Box::new(config)), &mut model);
    assert_eq!(model.config, AppConfig::default());
}

use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use crate::{
    gtfs::{GtfsRoute, GtfsStop},
    pipeline::{
        self, Config,
        naming::{self, TransportType},
        shapes::ShapePath,
        stop_times::StopMembership,
        trips::{DirectedRouteKey, TripIndex},
    },
    shared::{Coordinate, Distance, OrderedSet, digits},
};

const STOPS_TABLE: &str = "stops";

/// One entry of the routes document. Field order is the document's key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub id: String,
    pub description: String,
    pub name_numeric: String,
    pub tracker_id: String,
    pub points: Vec<Coordinate>,
    pub stops_forward: Vec<String>,
    pub stops_backward: Vec<String>,
    #[serde(rename = "type")]
    pub transport_type: TransportType,
    pub price: u32,
    pub midpoint: u32,
    pub work_start: String,
    pub length_forward: Distance,
    pub work_end: String,
    pub length_backward: Distance,
    pub name: String,
}

/// One entry of the stops document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopRecord {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub routes: Vec<String>,
}

const HOURS_FORMAT: &str = "%H:%M:%S";

fn rendered(set: Option<&OrderedSet<std::sync::Arc<str>>>) -> Vec<String> {
    set.map(OrderedSet::to_strings).unwrap_or_default()
}

/// Builds one record per route row.
///
/// The forward path comes first in `points`, followed by the backward path as-is. Routes
/// without a path or stops in a direction get an empty path, zero length and no stops.
pub fn assemble_route(
    route: &GtfsRoute,
    trips: &TripIndex,
    membership: &StopMembership,
    config: &Config,
) -> RouteRecord {
    let empty = ShapePath::default();
    let forward = trips
        .path(&DirectedRouteKey::forward(&route.route_id))
        .unwrap_or(&empty);
    let backward = trips
        .path(&DirectedRouteKey::backward(&route.route_id))
        .unwrap_or(&empty);
    let points = forward
        .points
        .iter()
        .chain(backward.points.iter())
        .copied()
        .collect();
    let resolved = naming::resolve(&route.route_short_name);

    RouteRecord {
        id: route.route_id.clone(),
        description: route.route_long_name.clone(),
        name_numeric: digits(&route.route_short_name),
        tracker_id: config.tracker_id.clone(),
        points,
        stops_forward: rendered(membership.forward_stops(&route.route_id)),
        stops_backward: rendered(membership.backward_stops(&route.route_id)),
        transport_type: resolved.transport_type,
        price: config.price,
        midpoint: config.midpoint,
        work_start: config.work_start.format(HOURS_FORMAT).to_string(),
        length_forward: forward.total_length,
        work_end: config.work_end.format(HOURS_FORMAT).to_string(),
        length_backward: backward.total_length,
        name: resolved.name,
    }
}

pub fn assemble_routes(
    routes: &[GtfsRoute],
    trips: &TripIndex,
    membership: &StopMembership,
    config: &Config,
) -> Vec<RouteRecord> {
    debug!("Assembling routes...");
    let now = Instant::now();
    let records: Vec<_> = routes
        .iter()
        .map(|route| assemble_route(route, trips, membership, config))
        .collect();
    debug!("Assembling routes took {:?}", now.elapsed());
    records
}

/// Builds one record per stop row. Stops no route serves get an empty `routes` list.
pub fn assemble_stops(
    stops: &[GtfsStop],
    membership: &StopMembership,
) -> Result<Vec<StopRecord>, pipeline::Error> {
    debug!("Assembling stops...");
    let now = Instant::now();
    let records = stops
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            Ok(StopRecord {
                id: stop.stop_id.clone(),
                lat: pipeline::parse_float(STOPS_TABLE, i, "stop_lat", &stop.stop_lat)?,
                lng: pipeline::parse_float(STOPS_TABLE, i, "stop_lon", &stop.stop_lon)?,
                name: stop.stop_name.clone(),
                routes: rendered(membership.routes_for(&stop.stop_id)),
            })
        })
        .collect::<Result<Vec<_>, pipeline::Error>>()?;
    debug!("Assembling stops took {:?}", now.elapsed());
    Ok(records)
}

#[cfg(test)]
fn route(route_id: &str, short_name: &str) -> GtfsRoute {
    GtfsRoute {
        route_id: route_id.into(),
        route_short_name: short_name.into(),
        route_long_name: format!("{route_id} long"),
    }
}

#[test]
fn forward_then_backward_points() {
    let forward = ShapePath::new(
        vec![Coordinate::new(10.0, 20.0), Coordinate::new(10.1, 20.1)],
        Distance::new(5.0),
    );
    let backward = ShapePath::new(vec![Coordinate::new(11.0, 21.0)], Distance::new(3.0));
    let mut trips = TripIndex::default();
    trips
        .by_directed_route
        .insert(DirectedRouteKey::forward("R1"), &forward);
    trips
        .by_directed_route
        .insert(DirectedRouteKey::backward("R1"), &backward);

    let record = assemble_route(
        &route("R1", "Тр5"),
        &trips,
        &StopMembership::default(),
        &Config::default(),
    );
    assert_eq!(
        record.points,
        vec![
            Coordinate::new(10.0, 20.0),
            Coordinate::new(10.1, 20.1),
            Coordinate::new(11.0, 21.0)
        ]
    );
    assert_eq!(record.length_forward, Distance::new(5.0));
    assert_eq!(record.length_backward, Distance::new(3.0));
    assert_eq!(record.transport_type, TransportType::Tram);
    assert_eq!(record.name, "5");
}

#[test]
fn route_without_trips_is_empty() {
    let record = assemble_route(
        &route("R9", "А12"),
        &TripIndex::default(),
        &StopMembership::default(),
        &Config::default(),
    );
    assert!(record.points.is_empty());
    assert_eq!(record.length_forward, Distance::ZERO);
    assert_eq!(record.length_backward, Distance::ZERO);
    assert!(record.stops_forward.is_empty());
    assert!(record.stops_backward.is_empty());
    assert_eq!(record.name_numeric, "12");
    assert_eq!(record.name, "12");
    assert_eq!(record.transport_type, TransportType::Taxi);
}

#[test]
fn placeholders_come_from_config() {
    let config = Config {
        price: 25,
        tracker_id: "TRK1".into(),
        ..Default::default()
    };
    let record = assemble_route(
        &route("R1", "Т3"),
        &TripIndex::default(),
        &StopMembership::default(),
        &config,
    );
    assert_eq!(record.price, 25);
    assert_eq!(record.tracker_id, "TRK1");
    assert_eq!(record.midpoint, 0);
    assert_eq!(record.work_start, "00:00:00");
    assert_eq!(record.work_end, "00:00:00");
}

#[test]
fn stop_without_routes_is_kept() {
    let stops = vec![GtfsStop {
        stop_id: "S1".into(),
        stop_name: "Central".into(),
        stop_lat: "59,5".into(),
        stop_lon: "18.25".into(),
    }];
    let records = assemble_stops(&stops, &StopMembership::default()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].lat, 59.5);
    assert_eq!(records[0].lng, 18.25);
    assert!(records[0].routes.is_empty());
}

#[test]
fn stop_with_bad_coordinate_fails() {
    let stops = vec![GtfsStop {
        stop_id: "S1".into(),
        stop_name: "Central".into(),
        stop_lat: "".into(),
        stop_lon: "18.25".into(),
    }];
    assert!(assemble_stops(&stops, &StopMembership::default()).is_err());
}

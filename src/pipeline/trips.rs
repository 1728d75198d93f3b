use std::{collections::HashMap, fmt::Display, sync::Arc, time::Instant};
use tracing::debug;

use crate::{
    gtfs::GtfsTrip,
    pipeline::shapes::{ShapePath, ShapePaths},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    /// Anything other than `0` or `1`, kept verbatim.
    Other(Arc<str>),
}

impl Direction {
    /// Never fails: anything but a trimmed `0` or `1` becomes [`Direction::Other`].
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "0" => Direction::Forward,
            "1" => Direction::Backward,
            other => Direction::Other(other.into()),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => f.write_str("0"),
            Direction::Backward => f.write_str("1"),
            Direction::Other(value) => f.write_str(value),
        }
    }
}

/// A route in one direction. Displays as `<direction>_<route_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectedRouteKey {
    pub direction: Direction,
    pub route_id: Arc<str>,
}

impl DirectedRouteKey {
    pub fn new(direction: Direction, route_id: impl Into<Arc<str>>) -> Self {
        Self {
            direction,
            route_id: route_id.into(),
        }
    }

    pub fn forward(route_id: &str) -> Self {
        Self::new(Direction::Forward, route_id)
    }

    pub fn backward(route_id: &str) -> Self {
        Self::new(Direction::Backward, route_id)
    }
}

impl Display for DirectedRouteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}_{}", self.direction, self.route_id))
    }
}

type IdToId = HashMap<Arc<str>, Arc<str>>;

/// The direction of a trip that was indexed, which is never [`Direction::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Forward,
    Backward,
}

/// Trips resolved against the shape paths.
#[derive(Debug, Default)]
pub struct TripIndex<'a> {
    pub by_directed_route: HashMap<DirectedRouteKey, &'a ShapePath>,
    pub forward_trip_to_route: IdToId,
    pub backward_trip_to_route: IdToId,
}

impl<'a> TripIndex<'a> {
    pub fn path(&self, key: &DirectedRouteKey) -> Option<&'a ShapePath> {
        self.by_directed_route.get(key).copied()
    }

    /// The route a trip belongs to, with the direction it runs in.
    pub fn route_of(&self, trip_id: &str) -> Option<(Heading, &Arc<str>)> {
        if let Some(route_id) = self.forward_trip_to_route.get(trip_id) {
            Some((Heading::Forward, route_id))
        } else {
            self.backward_trip_to_route
                .get(trip_id)
                .map(|route_id| (Heading::Backward, route_id))
        }
    }
}

/// Files each trip's shape under its route and direction, and indexes trip to route for
/// the forward and backward directions.
///
/// When several trips of one route and direction have shapes, the last one wins. A trip
/// whose shape is unknown leaves any earlier path in place.
pub fn resolve_trips<'a>(trips: &[GtfsTrip], shapes: &'a ShapePaths) -> TripIndex<'a> {
    debug!("Resolving trips...");
    let now = Instant::now();
    let mut route_lookup: HashMap<&str, Arc<str>> = HashMap::new();
    let mut index = TripIndex::default();
    let mut missing_shapes = 0usize;
    for trip in trips {
        let route_id = route_lookup
            .entry(trip.route_id.as_str())
            .or_insert_with(|| trip.route_id.as_str().into())
            .clone();
        let direction = Direction::parse(&trip.direction_id);

        if let Some(path) = shapes.get(trip.shape_id.as_str()) {
            let key = DirectedRouteKey::new(direction.clone(), route_id.clone());
            index.by_directed_route.insert(key, path);
        } else {
            missing_shapes += 1;
        }

        let trip_id: Arc<str> = trip.trip_id.as_str().into();
        match direction {
            Direction::Forward => {
                index.forward_trip_to_route.insert(trip_id, route_id);
            }
            Direction::Backward => {
                index.backward_trip_to_route.insert(trip_id, route_id);
            }
            Direction::Other(_) => (),
        }
    }
    debug!(
        directed_routes = index.by_directed_route.len(),
        forward = index.forward_trip_to_route.len(),
        backward = index.backward_trip_to_route.len(),
        missing_shapes,
        "Resolving trips took {:?}",
        now.elapsed()
    );
    index
}

#[cfg(test)]
fn trip(trip_id: &str, route_id: &str, direction_id: &str, shape_id: &str) -> GtfsTrip {
    GtfsTrip {
        trip_id: trip_id.into(),
        route_id: route_id.into(),
        direction_id: direction_id.into(),
        shape_id: shape_id.into(),
    }
}

#[cfg(test)]
fn shapes_fixture() -> ShapePaths {
    use crate::shared::{Coordinate, Distance};
    let mut shapes = ShapePaths::new();
    shapes.insert(
        "S1".into(),
        ShapePath::new(vec![Coordinate::new(1.0, 1.0)], Distance::new(1.0)),
    );
    shapes.insert(
        "S2".into(),
        ShapePath::new(vec![Coordinate::new(2.0, 2.0)], Distance::new(2.0)),
    );
    shapes
}

#[test]
fn direction_parse() {
    assert_eq!(Direction::parse("0"), Direction::Forward);
    assert_eq!(Direction::parse(" 1 "), Direction::Backward);
    assert_eq!(Direction::parse("2"), Direction::Other("2".into()));
    assert_eq!(Direction::parse(""), Direction::Other("".into()));
}

#[test]
fn direction_parse_is_exact() {
    assert_eq!(Direction::parse("00"), Direction::Other("00".into()));
    assert_eq!(Direction::parse("+0"), Direction::Other("+0".into()));
    assert_eq!(Direction::parse("1.0"), Direction::Other("1.0".into()));
}

#[test]
fn key_display() {
    assert_eq!(DirectedRouteKey::forward("R7").to_string(), "0_R7");
    assert_eq!(DirectedRouteKey::backward("R7").to_string(), "1_R7");
}

#[test]
fn trips_are_partitioned_by_direction() {
    let shapes = shapes_fixture();
    let trips = vec![
        trip("T1", "R1", "0", "S1"),
        trip("T2", "R1", "1", "S2"),
        trip("T3", "R1", "x", "S1"),
        trip("T4", "R1", "00", "S1"),
    ];
    let index = resolve_trips(&trips, &shapes);
    assert_eq!(&*index.forward_trip_to_route["T1"], "R1");
    assert_eq!(&*index.backward_trip_to_route["T2"], "R1");
    assert!(index.route_of("T3").is_none());
    assert!(index.route_of("T4").is_none());
    assert_eq!(index.route_of("T1").map(|(heading, _)| heading), Some(Heading::Forward));
    assert_eq!(index.route_of("T2").map(|(heading, _)| heading), Some(Heading::Backward));
    assert_eq!(
        index.path(&DirectedRouteKey::backward("R1")),
        Some(&shapes["S2"])
    );
}

#[test]
fn unknown_shape_keeps_earlier_path() {
    let shapes = shapes_fixture();
    let trips = vec![trip("T1", "R1", "0", "S1"), trip("T2", "R1", "0", "nope")];
    let index = resolve_trips(&trips, &shapes);
    assert_eq!(
        index.path(&DirectedRouteKey::forward("R1")),
        Some(&shapes["S1"])
    );
    assert_eq!(index.forward_trip_to_route.len(), 2);
}

#[test]
fn last_resolved_shape_wins() {
    let shapes = shapes_fixture();
    let trips = vec![trip("T1", "R1", "0", "S1"), trip("T2", "R1", "0", "S2")];
    let index = resolve_trips(&trips, &shapes);
    assert_eq!(
        index.path(&DirectedRouteKey::forward("R1")),
        Some(&shapes["S2"])
    );
}

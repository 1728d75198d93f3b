use std::{collections::HashMap, sync::Arc, time::Instant};
use tracing::debug;

use crate::{
    gtfs::GtfsStopTime,
    pipeline::trips::{Heading, TripIndex},
    shared::OrderedSet,
};

pub type IdToIds = HashMap<Arc<str>, OrderedSet<Arc<str>>>;

/// Which routes serve each stop, and which stops each route visits per direction.
#[derive(Debug, Default)]
pub struct StopMembership {
    pub routes_by_stop: IdToIds,
    pub forward_stops_by_route: IdToIds,
    pub backward_stops_by_route: IdToIds,
}

impl StopMembership {
    pub fn routes_for(&self, stop_id: &str) -> Option<&OrderedSet<Arc<str>>> {
        self.routes_by_stop.get(stop_id)
    }

    pub fn forward_stops(&self, route_id: &str) -> Option<&OrderedSet<Arc<str>>> {
        self.forward_stops_by_route.get(route_id)
    }

    pub fn backward_stops(&self, route_id: &str) -> Option<&OrderedSet<Arc<str>>> {
        self.backward_stops_by_route.get(route_id)
    }
}

/// Correlates stop times with routes through their trips.
///
/// Stop times whose trip is unknown, or runs in neither direction, are skipped.
pub fn aggregate_stop_times(stop_times: &[GtfsStopTime], trips: &TripIndex) -> StopMembership {
    debug!("Aggregating stop times...");
    let now = Instant::now();
    let mut stop_lookup: HashMap<&str, Arc<str>> = HashMap::new();
    let mut membership = StopMembership::default();
    let mut skipped = 0usize;
    for stop_time in stop_times {
        let Some((heading, route_id)) = trips.route_of(&stop_time.trip_id) else {
            skipped += 1;
            continue;
        };
        let stop_id = stop_lookup
            .entry(stop_time.stop_id.as_str())
            .or_insert_with(|| stop_time.stop_id.as_str().into())
            .clone();

        let stops_by_route = match heading {
            Heading::Forward => &mut membership.forward_stops_by_route,
            Heading::Backward => &mut membership.backward_stops_by_route,
        };
        stops_by_route
            .entry(route_id.clone())
            .or_default()
            .insert(stop_id.clone());
        membership
            .routes_by_stop
            .entry(stop_id)
            .or_default()
            .insert(route_id.clone());
    }
    debug!(
        stops = membership.routes_by_stop.len(),
        skipped,
        "Aggregating stop times took {:?}",
        now.elapsed()
    );
    membership
}

#[cfg(test)]
fn fixture() -> TripIndex<'static> {
    let mut index = TripIndex::default();
    index
        .forward_trip_to_route
        .insert("T1".into(), "R1".into());
    index
        .forward_trip_to_route
        .insert("T2".into(), "R1".into());
    index
        .backward_trip_to_route
        .insert("T3".into(), "R1".into());
    index
        .forward_trip_to_route
        .insert("T4".into(), "R2".into());
    index
}

#[cfg(test)]
fn stop_time(trip_id: &str, stop_id: &str) -> GtfsStopTime {
    GtfsStopTime {
        trip_id: trip_id.into(),
        stop_id: stop_id.into(),
    }
}

#[cfg(test)]
fn ids(set: Option<&OrderedSet<Arc<str>>>) -> Vec<String> {
    set.map(OrderedSet::to_strings).unwrap_or_default()
}

#[test]
fn stops_are_bucketed_by_direction() {
    let index = fixture();
    let stop_times = vec![
        stop_time("T1", "A"),
        stop_time("T1", "B"),
        stop_time("T3", "B"),
        stop_time("T3", "C"),
    ];
    let membership = aggregate_stop_times(&stop_times, &index);
    assert_eq!(ids(membership.forward_stops("R1")), vec!["A", "B"]);
    assert_eq!(ids(membership.backward_stops("R1")), vec!["B", "C"]);
    assert_eq!(ids(membership.routes_for("B")), vec!["R1"]);
}

#[test]
fn pairs_are_deduplicated_in_first_seen_order() {
    let index = fixture();
    let stop_times = vec![
        stop_time("T1", "B"),
        stop_time("T2", "A"),
        stop_time("T2", "B"),
        stop_time("T4", "A"),
        stop_time("T1", "B"),
    ];
    let membership = aggregate_stop_times(&stop_times, &index);
    assert_eq!(ids(membership.forward_stops("R1")), vec!["B", "A"]);
    assert_eq!(ids(membership.routes_for("A")), vec!["R1", "R2"]);
    assert_eq!(ids(membership.routes_for("B")), vec!["R1"]);
}

#[test]
fn unknown_trips_are_skipped() {
    let index = fixture();
    let stop_times = vec![stop_time("ghost", "A")];
    let membership = aggregate_stop_times(&stop_times, &index);
    assert!(membership.routes_for("A").is_none());
    assert!(membership.forward_stops_by_route.is_empty());
}

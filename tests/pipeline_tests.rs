use routebake::{
    gtfs::{Feed, GtfsReader, GtfsShape},
    pipeline::{self, Config, ShapeLength, TransportType},
    shared::{Coordinate, Distance},
};
use std::path::PathBuf;

fn feed_dir() -> PathBuf {
    PathBuf::from(format!("{}/tests/data/feed", env!("CARGO_MANIFEST_DIR")))
}

fn build() -> pipeline::Documents {
    routebake::run(&GtfsReader::from_dir(feed_dir()), &Config::default()).unwrap()
}

#[test]
fn routes_follow_input_order() {
    let documents = build();
    let ids: Vec<_> = documents.routes.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["R1", "R2", "R3", "R4"]);
}

#[test]
fn tram_route_merges_both_directions() {
    let documents = build();
    let tram = &documents.routes[0];
    assert_eq!(tram.transport_type, TransportType::Tram);
    assert_eq!(tram.name, "5");
    assert_eq!(tram.name_numeric, "5");
    assert_eq!(tram.description, "Вокзал - Центр");
    assert_eq!(
        tram.points,
        vec![
            Coordinate::new(10.0, 20.0),
            Coordinate::new(10.1, 20.1),
            Coordinate::new(11.0, 21.0),
        ]
    );
    assert_eq!(tram.length_forward, Distance::new(5.0));
    assert_eq!(tram.length_backward, Distance::new(3.0));
    assert_eq!(tram.stops_forward, vec!["S1", "S2"]);
    assert_eq!(tram.stops_backward, vec!["S2", "S1"]);
}

#[test]
fn trolleybus_route() {
    let documents = build();
    let trolleybus = &documents.routes[1];
    assert_eq!(trolleybus.transport_type, TransportType::Trolleybuses);
    assert_eq!(trolleybus.name, "12");
    assert_eq!(trolleybus.points.len(), 2);
    assert_eq!(trolleybus.length_forward, Distance::ZERO);
    assert_eq!(trolleybus.stops_forward, vec!["S3", "S2"]);
    assert!(trolleybus.stops_backward.is_empty());
}

#[test]
fn taxi_route_with_unknown_shape() {
    let documents = build();
    let taxi = &documents.routes[2];
    assert_eq!(taxi.transport_type, TransportType::Taxi);
    assert_eq!(taxi.name, "7");
    assert!(taxi.points.is_empty());
    assert_eq!(taxi.length_backward, Distance::ZERO);
    assert_eq!(taxi.stops_backward, vec!["S3"]);
}

#[test]
fn route_without_trips_is_empty() {
    let documents = build();
    let idle = &documents.routes[3];
    assert_eq!(idle.name, "40");
    assert!(idle.points.is_empty());
    assert_eq!(idle.length_forward, Distance::ZERO);
    assert_eq!(idle.length_backward, Distance::ZERO);
    assert!(idle.stops_forward.is_empty());
    assert!(idle.stops_backward.is_empty());
}

#[test]
fn stops_list_serving_routes_once() {
    let documents = build();
    let routes: Vec<_> = documents
        .stops
        .iter()
        .map(|s| (s.id.as_str(), s.routes.clone()))
        .collect();
    assert_eq!(
        routes,
        vec![
            ("S1", vec!["R1".to_string()]),
            ("S2", vec!["R1".to_string(), "R2".to_string()]),
            ("S3", vec!["R2".to_string(), "R3".to_string()]),
            ("S4", vec![]),
        ]
    );
    assert_eq!(documents.stops[1].lat, 10.1);
    assert_eq!(documents.stops[1].lng, 20.1);
}

#[test]
fn every_forward_stop_time_is_reflected() {
    let feed = GtfsReader::from_dir(feed_dir()).load().unwrap();
    let documents = pipeline::build(&feed, &Config::default()).unwrap();
    let forward_trips = [("T1", "R1"), ("T3", "R1"), ("T4", "R2")];
    for stop_time in &feed.stop_times {
        let Some((_, route_id)) = forward_trips
            .iter()
            .find(|(trip_id, _)| *trip_id == stop_time.trip_id)
        else {
            continue;
        };
        let route = documents.routes.iter().find(|r| r.id == *route_id).unwrap();
        let stop = documents
            .stops
            .iter()
            .find(|s| s.id == stop_time.stop_id)
            .unwrap();
        assert!(route.stops_forward.contains(&stop_time.stop_id));
        assert!(stop.routes.iter().any(|id| id == route_id));
    }
}

#[test]
fn sum_mode_adds_distances() {
    let mut feed = GtfsReader::from_dir(feed_dir()).load().unwrap();
    feed.shapes.push(GtfsShape {
        shape_id: "SH2".into(),
        shape_pt_lat: "11.1".into(),
        shape_pt_lon: "21.1".into(),
        shape_dist_traveled: "4".into(),
    });
    let last = pipeline::build(&feed, &Config::default()).unwrap();
    assert_eq!(last.routes[0].length_backward, Distance::new(4.0));

    let config = Config {
        shape_length: ShapeLength::Sum,
        ..Default::default()
    };
    let sum = pipeline::build(&feed, &config).unwrap();
    assert_eq!(sum.routes[0].length_backward, Distance::new(7.0));
}

#[test]
fn malformed_stop_fails_the_run() {
    let mut feed: Feed = GtfsReader::from_dir(feed_dir()).load().unwrap();
    feed.stops[3].stop_lon = "east".into();
    let err = pipeline::build(&feed, &Config::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed stop_lon in stops line 5: \"east\""
    );
}

#[test]
fn empty_feed_builds_empty_documents() {
    let documents = pipeline::build(&Feed::default(), &Config::default()).unwrap();
    assert!(documents.routes.is_empty());
    assert!(documents.stops.is_empty());
}

#[test]
fn non_finite_stop_coordinate_fails_the_run() {
    for value in ["NaN", "inf"] {
        let mut feed = GtfsReader::from_dir(feed_dir()).load().unwrap();
        feed.stops[0].stop_lat = value.into();
        let err = pipeline::build(&feed, &Config::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Malformed stop_lat in stops line 2: \"{value}\"")
        );
    }
}

#[test]
fn non_finite_shape_distance_fails_the_run() {
    for value in ["nan", "inf"] {
        let mut feed = GtfsReader::from_dir(feed_dir()).load().unwrap();
        feed.shapes[0].shape_dist_traveled = value.into();
        let err = pipeline::build(&feed, &Config::default()).unwrap_err();
        assert!(matches!(
            err,
            pipeline::Error::Malformed {
                table: "shapes",
                field: "shape_dist_traveled",
                line: 2,
                ..
            }
        ));
    }
}

#[test]
fn non_finite_shape_point_fails_the_run() {
    let mut feed = GtfsReader::from_dir(feed_dir()).load().unwrap();
    feed.shapes[0].shape_pt_lat = "-infinity".into();
    assert!(pipeline::build(&feed, &Config::default()).is_err());
}

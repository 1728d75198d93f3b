use routebake::{gtfs::GtfsReader, output, pipeline::Config};
use std::{fs, path::PathBuf};

fn feed_dir() -> PathBuf {
    PathBuf::from(format!("{}/tests/data/feed", env!("CARGO_MANIFEST_DIR")))
}

#[test]
fn write_documents_test() {
    let working_dir = tempfile::tempdir().unwrap();
    let routes_path = working_dir.path().join("routes.json");
    let stops_path = working_dir.path().join("stops.json");
    fs::write(&routes_path, "stale").unwrap();

    let documents = routebake::run(&GtfsReader::from_dir(feed_dir()), &Config::default()).unwrap();
    output::write_documents(&documents, &routes_path, &stops_path, false).unwrap();

    let routes: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&routes_path).unwrap()).unwrap();
    let tram = &routes[0];
    assert_eq!(tram["id"], "R1");
    assert_eq!(tram["type"], "tram");
    assert_eq!(tram["price"], 10);
    assert_eq!(tram["midpoint"], 0);
    assert_eq!(tram["tracker_id"], "XXXXXX");
    assert_eq!(tram["work_start"], "00:00:00");
    assert_eq!(tram["work_end"], "00:00:00");
    assert_eq!(
        tram["points"],
        serde_json::json!([[10.0, 20.0], [10.1, 20.1], [11.0, 21.0]])
    );
    assert_eq!(tram["length_forward"], 5.0);
    assert_eq!(tram["length_backward"], 3.0);
    assert_eq!(tram["stops_forward"], serde_json::json!(["S1", "S2"]));

    let stops: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&stops_path).unwrap()).unwrap();
    assert_eq!(stops[3]["id"], "S4");
    assert_eq!(stops[3]["routes"], serde_json::json!([]));
    assert_eq!(stops[0]["lng"], 20.0);
}

#[test]
fn route_keys_keep_document_order_test() {
    let working_dir = tempfile::tempdir().unwrap();
    let routes_path = working_dir.path().join("routes.json");
    let stops_path = working_dir.path().join("stops.json");
    let documents = routebake::run(&GtfsReader::from_dir(feed_dir()), &Config::default()).unwrap();
    output::write_documents(&documents, &routes_path, &stops_path, true).unwrap();

    let text = fs::read_to_string(&routes_path).unwrap();
    let keys = [
        "\"id\"",
        "\"description\"",
        "\"name_numeric\"",
        "\"tracker_id\"",
        "\"points\"",
        "\"stops_forward\"",
        "\"stops_backward\"",
        "\"type\"",
        "\"price\"",
        "\"midpoint\"",
        "\"work_start\"",
        "\"length_forward\"",
        "\"work_end\"",
        "\"length_backward\"",
        "\"name\"",
    ];
    let positions: Vec<_> = keys.iter().map(|key| text.find(key).unwrap()).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn unwritable_path_test() {
    let working_dir = tempfile::tempdir().unwrap();
    let documents = routebake::run(&GtfsReader::from_dir(feed_dir()), &Config::default()).unwrap();
    let missing = working_dir.path().join("missing").join("routes.json");
    let err = output::write_documents(
        &documents,
        &missing,
        working_dir.path().join("stops.json"),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, output::Error::Io { .. }));
}

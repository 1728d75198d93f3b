//! Route label normalization.
//!
//! Short names carry a transport-mode marker in front of the line number, e.g. `Тр5` for
//! tram 5 or `Т12` for trolleybus 12. Anything unmarked is a route taxi, whose labels may
//! still carry an `Н-А` or `А` marker.
use serde::Serialize;

const TRAM_PREFIX: &str = "Тр";
const TROLLEYBUS_PREFIX: &str = "Т";
const TAXI_PREFIXES: [&str; 2] = ["Н-А", "А"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Tram,
    Trolleybuses,
    #[default]
    Taxi,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub transport_type: TransportType,
    pub name: String,
}

/// Classifies a raw short name and strips its mode marker.
///
/// Tram and trolleybus names are lowercased once the marker is gone. Taxi names keep their
/// case; a leading `Н-А` is removed first, then a leading `А`.
pub fn resolve(short_name: &str) -> ResolvedName {
    if let Some(rest) = short_name.strip_prefix(TRAM_PREFIX) {
        ResolvedName {
            transport_type: TransportType::Tram,
            name: rest.to_lowercase(),
        }
    } else if let Some(rest) = short_name.strip_prefix(TROLLEYBUS_PREFIX) {
        ResolvedName {
            transport_type: TransportType::Trolleybuses,
            name: rest.to_lowercase(),
        }
    } else {
        let name = TAXI_PREFIXES
            .iter()
            .fold(short_name, |name, prefix| {
                name.strip_prefix(*prefix).unwrap_or(name)
            });
        ResolvedName {
            transport_type: TransportType::Taxi,
            name: name.to_string(),
        }
    }
}

#[test]
fn tram_prefix_is_stripped_and_lowercased() {
    let resolved = resolve("Тр5А");
    assert_eq!(resolved.transport_type, TransportType::Tram);
    assert_eq!(resolved.name, "5а");
}

#[test]
fn trolleybus_strips_what_it_matched() {
    let resolved = resolve("Т12");
    assert_eq!(resolved.transport_type, TransportType::Trolleybuses);
    assert_eq!(resolved.name, "12");
}

#[test]
fn taxi_markers_are_stripped_in_order() {
    assert_eq!(resolve("Н-А7").name, "7");
    assert_eq!(resolve("А12").name, "12");
    assert_eq!(resolve("Н-А7").transport_type, TransportType::Taxi);
}

#[test]
fn taxi_keeps_case() {
    assert_eq!(resolve("12Б").name, "12Б");
}

#[test]
fn type_serializes_lowercase() {
    let json = serde_json::to_string(&TransportType::Trolleybuses).unwrap();
    assert_eq!(json, "\"trolleybuses\"");
}

//! Raw feed rows.
//!
//! Every field is kept as text; numeric parsing happens in the pipeline so a malformed value
//! can be reported with its table and row. Columns a feed omits default to empty strings and
//! columns not listed here are ignored.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GtfsRoute {
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GtfsTrip {
    pub trip_id: String,
    pub route_id: String,
    pub direction_id: String,
    pub shape_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GtfsShape {
    pub shape_id: String,
    pub shape_pt_lat: String,
    pub shape_pt_lon: String,
    pub shape_dist_traveled: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GtfsStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: String,
    pub stop_lon: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GtfsStopTime {
    pub trip_id: String,
    pub stop_id: String,
}

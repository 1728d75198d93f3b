use chrono::NaiveTime;
use std::{str::FromStr, time::Instant};
use thiserror::Error;
use tracing::{debug, info};

pub mod assemble;
pub mod naming;
pub mod shapes;
pub mod stop_times;
pub mod trips;

pub use assemble::{RouteRecord, StopRecord};
pub use naming::{ResolvedName, TransportType};

use crate::{
    gtfs::Feed,
    shared::{parse_locale_float, parse_optional_locale_float},
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed {field} in {table} line {line}: {value:?}")]
    Malformed {
        table: &'static str,
        /// Line in the source file, counting the header as line 1.
        line: usize,
        field: &'static str,
        value: String,
    },
}

#[derive(Error, Debug)]
#[error("Unknown shape length mode: {0} (expected `last` or `sum`)")]
pub struct UnknownShapeLength(String);

/// How a shape's `shape_dist_traveled` values become its total length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShapeLength {
    /// The last point's value. `shape_dist_traveled` is already cumulative in GTFS.
    #[default]
    LastCumulative,
    /// The sum of every point's value, for feeds that store per-segment distances.
    Sum,
}

impl FromStr for ShapeLength {
    type Err = UnknownShapeLength;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last" | "last-cumulative" => Ok(ShapeLength::LastCumulative),
            "sum" => Ok(ShapeLength::Sum),
            _ => Err(UnknownShapeLength(s.to_string())),
        }
    }
}

/// Values written into every route record that the feed has no column for.
#[derive(Debug, Clone)]
pub struct Config {
    pub price: u32,
    pub tracker_id: String,
    pub midpoint: u32,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub shape_length: ShapeLength,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            price: 10,
            tracker_id: "XXXXXX".into(),
            midpoint: 0,
            work_start: NaiveTime::MIN,
            work_end: NaiveTime::MIN,
            shape_length: ShapeLength::default(),
        }
    }
}

/// Both output documents, built together so they always describe the same feed.
#[derive(Debug, Clone, Default)]
pub struct Documents {
    pub routes: Vec<RouteRecord>,
    pub stops: Vec<StopRecord>,
}

/// Runs every stage over a loaded feed.
pub fn build(feed: &Feed, config: &Config) -> Result<Documents, self::Error> {
    let now = Instant::now();
    let shapes = shapes::aggregate_shapes(&feed.shapes, config.shape_length)?;
    let trips = trips::resolve_trips(&feed.trips, &shapes);
    let membership = stop_times::aggregate_stop_times(&feed.stop_times, &trips);
    let routes = assemble::assemble_routes(&feed.routes, &trips, &membership, config);
    let stops = assemble::assemble_stops(&feed.stops, &membership)?;
    debug!("Building documents took {:?}", now.elapsed());
    info!(
        routes = routes.len(),
        stops = stops.len(),
        "Built route and stop documents"
    );
    Ok(Documents { routes, stops })
}

fn malformed(table: &'static str, index: usize, field: &'static str, value: &str) -> Error {
    Error::Malformed {
        table,
        line: index + 2,
        field,
        value: value.to_string(),
    }
}

/// Parses a required float of the `index`-th data row of `table`.
pub(crate) fn parse_float(
    table: &'static str,
    index: usize,
    field: &'static str,
    value: &str,
) -> Result<f64, self::Error> {
    parse_locale_float(value).map_err(|_| malformed(table, index, field, value))
}

pub(crate) fn parse_optional_float(
    table: &'static str,
    index: usize,
    field: &'static str,
    value: &str,
) -> Result<Option<f64>, self::Error> {
    parse_optional_locale_float(value).map_err(|_| malformed(table, index, field, value))
}

#[test]
fn shape_length_from_str() {
    assert_eq!("sum".parse::<ShapeLength>().unwrap(), ShapeLength::Sum);
    assert_eq!(
        "Last".parse::<ShapeLength>().unwrap(),
        ShapeLength::LastCumulative
    );
    assert!("avg".parse::<ShapeLength>().is_err());
}

#[test]
fn malformed_error_names_the_line() {
    let err = parse_float("stops", 0, "stop_lat", "n/a").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed stop_lat in stops line 2: \"n/a\""
    );
}

use std::{collections::HashMap, sync::Arc, time::Instant};
use tracing::{debug, warn};

use crate::{
    gtfs::GtfsShape,
    pipeline::{self, ShapeLength},
    shared::{Coordinate, Distance},
};

const TABLE: &str = "shapes";

/// The ordered points of one shape and its length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePath {
    pub points: Vec<Coordinate>,
    pub total_length: Distance,
}

impl ShapePath {
    pub fn new(points: Vec<Coordinate>, total_length: Distance) -> Self {
        Self {
            points,
            total_length,
        }
    }

    fn push(&mut self, coordinate: Coordinate, distance: Option<Distance>, mode: ShapeLength) {
        self.points.push(coordinate);
        if let Some(distance) = distance {
            match mode {
                ShapeLength::LastCumulative => self.total_length = distance,
                ShapeLength::Sum => self.total_length += distance,
            }
        }
    }
}

pub type ShapePaths = HashMap<Arc<str>, ShapePath>;

/// Groups shape rows by `shape_id`, keeping the input order of points within each shape.
///
/// Rows of one shape are expected to be contiguous. A shape that reappears after another
/// shape's rows keeps growing the same path.
pub fn aggregate_shapes(
    rows: &[GtfsShape],
    mode: ShapeLength,
) -> Result<ShapePaths, pipeline::Error> {
    debug!("Aggregating shapes...");
    let now = Instant::now();
    let mut paths: ShapePaths = HashMap::new();
    let mut current: Option<&str> = None;
    for (i, row) in rows.iter().enumerate() {
        let latitude = pipeline::parse_float(TABLE, i, "shape_pt_lat", &row.shape_pt_lat)?;
        let longitude = pipeline::parse_float(TABLE, i, "shape_pt_lon", &row.shape_pt_lon)?;
        let distance = pipeline::parse_optional_float(
            TABLE,
            i,
            "shape_dist_traveled",
            &row.shape_dist_traveled,
        )?
        .map(Distance::new);

        let shape_id = row.shape_id.as_str();
        if current != Some(shape_id) {
            if paths.contains_key(shape_id) {
                warn!("Shape {shape_id} is not contiguous, appending to its earlier points");
            } else {
                paths.insert(shape_id.into(), ShapePath::default());
            }
            current = Some(shape_id);
        }

        if let Some(path) = paths.get_mut(shape_id) {
            path.push(Coordinate::new(latitude, longitude), distance, mode);
        }
    }
    debug!(shapes = paths.len(), "Aggregating shapes took {:?}", now.elapsed());
    Ok(paths)
}

#[cfg(test)]
fn row(shape_id: &str, lat: &str, lon: &str, dist: &str) -> GtfsShape {
    GtfsShape {
        shape_id: shape_id.into(),
        shape_pt_lat: lat.into(),
        shape_pt_lon: lon.into(),
        shape_dist_traveled: dist.into(),
    }
}

#[test]
fn keeps_input_order_and_count() {
    let rows = vec![
        row("A", "10.0", "20.0", "0"),
        row("A", "10.2", "20.2", "1"),
        row("A", "10.1", "20.1", "2"),
        row("B", "1.0", "2.0", "0"),
    ];
    let paths = aggregate_shapes(&rows, ShapeLength::LastCumulative).unwrap();
    let a = &paths["A"];
    assert_eq!(a.points.len(), 3);
    assert_eq!(a.points[1], Coordinate::new(10.2, 20.2));
    assert_eq!(a.points[2], Coordinate::new(10.1, 20.1));
    assert_eq!(paths["B"].points.len(), 1);
}

#[test]
fn last_shape_is_kept() {
    let rows = vec![row("A", "1", "2", "0"), row("B", "3", "4", "7")];
    let paths = aggregate_shapes(&rows, ShapeLength::LastCumulative).unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths["B"].total_length, Distance::new(7.0));
}

#[test]
fn single_point_length_is_its_own_distance() {
    let rows = vec![row("A", "1", "2", "4,5")];
    for mode in [ShapeLength::LastCumulative, ShapeLength::Sum] {
        let paths = aggregate_shapes(&rows, mode).unwrap();
        assert_eq!(paths["A"].total_length, Distance::new(4.5));
    }
}

#[test]
fn length_modes() {
    let rows = vec![
        row("A", "1", "2", "0"),
        row("A", "1", "2", "1.5"),
        row("A", "1", "2", "4"),
    ];
    let last = aggregate_shapes(&rows, ShapeLength::LastCumulative).unwrap();
    assert_eq!(last["A"].total_length, Distance::new(4.0));
    let sum = aggregate_shapes(&rows, ShapeLength::Sum).unwrap();
    assert_eq!(sum["A"].total_length, Distance::new(5.5));
}

#[test]
fn missing_distance_is_not_zeroed() {
    let rows = vec![row("A", "1", "2", "3"), row("A", "1", "2", "")];
    let paths = aggregate_shapes(&rows, ShapeLength::LastCumulative).unwrap();
    assert_eq!(paths["A"].total_length, Distance::new(3.0));
}

#[test]
fn malformed_coordinate_fails() {
    let rows = vec![row("A", "1", "2", "0"), row("A", "north", "2", "1")];
    let err = aggregate_shapes(&rows, ShapeLength::LastCumulative).unwrap_err();
    assert!(matches!(
        err,
        pipeline::Error::Malformed {
            field: "shape_pt_lat",
            line: 3,
            ..
        }
    ));
}

#[test]
fn non_finite_distance_fails() {
    let rows = vec![row("A", "1", "2", "0"), row("A", "1", "2", "inf")];
    let err = aggregate_shapes(&rows, ShapeLength::Sum).unwrap_err();
    assert!(matches!(
        err,
        pipeline::Error::Malformed {
            field: "shape_dist_traveled",
            line: 3,
            ..
        }
    ));
}

#[test]
fn non_contiguous_rows_extend_the_shape() {
    let rows = vec![
        row("A", "1", "1", "0"),
        row("B", "2", "2", "0"),
        row("A", "3", "3", "1"),
    ];
    let paths = aggregate_shapes(&rows, ShapeLength::LastCumulative).unwrap();
    assert_eq!(
        paths["A"].points,
        vec![Coordinate::new(1.0, 1.0), Coordinate::new(3.0, 3.0)]
    );
}

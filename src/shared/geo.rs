use std::{
    cmp,
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{Serialize, Serializer};

/// Distance along a shape, in whatever unit the feed's `shape_dist_traveled` uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Distance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Distance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, value| acc + value)
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl Distance {
    pub const ZERO: Self = Self(0.0);

    pub const fn new(value: f64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Serialized as a `[lat, lon]` pair.
impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.latitude, self.longitude].serialize(serializer)
    }
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[test]
fn distance_sum_test() {
    let total: Distance = [1.0, 2.5, 0.5].into_iter().map(Distance::new).sum();
    assert_eq!(total, Distance::new(4.0))
}

#[test]
fn distance_cmp_test() {
    assert!(Distance::new(1000.0) > Distance::new(500.0))
}

#[test]
fn coordinate_serializes_as_pair_test() {
    let json = serde_json::to_string(&Coordinate::new(10.0, 20.5)).unwrap();
    assert_eq!(json, "[10.0,20.5]")
}

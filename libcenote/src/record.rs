//! Raw table rows and the coordinates parsed out of them
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the column holding the latitude of a row
pub const LATITUDE: &str = "latitude";
/// Name of the column holding the longitude of a row. The survey files spell it this way.
pub const LONGITUDE: &str = "longitud";

/// Returns true if `name` is one of the columns that hold a coordinate rather than a category flag
pub fn is_reserved_column(name: &str) -> bool {
    name == LATITUDE || name == LONGITUDE
}

/// A geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn key(&self) -> CoordinateKey {
        CoordinateKey::from(*self)
    }
}

/// A hashable key that is equal for two coordinates exactly when both of their components
/// compare equal as floating point numbers. There is no tolerance: 20.0 and 20.0000001 are
/// different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey(u64, u64);

impl From<Coordinate> for CoordinateKey {
    fn from(value: Coordinate) -> Self {
        Self(
            canonical_bits(value.latitude),
            canonical_bits(value.longitude),
        )
    }
}

// -0.0 == 0.0 but their bit patterns differ
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Parses a decimal degree value. Anything that is not a finite number is rejected.
pub fn parse_degrees(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Returns true if a category flag value counts as set. A flag is set when its value is
/// numerically equal to one, so "1", " 1 " and "1.0" are all set while "0", "" and "yes" are
/// not.
pub fn is_flag_set(raw: &str) -> bool {
    raw.trim().parse::<f64>().is_ok_and(|value| value == 1.0)
}

/// One row of a source table, mapping a column name to the raw string value in that row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// The coordinate of this row, or `None` if either the latitude or the longitude is missing
    /// or not numeric
    pub fn coordinate(&self) -> Option<Coordinate> {
        let latitude = parse_degrees(self.get(LATITUDE)?)?;
        let longitude = parse_degrees(self.get(LONGITUDE)?)?;
        Some(Coordinate::new(latitude, longitude))
    }

    /// Whether the given category column holds a set flag in this row. Missing columns are unset.
    pub fn flag(&self, column: &str) -> bool {
        self.get(column).is_some_and(is_flag_set)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

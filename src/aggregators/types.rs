//! Chart-ready rows produced by the aggregators.
//!
//! Serialized field names are what the charting layer binds to, so renaming
//! one is a breaking change.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Registrations of one model within a make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCount {
    pub model: String,
    pub count: usize,
}

/// Registrations of one make, with its models in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MakePopularity {
    pub make: String,
    pub count: usize,
    pub models: Vec<ModelCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Registrations per city. The chart labels this axis `state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCount {
    #[serde(rename = "state")]
    pub city: String,
    pub count: usize,
}

/// A pie slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MakeRange {
    pub make: String,
    pub range: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictCount {
    pub district: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
}

const YEAR_KEY: &str = "year";

/// Registrations per make for a single model year.
///
/// Only makes seen that year are present. Serializes flat, as
/// `{"year": 2020, "TESLA": 12, "NISSAN": 3}`. A make named `year` would
/// collide with the year key, so it is left out of the serialized row and
/// is only reachable through [`YearGrowth::count_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGrowth {
    pub year: i32,
    pub makes: Vec<(String, usize)>,
}

impl YearGrowth {
    /// Count for `make` in this year, 0 when the make was not seen.
    pub fn count_for(&self, make: &str) -> usize {
        self.makes
            .iter()
            .find(|(m, _)| m == make)
            .map_or(0, |(_, n)| *n)
    }
}

impl Serialize for YearGrowth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let makes: Vec<_> = self.makes.iter().filter(|(m, _)| m != YEAR_KEY).collect();

        let mut map = serializer.serialize_map(Some(makes.len() + 1))?;
        map.serialize_entry(YEAR_KEY, &self.year)?;
        for (make, count) in makes {
            map.serialize_entry(make, count)?;
        }
        map.end()
    }
}

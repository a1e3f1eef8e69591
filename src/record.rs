//! Typed vehicle registration rows and the rules for parsing them from text.

use serde::Serialize;
use std::collections::HashMap;

/// One source row keyed by header name. Column order in the source file is irrelevant.
pub type RawRow = HashMap<String, String>;

pub const MODEL_YEAR: &str = "Model Year";
pub const MAKE: &str = "Make";
pub const MODEL: &str = "Model";
pub const ELECTRIC_VEHICLE_TYPE: &str = "Electric Vehicle Type";
pub const CAFV_ELIGIBILITY: &str = "Clean Alternative Fuel Vehicle (CAFV) Eligibility";
pub const ELECTRIC_RANGE: &str = "Electric Range";
pub const CITY: &str = "City";
pub const COUNTY: &str = "County";
pub const STATE: &str = "State";
pub const ELECTRIC_UTILITY: &str = "Electric Utility";
pub const LEGISLATIVE_DISTRICT: &str = "Legislative District";
pub const VEHICLE_LOCATION: &str = "Vehicle Location";

/// Eligibility literal counted as "Yes" by the CAFV aggregate.
pub const CAFV_ELIGIBLE: &str = "Clean Alternative Fuel Vehicle Eligible";

/// A single parsed registration.
///
/// Every field is optional: a missing column or an unparseable number
/// becomes `None` and the record is simply left out of aggregates keyed
/// on that field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub model_year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub electric_vehicle_type: Option<String>,
    pub cafv_eligibility: Option<String>,
    pub electric_range: Option<u32>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub electric_utility: Option<String>,
    pub legislative_district: Option<u32>,
    pub vehicle_location: Option<String>,
}

impl VehicleRecord {
    /// Builds a record from a header-keyed row. Never fails.
    pub fn from_row(row: &RawRow) -> Self {
        let text = |key: &str| row.get(key).cloned();

        VehicleRecord {
            model_year: row.get(MODEL_YEAR).and_then(|v| parse_int(v)),
            make: text(MAKE),
            model: text(MODEL),
            electric_vehicle_type: text(ELECTRIC_VEHICLE_TYPE),
            cafv_eligibility: text(CAFV_ELIGIBILITY),
            electric_range: row.get(ELECTRIC_RANGE).and_then(|v| parse_int(v)),
            city: text(CITY),
            county: text(COUNTY),
            state: text(STATE),
            electric_utility: text(ELECTRIC_UTILITY),
            legislative_district: row.get(LEGISLATIVE_DISTRICT).and_then(|v| parse_int(v)),
            vehicle_location: text(VEHICLE_LOCATION),
        }
    }

    /// Whether the CAFV column holds exactly the eligible literal.
    pub fn is_cafv_eligible(&self) -> bool {
        self.cafv_eligibility.as_deref() == Some(CAFV_ELIGIBLE)
    }
}

/// Base-10 parse of the trimmed field; `None` instead of an error.
pub fn parse_int<T: std::str::FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

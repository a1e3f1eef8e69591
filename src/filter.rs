//! Equality filters over the loaded dataset.
//!
//! A [`FilterSelection`] holds at most one [`Predicate`] per [`Dimension`].
//! Active predicates are combined with AND; an empty selection keeps every
//! record. Filtering is stable and always recomputed from the full dataset.

use serde::Serialize;
use std::fmt;

use crate::record::VehicleRecord;

/// A dimension the dashboard can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Year,
    City,
    Make,
    VehicleType,
}

/// An equality constraint on one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    Year(i32),
    City(String),
    Make(String),
    VehicleType(String),
}

impl Predicate {
    pub fn dimension(&self) -> Dimension {
        match self {
            Predicate::Year(_) => Dimension::Year,
            Predicate::City(_) => Dimension::City,
            Predicate::Make(_) => Dimension::Make,
            Predicate::VehicleType(_) => Dimension::VehicleType,
        }
    }

    /// A record missing the field never matches.
    pub fn matches(&self, record: &VehicleRecord) -> bool {
        match self {
            Predicate::Year(year) => record.model_year == Some(*year),
            Predicate::City(city) => record.city.as_deref() == Some(city.as_str()),
            Predicate::Make(make) => record.make.as_deref() == Some(make.as_str()),
            Predicate::VehicleType(kind) => {
                record.electric_vehicle_type.as_deref() == Some(kind.as_str())
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Year(y) => write!(f, "year={y}"),
            Predicate::City(c) => write!(f, "city={c}"),
            Predicate::Make(m) => write!(f, "make={m}"),
            Predicate::VehicleType(t) => write!(f, "vehicle_type={t}"),
        }
    }
}

/// The user's current selections, one optional value per dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    predicates: Vec<Predicate>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the predicate for its dimension, replacing any previous value.
    pub fn set(&mut self, predicate: Predicate) {
        let dimension = predicate.dimension();
        match self
            .predicates
            .iter_mut()
            .find(|p| p.dimension() == dimension)
        {
            Some(existing) => *existing = predicate,
            None => self.predicates.push(predicate),
        }
    }

    /// Builder form of [`FilterSelection::set`].
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.set(predicate);
        self
    }

    pub fn clear(&mut self, dimension: Dimension) {
        self.predicates.retain(|p| p.dimension() != dimension);
    }

    pub fn clear_all(&mut self) {
        self.predicates.clear();
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, record: &VehicleRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}

/// Returns the records satisfying every active predicate, in input order.
pub fn apply<'a>(
    records: &'a [VehicleRecord],
    selection: &FilterSelection,
) -> Vec<&'a VehicleRecord> {
    records.iter().filter(|r| selection.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: Option<i32>, city: &str, make: &str) -> VehicleRecord {
        VehicleRecord {
            model_year: year,
            city: Some(city.to_string()),
            make: Some(make.to_string()),
            ..Default::default()
        }
    }

    fn sample() -> Vec<VehicleRecord> {
        vec![
            rec(Some(2020), "Seattle", "TESLA"),
            rec(Some(2021), "Seattle", "NISSAN"),
            rec(Some(2020), "Tacoma", "TESLA"),
            rec(None, "Seattle", "TESLA"),
            rec(Some(2020), "Seattle", "TESLA"),
        ]
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let data = sample();
        let filtered = apply(&data, &FilterSelection::new());

        assert_eq!(filtered.len(), data.len());
        for (a, b) in filtered.iter().zip(data.iter()) {
            assert!(std::ptr::eq(*a, b));
        }
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let data = sample();
        let selection = FilterSelection::new()
            .with(Predicate::Year(2020))
            .with(Predicate::City("Seattle".into()));

        let filtered = apply(&data, &selection);

        assert_eq!(filtered.len(), 2);
        assert!(std::ptr::eq(filtered[0], &data[0]));
        assert!(std::ptr::eq(filtered[1], &data[4]));
        assert!(filtered.iter().all(|r| selection.matches(r)));
    }

    #[test]
    fn test_absent_field_fails_active_predicate() {
        let data = sample();
        let selection = FilterSelection::new().with(Predicate::Year(2020));

        assert!(!apply(&data, &selection).iter().any(|r| r.model_year.is_none()));
    }

    #[test]
    fn test_set_replaces_same_dimension() {
        let mut selection = FilterSelection::new();
        selection.set(Predicate::Make("TESLA".into()));
        selection.set(Predicate::Make("NISSAN".into()));

        assert_eq!(selection.predicates(), &[Predicate::Make("NISSAN".into())]);
    }

    #[test]
    fn test_clear_dimension() {
        let mut selection = FilterSelection::new()
            .with(Predicate::Year(2020))
            .with(Predicate::Make("TESLA".into()));
        selection.clear(Dimension::Year);

        assert_eq!(selection.predicates(), &[Predicate::Make("TESLA".into())]);

        selection.clear_all();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_no_match_returns_empty() {
        let data = sample();
        let selection = FilterSelection::new().with(Predicate::City("Spokane".into()));

        assert!(apply(&data, &selection).is_empty());
    }
}

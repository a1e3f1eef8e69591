//! Ties the loaded dataset, the current filter selection and the aggregators
//! together. Every view is recomputed from scratch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::aggregators::aggregate::{TOP_CITIES, TOP_DISTRICTS, TOP_MAKES};
use crate::aggregators::types::{
    CityCount, DistrictCount, LabelCount, MakePopularity, MakeRange, MapPoint, YearCount,
    YearGrowth,
};
use crate::aggregators::{
    cafv_counts, city_counts, district_counts, make_max_range, make_model_popularity, map_points,
    model_year_counts, vehicle_type_counts, year_over_year_growth,
};
use crate::dataset::{Dataset, FilterOptions};
use crate::filter::{self, Dimension, FilterSelection, Predicate};

/// How many entries the truncated aggregates keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub top_makes: usize,
    pub top_cities: usize,
    pub top_districts: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            top_makes: TOP_MAKES,
            top_cities: TOP_CITIES,
            top_districts: TOP_DISTRICTS,
        }
    }
}

/// Every chart's data for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub generated_at: DateTime<Utc>,
    pub selection: Vec<Predicate>,
    pub total_records: usize,
    pub filtered_records: usize,
    pub make_model_popularity: Vec<MakePopularity>,
    pub model_year_counts: Vec<YearCount>,
    pub state_counts: Vec<CityCount>,
    pub cafv_eligibility: Vec<LabelCount>,
    pub vehicle_types: Vec<LabelCount>,
    pub make_max_range: Vec<MakeRange>,
    pub year_over_year_growth: Vec<YearGrowth>,
    pub legislative_districts: Vec<DistrictCount>,
    pub map_points: Vec<MapPoint>,
}

impl DashboardView {
    /// Makes present in any growth row, in first-seen order. Used to lay out
    /// one continuous series per make.
    pub fn growth_makes(&self) -> Vec<&str> {
        let mut makes: Vec<&str> = Vec::new();
        for row in &self.year_over_year_growth {
            for (make, _) in &row.makes {
                if !makes.contains(&make.as_str()) {
                    makes.push(make);
                }
            }
        }
        makes
    }
}

pub struct Dashboard {
    dataset: Dataset,
    selection: FilterSelection,
    limits: Limits,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Self {
        Self::with_limits(dataset, Limits::default())
    }

    pub fn with_limits(dataset: Dataset, limits: Limits) -> Self {
        Self {
            dataset,
            selection: FilterSelection::new(),
            limits,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Filter choices computed when the dataset was loaded.
    pub fn options(&self) -> &FilterOptions {
        self.dataset.options()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn select(&mut self, predicate: Predicate) {
        debug!(%predicate, "Selection changed");
        self.selection.set(predicate);
    }

    pub fn clear(&mut self, dimension: Dimension) {
        debug!(?dimension, "Selection cleared");
        self.selection.clear(dimension);
    }

    pub fn clear_all(&mut self) {
        self.selection.clear_all();
    }

    /// Filters the full dataset and runs every aggregator over the result.
    pub fn view(&self) -> DashboardView {
        let records = filter::apply(self.dataset.records(), &self.selection);
        debug!(
            total = self.dataset.len(),
            filtered = records.len(),
            "Recomputing aggregates"
        );

        DashboardView {
            generated_at: Utc::now(),
            selection: self.selection.predicates().to_vec(),
            total_records: self.dataset.len(),
            filtered_records: records.len(),
            make_model_popularity: make_model_popularity(&records, self.limits.top_makes),
            model_year_counts: model_year_counts(&records),
            state_counts: city_counts(&records, self.limits.top_cities),
            cafv_eligibility: cafv_counts(&records),
            vehicle_types: vehicle_type_counts(&records),
            make_max_range: make_max_range(&records),
            year_over_year_growth: year_over_year_growth(&records),
            legislative_districts: district_counts(&records, self.limits.top_districts),
            map_points: map_points(&records),
        }
    }
}

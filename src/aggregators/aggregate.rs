use crate::aggregators::counter::OrderedCounter;
use crate::aggregators::types::{
    CityCount, DistrictCount, LabelCount, MakePopularity, MakeRange, MapPoint, ModelCount,
    YearCount, YearGrowth,
};
use crate::location;
use crate::record::VehicleRecord;

/// Makes kept by [`make_model_popularity`].
pub const TOP_MAKES: usize = 5;
/// Cities kept by [`city_counts`].
pub const TOP_CITIES: usize = 20;
/// Districts kept by [`district_counts`].
pub const TOP_DISTRICTS: usize = 10;

pub const CAFV_YES: &str = "Yes";
pub const CAFV_NO: &str = "No";

/// Counts registrations per make and, within each make, per model.
///
/// Makes come back in the order they were first encountered, not by count,
/// and only the first `limit` makes are kept. Model lists are complete.
/// A record without a model still counts toward its make.
pub fn make_model_popularity(records: &[&VehicleRecord], limit: usize) -> Vec<MakePopularity> {
    let mut makes = OrderedCounter::new();
    let mut models: Vec<OrderedCounter<String>> = Vec::new();

    for r in records {
        let Some(make) = &r.make else { continue };

        let pos = makes.bump(make);
        if pos == models.len() {
            models.push(OrderedCounter::new());
        }
        if let Some(model) = &r.model {
            models[pos].bump(model);
        }
    }

    makes
        .into_entries()
        .into_iter()
        .zip(models)
        .take(limit)
        .map(|((make, count), models)| MakePopularity {
            make,
            count,
            models: models
                .into_entries()
                .into_iter()
                .map(|(model, count)| ModelCount { model, count })
                .collect(),
        })
        .collect()
}

/// Registrations per model year, ascending. Records without a year are skipped.
pub fn model_year_counts(records: &[&VehicleRecord]) -> Vec<YearCount> {
    let mut years = OrderedCounter::new();
    for year in records.iter().filter_map(|r| r.model_year) {
        years.bump(&year);
    }

    let mut rows: Vec<YearCount> = years
        .into_entries()
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect();
    rows.sort_by_key(|r| r.year);
    rows
}

/// Top cities by registration count, descending.
///
/// This is the "state" chart: it groups on the `City` column. Empty or
/// missing cities are skipped and ties keep first-seen order.
pub fn city_counts(records: &[&VehicleRecord], limit: usize) -> Vec<CityCount> {
    let mut cities = OrderedCounter::new();
    for city in records
        .iter()
        .filter_map(|r| r.city.as_ref())
        .filter(|c| !c.is_empty())
    {
        cities.bump(city);
    }

    cities
        .into_ranked()
        .into_iter()
        .take(limit)
        .map(|(city, count)| CityCount { city, count })
        .collect()
}

/// Splits records into CAFV eligible (`Yes`) and everything else (`No`).
///
/// Always two entries; `Yes` + `No` equals the number of records.
pub fn cafv_counts(records: &[&VehicleRecord]) -> Vec<LabelCount> {
    let eligible = records.iter().filter(|r| r.is_cafv_eligible()).count();

    vec![
        LabelCount {
            name: CAFV_YES.to_string(),
            value: eligible,
        },
        LabelCount {
            name: CAFV_NO.to_string(),
            value: records.len() - eligible,
        },
    ]
}

/// Registrations per electric vehicle type, in first-seen order.
pub fn vehicle_type_counts(records: &[&VehicleRecord]) -> Vec<LabelCount> {
    let mut types = OrderedCounter::new();
    for kind in records.iter().filter_map(|r| r.electric_vehicle_type.as_ref()) {
        types.bump(kind);
    }

    types
        .into_entries()
        .into_iter()
        .map(|(name, value)| LabelCount { name, value })
        .collect()
}

/// Highest electric range per make, makes in first-seen order.
///
/// A missing range contributes 0, so a make whose records all lack a range
/// reports 0 rather than disappearing from the chart.
pub fn make_max_range(records: &[&VehicleRecord]) -> Vec<MakeRange> {
    let mut seen = OrderedCounter::new();
    let mut rows: Vec<MakeRange> = Vec::new();

    for r in records {
        let Some(make) = &r.make else { continue };
        let range = r.electric_range.unwrap_or(0);

        let pos = seen.bump(make);
        if pos == rows.len() {
            rows.push(MakeRange {
                make: make.clone(),
                range,
            });
        } else {
            rows[pos].range = rows[pos].range.max(range);
        }
    }

    rows
}

/// Per-year make counts, ascending by year.
///
/// Each row only carries the makes seen in that year; use
/// [`YearGrowth::count_for`] to read a continuous series.
pub fn year_over_year_growth(records: &[&VehicleRecord]) -> Vec<YearGrowth> {
    let mut years = OrderedCounter::new();
    let mut makes: Vec<OrderedCounter<String>> = Vec::new();

    for r in records {
        let (Some(year), Some(make)) = (r.model_year, &r.make) else {
            continue;
        };

        let pos = years.bump(&year);
        if pos == makes.len() {
            makes.push(OrderedCounter::new());
        }
        makes[pos].bump(make);
    }

    let mut rows: Vec<YearGrowth> = years
        .into_entries()
        .into_iter()
        .zip(makes)
        .map(|((year, _), makes)| YearGrowth {
            year,
            makes: makes.into_entries(),
        })
        .collect();
    rows.sort_by_key(|r| r.year);
    rows
}

/// Top legislative districts by registration count, descending.
pub fn district_counts(records: &[&VehicleRecord], limit: usize) -> Vec<DistrictCount> {
    let mut districts = OrderedCounter::new();
    for district in records.iter().filter_map(|r| r.legislative_district) {
        districts.bump(&district);
    }

    districts
        .into_ranked()
        .into_iter()
        .take(limit)
        .map(|(district, count)| DistrictCount { district, count })
        .collect()
}

/// One map marker per record with a parseable location, in record order.
pub fn map_points(records: &[&VehicleRecord]) -> Vec<MapPoint> {
    records
        .iter()
        .filter_map(|r| location::extract(r.vehicle_location.as_deref()))
        .map(|(latitude, longitude)| MapPoint {
            latitude,
            longitude,
        })
        .collect()
}

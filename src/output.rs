//! Rendering a [`DashboardView`] for whoever draws the charts.
//!
//! Supports debug logging, pretty JSON, and one CSV file per aggregate.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::dashboard::DashboardView;

/// Logs the view using Rust's debug pretty-print format.
pub fn print_pretty(view: &DashboardView) {
    debug!("{:#?}", view);
}

/// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json(path: Option<&Path>, value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match path {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "JSON written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct MakeRow<'a> {
    make: &'a str,
    count: usize,
}

#[derive(Serialize)]
struct ModelRow<'a> {
    make: &'a str,
    model: &'a str,
    count: usize,
}

/// Writes one CSV per aggregate into `dir`, creating it if needed.
///
/// Returns the paths written.
pub fn export_csv(dir: &Path, view: &DashboardView) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::new();

    let makes: Vec<_> = view
        .make_model_popularity
        .iter()
        .map(|m| MakeRow {
            make: &m.make,
            count: m.count,
        })
        .collect();
    written.push(write_rows(dir, "make_counts.csv", &makes)?);

    let models: Vec<_> = view
        .make_model_popularity
        .iter()
        .flat_map(|m| {
            m.models.iter().map(|model| ModelRow {
                make: &m.make,
                model: &model.model,
                count: model.count,
            })
        })
        .collect();
    written.push(write_rows(dir, "model_counts.csv", &models)?);

    written.push(write_rows(dir, "model_year_counts.csv", &view.model_year_counts)?);
    written.push(write_rows(dir, "city_counts.csv", &view.state_counts)?);
    written.push(write_rows(dir, "cafv_counts.csv", &view.cafv_eligibility)?);
    written.push(write_rows(dir, "vehicle_types.csv", &view.vehicle_types)?);
    written.push(write_rows(dir, "make_range.csv", &view.make_max_range)?);
    written.push(write_rows(dir, "district_counts.csv", &view.legislative_districts)?);
    written.push(write_rows(dir, "map_points.csv", &view.map_points)?);
    written.push(write_growth(dir, view)?);

    info!(dir = %dir.display(), files = written.len(), "CSV export complete");
    Ok(written)
}

fn write_rows<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path)?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(path)
}

/// Growth rows have a different make set per year, so every make seen in
/// any year gets a column and missing counts are written as 0.
fn write_growth(dir: &Path, view: &DashboardView) -> Result<PathBuf> {
    let path = dir.join("year_growth.csv");
    let makes = view.growth_makes();
    let mut writer = csv::Writer::from_path(&path)?;

    let mut header = vec!["year"];
    header.extend(makes.iter().copied());
    writer.write_record(&header)?;

    for row in &view.year_over_year_growth {
        let mut record = vec![row.year.to_string()];
        record.extend(makes.iter().map(|m| row.count_for(m).to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), makes = makes.len(), "Growth CSV written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;
    use crate::dataset::Dataset;
    use crate::record::VehicleRecord;

    fn view() -> DashboardView {
        let rec = |year: i32, make: &str| VehicleRecord {
            model_year: Some(year),
            make: Some(make.into()),
            model: Some("M".into()),
            city: Some("Olympia".into()),
            ..Default::default()
        };
        Dashboard::new(Dataset::from_records(vec![
            rec(2019, "NISSAN"),
            rec(2020, "TESLA"),
            rec(2020, "TESLA"),
        ]))
        .view()
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&view());
    }

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");

        write_json(Some(path.as_path()), &view()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["filtered_records"], 3);
        assert_eq!(json["state_counts"][0]["state"], "Olympia");
        assert_eq!(json["year_over_year_growth"][1]["TESLA"], 2);
    }

    #[test]
    fn test_export_csv_writes_every_aggregate() {
        let dir = tempfile::tempdir().unwrap();

        let written = export_csv(dir.path(), &view()).unwrap();

        assert_eq!(written.len(), 10);
        assert!(written.iter().all(|p| p.exists()));

        let cities = fs::read_to_string(dir.path().join("city_counts.csv")).unwrap();
        assert_eq!(cities.lines().next(), Some("state,count"));
        assert_eq!(cities.lines().nth(1), Some("Olympia,3"));
    }

    #[test]
    fn test_growth_csv_fills_missing_makes_with_zero() {
        let dir = tempfile::tempdir().unwrap();
        export_csv(dir.path(), &view()).unwrap();

        let growth = fs::read_to_string(dir.path().join("year_growth.csv")).unwrap();
        let lines: Vec<_> = growth.lines().collect();

        assert_eq!(lines, vec!["year,NISSAN,TESLA", "2019,1,0", "2020,0,2"]);
    }
}

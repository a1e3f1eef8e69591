//! Loading the registration dataset from a file or URL.
//!
//! The whole document is read and parsed before a [`Dataset`] is returned.
//! Supported layouts:
//! * `.csv`  – header row, columns in any order
//! * `.json` – `[{ "Make": "TESLA", "Model Year": 2020, ... }, ...]`
//! * either of the above gzip-compressed (`.gz` suffix or gzip magic bytes)

use std::collections::BTreeSet;
use std::io::Read;
use std::time::Instant;

use flate2::read::GzDecoder;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::record::{RawRow, VehicleRecord};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    /// Picks the format from a path or URL, ignoring a trailing `.gz` and any
    /// query string. Unknown extensions are read as CSV.
    pub fn from_source(source: &str) -> Self {
        let path = source.split(['?', '#']).next().unwrap_or(source);
        let path = path.to_ascii_lowercase();
        let path = path.strip_suffix(".gz").unwrap_or(&path);

        if path.ends_with(".json") {
            DataFormat::Json
        } else {
            DataFormat::Csv
        }
    }
}

/// Distinct values offered as filter choices, computed once per load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub cities: Vec<String>,
    pub makes: Vec<String>,
    pub vehicle_types: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[VehicleRecord]) -> Self {
        let mut years = BTreeSet::new();
        let mut cities = BTreeSet::new();
        let mut makes = BTreeSet::new();
        let mut vehicle_types = BTreeSet::new();

        for r in records {
            if let Some(year) = r.model_year {
                years.insert(year);
            }
            insert_text(&mut cities, &r.city);
            insert_text(&mut makes, &r.make);
            insert_text(&mut vehicle_types, &r.electric_vehicle_type);
        }

        FilterOptions {
            years: years.into_iter().collect(),
            cities: cities.into_iter().collect(),
            makes: makes.into_iter().collect(),
            vehicle_types: vehicle_types.into_iter().collect(),
        }
    }
}

fn insert_text(set: &mut BTreeSet<String>, value: &Option<String>) {
    if let Some(v) = value.as_ref().filter(|v| !v.is_empty()) {
        set.insert(v.clone());
    }
}

/// One immutable snapshot of the loaded registrations.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<VehicleRecord>,
    options: FilterOptions,
}

impl Dataset {
    pub fn from_records(records: Vec<VehicleRecord>) -> Self {
        let options = FilterOptions::from_records(&records);
        Self { records, options }
    }

    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loads a dataset from a local path or an `http(s)://` URL.
#[tracing::instrument(skip(client))]
pub async fn load<C: HttpClient>(client: &C, source: &str) -> Result<Dataset, LoadError> {
    let start = Instant::now();

    let bytes = if is_remote(source) {
        fetch_bytes(client, source).await?.to_vec()
    } else {
        tokio::fs::read(source).await?
    };
    debug!(bytes = bytes.len(), "Dataset body received");

    let format = DataFormat::from_source(source);
    let records = parse_bytes(&bytes, format)?;
    let dataset = Dataset::from_records(records);

    info!(
        records = dataset.len(),
        ?format,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Dataset loaded"
    );
    Ok(dataset)
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Parses a complete document, decompressing it first if it is gzip.
pub fn parse_bytes(bytes: &[u8], format: DataFormat) -> Result<Vec<VehicleRecord>, LoadError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut inflated)?;
        debug!(compressed = bytes.len(), inflated = inflated.len(), "Decompressed gzip body");
        return parse_bytes(&inflated, format);
    }

    let rows = match format {
        DataFormat::Csv => csv_rows(bytes)?,
        DataFormat::Json => json_rows(bytes)?,
    };
    Ok(rows.iter().map(VehicleRecord::from_row).collect())
}

fn csv_rows(bytes: &[u8]) -> Result<Vec<RawRow>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers: Vec<String> = rdr.byte_headers()?.iter().map(lossy).collect();
    if headers.is_empty() {
        return Err(LoadError::Shape("CSV has no header row".into()));
    }

    // Short rows simply lack the trailing columns. Bad UTF-8 in a cell is
    // replaced, never a load failure.
    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), lossy(value)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn json_rows(bytes: &[u8]) -> Result<Vec<RawRow>, LoadError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let items = root
        .as_array()
        .ok_or_else(|| LoadError::Shape("expected a top-level JSON array".into()))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| -> Result<RawRow, LoadError> {
            let obj = item
                .as_object()
                .ok_or_else(|| LoadError::Shape(format!("row {i} is not a JSON object")))?;

            Ok(obj
                .iter()
                .filter_map(|(key, val)| json_text(val).map(|text| (key.clone(), text)))
                .collect())
        })
        .collect()
}

/// Text form of a JSON cell; `null` is absent.
fn json_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const CSV: &str = "\
Make,Model Year,City,Model,Electric Range
TESLA,2020,Seattle,MODEL 3,266
NISSAN,n/a,,LEAF,
";

    #[test]
    fn test_format_from_source() {
        assert_eq!(DataFormat::from_source("data.json"), DataFormat::Json);
        assert_eq!(DataFormat::from_source("DATA.JSON.gz"), DataFormat::Json);
        assert_eq!(
            DataFormat::from_source("https://host/rows.json?limit=10"),
            DataFormat::Json
        );
        assert_eq!(DataFormat::from_source("ev.csv"), DataFormat::Csv);
        assert_eq!(DataFormat::from_source("ev.txt"), DataFormat::Csv);
    }

    #[test]
    fn test_parse_csv_by_header_name() {
        let records = parse_bytes(CSV.as_bytes(), DataFormat::Csv).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].make.as_deref(), Some("TESLA"));
        assert_eq!(records[0].model_year, Some(2020));
        assert_eq!(records[0].electric_range, Some(266));
        assert_eq!(records[1].model_year, None);
        assert_eq!(records[1].city.as_deref(), Some(""));
        assert_eq!(records[1].electric_range, None);
        assert_eq!(records[1].state, None);
    }

    #[test]
    fn test_parse_csv_short_row_is_kept() {
        let text = "Make,Model,City\nKIA\n";
        let records = parse_bytes(text.as_bytes(), DataFormat::Csv).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].make.as_deref(), Some("KIA"));
        assert_eq!(records[0].city, None);
    }

    #[test]
    fn test_parse_csv_invalid_utf8_cell_keeps_record() {
        let text = b"Make,City,Model Year\nTESLA,Seattle,2020\nKIA,\xff\xfe,2021\n";
        let records = parse_bytes(text, DataFormat::Csv).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].make.as_deref(), Some("KIA"));
        assert_eq!(records[1].model_year, Some(2021));
        assert_eq!(records[1].city.as_deref(), Some("\u{FFFD}\u{FFFD}"));
    }

    #[test]
    fn test_parse_csv_without_header_fails() {
        let result = parse_bytes(b"", DataFormat::Csv);
        assert!(matches!(result, Err(LoadError::Shape(_))));
    }

    #[test]
    fn test_parse_json_rows() {
        let text = r#"[
            {"Make": "TESLA", "Model Year": 2019, "Legislative District": null},
            {"Make": "FORD", "Electric Range": "0"}
        ]"#;
        let records = parse_bytes(text.as_bytes(), DataFormat::Json).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].model_year, Some(2019));
        assert_eq!(records[0].legislative_district, None);
        assert_eq!(records[1].electric_range, Some(0));
    }

    #[test]
    fn test_parse_json_wrong_shape() {
        assert!(matches!(
            parse_bytes(br#"{"Make": "TESLA"}"#, DataFormat::Json),
            Err(LoadError::Shape(_))
        ));
        assert!(matches!(
            parse_bytes(br#"[1, 2]"#, DataFormat::Json),
            Err(LoadError::Shape(_))
        ));
        assert!(matches!(
            parse_bytes(b"not json", DataFormat::Json),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_parse_gzip_body() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(CSV.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let records = parse_bytes(&compressed, DataFormat::Csv).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_filter_options_sorted_and_distinct() {
        let records = parse_bytes(CSV.as_bytes(), DataFormat::Csv).unwrap();
        let dataset = Dataset::from_records(records);
        let options = dataset.options();

        assert_eq!(options.years, vec![2020]);
        assert_eq!(options.cities, vec!["Seattle".to_string()]);
        assert_eq!(options.makes, vec!["NISSAN".to_string(), "TESLA".to_string()]);
        assert!(options.vehicle_types.is_empty());
    }
}

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::DataConfig;
use crate::domain::{CountrySnapshot, DailyRecord};
use crate::error::{DashboardError, Result};
use crate::store::DataStore;

const COUNTRY_COLUMNS: [&str; 7] = [
    "Country/Region",
    "Confirmed",
    "Deaths",
    "Recovered",
    "Active",
    "Deaths / 100 Cases",
    "Recovered / 100 Cases",
];

const DAILY_COLUMNS: [&str; 6] = [
    "Province/State",
    "Country/Region",
    "Date",
    "Confirmed",
    "Deaths",
    "Recovered",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Cell values read as missing, the same set pandas uses by default.
const NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Counts are bounded like an int64 column.
const MAX_COUNT: u64 = i64::MAX as u64;

/// Running per-column sums, so that no query summing a whole column can
/// overflow later.
#[derive(Debug, Default)]
struct ColumnTotals {
    confirmed: u64,
    deaths: u64,
    recovered: u64,
}

impl ColumnTotals {
    fn add(&mut self, source_name: &str, line: u64, confirmed: u64, deaths: u64, recovered: u64) -> Result<()> {
        let checked = |total: u64, value: u64, column: &str| {
            total.checked_add(value).ok_or_else(|| {
                DashboardError::parse(source_name, line, format!("column '{}': total overflows", column))
            })
        };
        self.confirmed = checked(self.confirmed, confirmed, "Confirmed")?;
        self.deaths = checked(self.deaths, deaths, "Deaths")?;
        self.recovered = checked(self.recovered, recovered, "Recovered")?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RawCountryRow {
    #[serde(rename = "Country/Region")]
    country: Option<String>,
    #[serde(rename = "Confirmed")]
    confirmed: Option<String>,
    #[serde(rename = "Deaths")]
    deaths: Option<String>,
    #[serde(rename = "Recovered")]
    recovered: Option<String>,
    #[serde(rename = "Active")]
    active: Option<String>,
    #[serde(rename = "Deaths / 100 Cases")]
    deaths_per_100: Option<String>,
    #[serde(rename = "Recovered / 100 Cases")]
    recovered_per_100: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDailyRow {
    #[serde(rename = "Province/State")]
    province: Option<String>,
    #[serde(rename = "Country/Region")]
    country: Option<String>,
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Confirmed")]
    confirmed: Option<String>,
    #[serde(rename = "Deaths")]
    deaths: Option<String>,
    #[serde(rename = "Recovered")]
    recovered: Option<String>,
}

/// Reads both tables from disk. Any failure here is fatal for the process.
pub fn load(config: &DataConfig) -> Result<DataStore> {
    let start_time = Instant::now();
    info!(action = "start", component = "dataset_loader", "Loading datasets");

    let countries = read_country_snapshots(
        open(&config.country_path)?,
        &source_name(&config.country_path),
    )?;
    let daily = read_daily_records(open(&config.daily_path)?, &source_name(&config.daily_path))?;

    info!(
        action = "complete",
        component = "dataset_loader",
        country_rows = countries.len(),
        daily_rows = daily.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Datasets loaded"
    );
    Ok(DataStore::new(countries, daily))
}

/// Parses the per-country snapshot table, zero-filling missing numbers and
/// deriving `active_per_100`.
pub fn read_country_snapshots<R: Read>(reader: R, source_name: &str) -> Result<Vec<CountrySnapshot>> {
    let start_time = Instant::now();
    let mut reader = csv_reader(reader);
    let headers = read_headers(&mut reader, source_name, &COUNTRY_COLUMNS)?;

    let mut seen = HashSet::new();
    let mut totals = ColumnTotals::default();
    let mut rows = Vec::new();
    for record in reader.records() {
        let mut record = record.map_err(|e| csv_error(source_name, e))?;
        let line = line_of(&record);
        pad_to(&mut record, headers.len());
        let raw: RawCountryRow = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(source_name, e))?;

        let country = raw.country.unwrap_or_default();
        if country.is_empty() {
            return Err(DashboardError::parse(source_name, line, "empty Country/Region"));
        }
        if !seen.insert(country.clone()) {
            return Err(DashboardError::parse(
                source_name,
                line,
                format!("duplicate country '{}'", country),
            ));
        }

        let deaths_per_100 = parse_ratio(
            source_name,
            line,
            "Deaths / 100 Cases",
            raw.deaths_per_100.as_deref(),
        )?;
        let recovered_per_100 = parse_ratio(
            source_name,
            line,
            "Recovered / 100 Cases",
            raw.recovered_per_100.as_deref(),
        )?;

        let confirmed = parse_count(source_name, line, "Confirmed", raw.confirmed.as_deref())?;
        let deaths = parse_count(source_name, line, "Deaths", raw.deaths.as_deref())?;
        let recovered = parse_count(source_name, line, "Recovered", raw.recovered.as_deref())?;
        totals.add(source_name, line, confirmed, deaths, recovered)?;

        rows.push(CountrySnapshot {
            confirmed,
            deaths,
            recovered,
            active: parse_count(source_name, line, "Active", raw.active.as_deref())?,
            active_per_100: 100.0 - deaths_per_100 - recovered_per_100,
            deaths_per_100,
            recovered_per_100,
            country,
        });
    }

    debug!(
        action = "parsed",
        component = "country_table",
        source = source_name,
        row_count = rows.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Parsed country snapshot table"
    );
    Ok(rows)
}

/// Parses the daily time-series table. Every date must parse.
pub fn read_daily_records<R: Read>(reader: R, source_name: &str) -> Result<Vec<DailyRecord>> {
    let start_time = Instant::now();
    let mut reader = csv_reader(reader);
    let headers = read_headers(&mut reader, source_name, &DAILY_COLUMNS)?;

    let mut totals = ColumnTotals::default();
    let mut rows = Vec::new();
    for record in reader.records() {
        let mut record = record.map_err(|e| csv_error(source_name, e))?;
        let line = line_of(&record);
        pad_to(&mut record, headers.len());
        let raw: RawDailyRow = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(source_name, e))?;

        let date = parse_date(source_name, line, raw.date.as_deref())?;
        let confirmed = parse_count(source_name, line, "Confirmed", raw.confirmed.as_deref())?;
        let deaths = parse_count(source_name, line, "Deaths", raw.deaths.as_deref())?;
        let recovered = parse_count(source_name, line, "Recovered", raw.recovered.as_deref())?;
        totals.add(source_name, line, confirmed, deaths, recovered)?;

        rows.push(DailyRecord {
            country: raw.country.unwrap_or_default(),
            province: non_missing(raw.province.as_deref()).unwrap_or_default().to_string(),
            date,
            confirmed,
            deaths,
            recovered,
        });
    }

    debug!(
        action = "parsed",
        component = "daily_table",
        source = source_name,
        row_count = rows.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Parsed daily time-series table"
    );
    Ok(rows)
}

fn open(path: &Path) -> Result<File> {
    info!(action = "open", component = "dataset_loader", path = ?path, "Opening dataset");
    File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    // Short rows leave their trailing cells missing.
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_headers<R: Read>(
    reader: &mut csv::Reader<R>,
    source_name: &str,
    required: &[&str],
) -> Result<csv::StringRecord> {
    let headers = reader
        .headers()
        .map_err(|e| csv_error(source_name, e))?
        .clone();

    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DashboardError::parse(
                source_name,
                1,
                format!("missing required column '{}'", column),
            ));
        }
    }
    Ok(headers)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn pad_to(record: &mut csv::StringRecord, len: usize) {
    while record.len() < len {
        record.push_field("");
    }
}

fn csv_error(source_name: &str, err: csv::Error) -> DashboardError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    DashboardError::parse(source_name, line, err.to_string())
}

fn non_missing(value: Option<&str>) -> Option<&str> {
    match value {
        None => None,
        Some(v) if v.is_empty() || NA_VALUES.contains(&v) => None,
        Some(v) => Some(v),
    }
}

fn parse_count(source_name: &str, line: u64, column: &str, value: Option<&str>) -> Result<u64> {
    let Some(value) = non_missing(value) else {
        return Ok(0);
    };
    if let Ok(count) = value.parse::<u64>() {
        if count <= MAX_COUNT {
            return Ok(count);
        }
    }
    // Columns that held a missing value upstream are often written as floats.
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < MAX_COUNT as f64 => Ok(v as u64),
        _ => Err(DashboardError::parse(
            source_name,
            line,
            format!("column '{}': invalid count '{}'", column, value),
        )),
    }
}

fn parse_ratio(source_name: &str, line: u64, column: &str, value: Option<&str>) -> Result<f64> {
    let Some(value) = non_missing(value) else {
        return Ok(0.0);
    };
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DashboardError::parse(
            source_name,
            line,
            format!("column '{}': invalid number '{}'", column, value),
        )),
    }
}

fn parse_date(source_name: &str, line: u64, value: Option<&str>) -> Result<NaiveDate> {
    let value = value.unwrap_or_default();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| DashboardError::parse(source_name, line, format!("unparseable date '{}'", value)))
}

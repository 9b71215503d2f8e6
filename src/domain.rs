use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Latest cumulative counts for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySnapshot {
    pub country: String,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub active: u64,
    pub deaths_per_100: f64,
    pub recovered_per_100: f64,
    /// `100 - deaths_per_100 - recovered_per_100`, deliberately unclamped.
    pub active_per_100: f64,
}

/// Cumulative counts for one country (and province, if any) on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    pub country: String,
    pub province: String,
    pub date: NaiveDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Confirmed,
    Deaths,
    Recovered,
    Active,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Confirmed,
        Metric::Deaths,
        Metric::Recovered,
        Metric::Active,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Confirmed => "Confirmed",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
            Metric::Active => "Active",
        }
    }

    /// Label shown in the top-countries selector.
    pub fn display_label(self) -> &'static str {
        match self {
            Metric::Confirmed => "Confirmed Cases",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
            Metric::Active => "Active Cases",
        }
    }

    pub fn value_of(self, row: &CountrySnapshot) -> u64 {
        match self {
            Metric::Confirmed => row.confirmed,
            Metric::Deaths => row.deaths,
            Metric::Recovered => row.recovered,
            Metric::Active => row.active,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| DashboardError::InvalidMetric(s.to_string()))
    }
}

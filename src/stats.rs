use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{CountrySnapshot, Metric};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalTotals {
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
}

/// Worldwide sums for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryBreakdown {
    pub country: String,
    /// Active / Deaths / Recovered shares per 100 cases.
    pub proportions: Vec<(&'static str, f64)>,
    /// Confirmed / Deaths / Recovered / Active raw counts.
    pub counts: Vec<(&'static str, u64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCountries<'a> {
    pub metric: Metric,
    pub rows: Vec<&'a CountrySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoPoint<'a> {
    pub country: &'a str,
    pub value: u64,
}

//! Read-only queries over the loaded tables.
//!
//! Every function here borrows the store and returns a freshly built view;
//! nothing is cached between calls.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::Metric;
use crate::error::{DashboardError, Result};
use crate::stats::{CountryBreakdown, GeoPoint, GlobalTotals, TopCountries, TrendPoint};
use crate::store::DataStore;

pub const DEFAULT_TOP_N: usize = 10;

/// Column totals are checked for overflow when the tables are loaded, so
/// these sums cannot overflow.
pub fn global_totals(store: &DataStore) -> GlobalTotals {
    store
        .countries()
        .iter()
        .fold(GlobalTotals::default(), |mut acc, row| {
            acc.confirmed += row.confirmed;
            acc.deaths += row.deaths;
            acc.recovered += row.recovered;
            acc
        })
}

/// Per-date sums over the daily table, ascending by date.
pub fn daily_trend(store: &DataStore) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, TrendPoint> = BTreeMap::new();
    for record in store.daily() {
        let point = by_date.entry(record.date).or_insert(TrendPoint {
            date: record.date,
            confirmed: 0,
            deaths: 0,
            recovered: 0,
        });
        point.confirmed += record.confirmed;
        point.deaths += record.deaths;
        point.recovered += record.recovered;
    }

    debug!(
        action = "aggregate",
        component = "daily_trend",
        input_rows = store.daily().len(),
        dates = by_date.len(),
        "Grouped daily records by date"
    );
    by_date.into_values().collect()
}

pub fn country_breakdown(store: &DataStore, country: &str) -> Result<CountryBreakdown> {
    let row = store
        .country(country)
        .ok_or_else(|| DashboardError::NotFound(country.to_string()))?;

    Ok(CountryBreakdown {
        country: row.country.clone(),
        proportions: vec![
            ("Active", row.active_per_100),
            ("Deaths", row.deaths_per_100),
            ("Recovered", row.recovered_per_100),
        ],
        counts: vec![
            ("Confirmed", row.confirmed),
            ("Deaths", row.deaths),
            ("Recovered", row.recovered),
            ("Active", row.active),
        ],
    })
}

/// The `n` largest rows by `metric`. Ties keep table order.
pub fn top_n(store: &DataStore, metric: Metric, n: usize) -> TopCountries<'_> {
    let mut rows: Vec<_> = store.countries().iter().collect();
    rows.sort_by(|a, b| metric.value_of(b).cmp(&metric.value_of(a)));
    rows.truncate(n);
    TopCountries { metric, rows }
}

/// Every snapshot row projected to `(country, metric)`.
pub fn geo_series(store: &DataStore, metric: Metric) -> Vec<GeoPoint<'_>> {
    store
        .countries()
        .iter()
        .map(|row| GeoPoint {
            country: &row.country,
            value: metric.value_of(row),
        })
        .collect()
}

//! Formats query results into the minimal shape each widget draws.
//!
//! No lookups or filtering happen here; inputs are only read.

use serde::Serialize;

use crate::aggregate::DEFAULT_TOP_N;
use crate::domain::Metric;
use crate::stats::{CountryBreakdown, GeoPoint, TopCountries, TrendPoint};
use crate::utils::format_number;

pub const TREND_TITLE: &str = "Global COVID-19 Trends";
pub const GEO_LOCATION_MODE: &str = "country names";
pub const GEO_COLOR_SCALE: &str = "Viridis";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    Number {
        text: String,
    },
    Line {
        title: String,
        x: Vec<String>,
        series: Vec<Series>,
    },
    Bar {
        title: Option<String>,
        x_label: String,
        y_label: String,
        x: Vec<String>,
        y: Vec<u64>,
    },
    Pie {
        title: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Choropleth {
        title: String,
        location_mode: String,
        color_scale: String,
        metric: Metric,
        locations: Vec<String>,
        values: Vec<u64>,
    },
}

pub fn total_number(value: u64) -> Figure {
    Figure::Number {
        text: format_number(value),
    }
}

pub fn trend_chart(points: &[TrendPoint]) -> Figure {
    let series = |name: &str, pick: fn(&TrendPoint) -> u64| Series {
        name: name.to_string(),
        values: points.iter().map(pick).collect(),
    };

    Figure::Line {
        title: TREND_TITLE.to_string(),
        x: points.iter().map(|p| p.date.format("%Y-%m-%d").to_string()).collect(),
        series: vec![
            series("Confirmed", |p| p.confirmed),
            series("Deaths", |p| p.deaths),
            series("Recovered", |p| p.recovered),
        ],
    }
}

pub fn top_countries_chart(top: &TopCountries<'_>) -> Figure {
    Figure::Bar {
        title: Some(format!("Top {} Countries by {} Cases", DEFAULT_TOP_N, top.metric)),
        x_label: "Country/Region".to_string(),
        y_label: top.metric.to_string(),
        x: top.rows.iter().map(|row| row.country.clone()).collect(),
        y: top.rows.iter().map(|row| top.metric.value_of(row)).collect(),
    }
}

pub fn country_bar(breakdown: &CountryBreakdown) -> Figure {
    Figure::Bar {
        title: None,
        x_label: "Type of Case".to_string(),
        y_label: "No. of Cases".to_string(),
        x: breakdown.counts.iter().map(|(label, _)| label.to_string()).collect(),
        y: breakdown.counts.iter().map(|(_, count)| *count).collect(),
    }
}

pub fn country_pie(breakdown: &CountryBreakdown) -> Figure {
    Figure::Pie {
        title: format!("COVID-19 Distribution in {}", breakdown.country),
        labels: breakdown.proportions.iter().map(|(label, _)| label.to_string()).collect(),
        values: breakdown.proportions.iter().map(|(_, share)| *share).collect(),
    }
}

pub fn geo_map(metric: Metric, points: &[GeoPoint<'_>]) -> Figure {
    Figure::Choropleth {
        title: format!("Global COVID-19 {} Cases", metric),
        location_mode: GEO_LOCATION_MODE.to_string(),
        color_scale: GEO_COLOR_SCALE.to_string(),
        metric,
        locations: points.iter().map(|p| p.country.to_string()).collect(),
        values: points.iter().map(|p| p.value).collect(),
    }
}

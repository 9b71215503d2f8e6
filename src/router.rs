//! Maps control changes to the widgets that depend on them.
//!
//! Each control owns a plain handler taking the control value and the store.
//! A handler never fails as a whole: every widget it touches reports its own
//! figure or error, so one bad selection cannot blank its siblings.

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::{self, DEFAULT_TOP_N};
use crate::domain::Metric;
use crate::error::{DashboardError, Result};
use crate::present::{self, Figure};
use crate::store::DataStore;

pub const INITIAL_TRIGGER: &str = "_";
pub const METRIC_DROPDOWN: &str = "metric-dropdown";
pub const COUNTRY_INPUT: &str = "country-input";
pub const CASE_INPUT: &str = "case-input";

pub const TOTAL_CASES: &str = "total-cases";
pub const TOTAL_DEATHS: &str = "total-deaths";
pub const TOTAL_RECOVERED: &str = "total-recovered";
pub const DAILY_TREND: &str = "daily-trend";
pub const TOP_COUNTRIES_CHART: &str = "top-countries-chart";
pub const COUNTRY_BAR: &str = "country-bar";
pub const COUNTRY_PIE: &str = "country-pie";
pub const GEO_MAP: &str = "geo-map";

pub type Handler = fn(&DataStore, &str) -> Vec<WidgetUpdate>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WidgetState {
    Ok { figure: Figure },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetUpdate {
    pub widget: &'static str,
    #[serde(flatten)]
    pub state: WidgetState,
}

impl WidgetUpdate {
    fn from_result(widget: &'static str, result: Result<Figure>) -> Self {
        match result {
            Ok(figure) => Self {
                widget,
                state: WidgetState::Ok { figure },
            },
            Err(e) => Self::failed(widget, &e),
        }
    }

    fn failed(widget: &'static str, err: &DashboardError) -> Self {
        warn!(action = "render", component = "router", widget, error = %err, "Widget update failed");
        Self {
            widget,
            state: WidgetState::Error {
                message: err.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.state, WidgetState::Ok { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub control: &'static str,
    pub default: &'static str,
    pub widgets: &'static [&'static str],
    handler: Handler,
}

static BINDINGS: [Binding; 4] = [
    Binding {
        control: INITIAL_TRIGGER,
        default: "",
        widgets: &[TOTAL_CASES, TOTAL_DEATHS, TOTAL_RECOVERED, DAILY_TREND],
        handler: overview,
    },
    Binding {
        control: METRIC_DROPDOWN,
        default: "Confirmed",
        widgets: &[TOP_COUNTRIES_CHART],
        handler: top_countries,
    },
    Binding {
        control: COUNTRY_INPUT,
        default: "US",
        widgets: &[COUNTRY_BAR, COUNTRY_PIE],
        handler: country_analysis,
    },
    Binding {
        control: CASE_INPUT,
        default: "Active",
        widgets: &[GEO_MAP],
        handler: geographic_spread,
    },
];

pub struct Router<'a> {
    store: &'a DataStore,
}

impl<'a> Router<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a DataStore {
        self.store
    }

    pub fn bindings(&self) -> &'static [Binding] {
        &BINDINGS
    }

    pub fn binding(&self, control: &str) -> Option<&'static Binding> {
        BINDINGS.iter().find(|b| b.control == control)
    }

    /// Recomputes only the widgets bound to `control`.
    pub fn dispatch(&self, control: &str, value: &str) -> Result<Vec<WidgetUpdate>> {
        let binding = self
            .binding(control)
            .ok_or_else(|| DashboardError::UnknownControl(control.to_string()))?;
        debug!(action = "dispatch", component = "router", control, value, "Control changed");
        Ok((binding.handler)(self.store, value))
    }

    /// Every widget, driven by each control's declared default.
    pub fn initial_render(&self) -> Vec<WidgetUpdate> {
        BINDINGS
            .iter()
            .flat_map(|binding| (binding.handler)(self.store, binding.default))
            .collect()
    }
}

fn overview(store: &DataStore, _: &str) -> Vec<WidgetUpdate> {
    let totals = aggregate::global_totals(store);
    let trend = aggregate::daily_trend(store);
    vec![
        WidgetUpdate::from_result(TOTAL_CASES, Ok(present::total_number(totals.confirmed))),
        WidgetUpdate::from_result(TOTAL_DEATHS, Ok(present::total_number(totals.deaths))),
        WidgetUpdate::from_result(TOTAL_RECOVERED, Ok(present::total_number(totals.recovered))),
        WidgetUpdate::from_result(DAILY_TREND, Ok(present::trend_chart(&trend))),
    ]
}

fn top_countries(store: &DataStore, value: &str) -> Vec<WidgetUpdate> {
    let figure = value
        .parse::<Metric>()
        .map(|metric| present::top_countries_chart(&aggregate::top_n(store, metric, DEFAULT_TOP_N)));
    vec![WidgetUpdate::from_result(TOP_COUNTRIES_CHART, figure)]
}

fn country_analysis(store: &DataStore, value: &str) -> Vec<WidgetUpdate> {
    match aggregate::country_breakdown(store, value) {
        Ok(breakdown) => vec![
            WidgetUpdate::from_result(COUNTRY_BAR, Ok(present::country_bar(&breakdown))),
            WidgetUpdate::from_result(COUNTRY_PIE, Ok(present::country_pie(&breakdown))),
        ],
        Err(e) => [COUNTRY_BAR, COUNTRY_PIE]
            .into_iter()
            .map(|widget| WidgetUpdate::failed(widget, &e))
            .collect(),
    }
}

fn geographic_spread(store: &DataStore, value: &str) -> Vec<WidgetUpdate> {
    let figure = value
        .parse::<Metric>()
        .map(|metric| present::geo_map(metric, &aggregate::geo_series(store, metric)));
    vec![WidgetUpdate::from_result(GEO_MAP, figure)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountrySnapshot, DailyRecord};
    use chrono::NaiveDate;

    fn store() -> DataStore {
        let row = |country: &str, confirmed: u64| CountrySnapshot {
            country: country.to_string(),
            confirmed,
            deaths: confirmed / 10,
            recovered: confirmed / 2,
            active: confirmed - confirmed / 10 - confirmed / 2,
            deaths_per_100: 10.0,
            recovered_per_100: 50.0,
            active_per_100: 40.0,
        };
        DataStore::new(
            vec![row("US", 1000), row("India", 500), row("Chad", 20)],
            vec![DailyRecord {
                country: "US".to_string(),
                province: String::new(),
                date: NaiveDate::from_ymd_opt(2020, 7, 27).unwrap(),
                confirmed: 1000,
                deaths: 100,
                recovered: 500,
            }],
        )
    }

    fn widgets(updates: &[WidgetUpdate]) -> Vec<&'static str> {
        updates.iter().map(|u| u.widget).collect()
    }

    #[test]
    fn test_initial_render_covers_every_widget() {
        let store = store();
        let updates = Router::new(&store).initial_render();
        assert_eq!(
            widgets(&updates),
            vec![
                TOTAL_CASES,
                TOTAL_DEATHS,
                TOTAL_RECOVERED,
                DAILY_TREND,
                TOP_COUNTRIES_CHART,
                COUNTRY_BAR,
                COUNTRY_PIE,
                GEO_MAP
            ]
        );
        assert!(updates.iter().all(WidgetUpdate::is_ok));
        assert_eq!(
            updates[0].state,
            WidgetState::Ok {
                figure: Figure::Number {
                    text: "1,520".to_string()
                }
            }
        );
    }

    #[test]
    fn test_dispatch_only_touches_bound_widgets() {
        let store = store();
        let router = Router::new(&store);
        let updates = router.dispatch(CASE_INPUT, "Deaths").unwrap();
        assert_eq!(widgets(&updates), vec![GEO_MAP]);

        let updates = router.dispatch(COUNTRY_INPUT, "India").unwrap();
        assert_eq!(widgets(&updates), vec![COUNTRY_BAR, COUNTRY_PIE]);
        assert!(updates.iter().all(WidgetUpdate::is_ok));
    }

    #[test]
    fn test_unknown_country_fails_only_its_widgets() {
        let store = store();
        let updates = Router::new(&store).dispatch(COUNTRY_INPUT, "Nowhereland").unwrap();
        assert_eq!(widgets(&updates), vec![COUNTRY_BAR, COUNTRY_PIE]);
        assert_eq!(updates[0].state, updates[1].state);
        for update in &updates {
            match &update.state {
                WidgetState::Error { message } => assert!(message.contains("Nowhereland")),
                other => panic!("expected error state, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_metric_is_widget_error() {
        let store = store();
        let updates = Router::new(&store).dispatch(METRIC_DROPDOWN, "Tested").unwrap();
        assert_eq!(widgets(&updates), vec![TOP_COUNTRIES_CHART]);
        assert!(!updates[0].is_ok());
    }

    #[test]
    fn test_unknown_control() {
        let store = store();
        let err = Router::new(&store).dispatch("date-picker", "x").unwrap_err();
        assert!(matches!(err, DashboardError::UnknownControl(_)));
    }

    #[test]
    fn test_missing_default_country_keeps_siblings() {
        let store = DataStore::new(Vec::new(), Vec::new());
        let updates = Router::new(&store).initial_render();
        let failed: Vec<_> = updates.iter().filter(|u| !u.is_ok()).map(|u| u.widget).collect();
        assert_eq!(failed, vec![COUNTRY_BAR, COUNTRY_PIE]);
        assert_eq!(updates.len(), 8);
    }

    #[test]
    fn test_update_serialization() {
        let store = store();
        let updates = Router::new(&store).dispatch(COUNTRY_INPUT, "Atlantis").unwrap();
        let json = serde_json::to_value(&updates[0]).unwrap();
        assert_eq!(json["widget"], "country-bar");
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "country not found: Atlantis");
    }
}

use serde::Serialize;

use crate::domain::Metric;
use crate::router::{Router, CASE_INPUT, COUNTRY_INPUT, INITIAL_TRIGGER, METRIC_DROPDOWN};

pub const DASHBOARD_TITLE: &str = "COVID-19 Dashboard";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub id: &'static str,
    pub default: &'static str,
    pub placeholder: Option<&'static str>,
    pub options: Vec<ControlOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub label: &'static str,
    pub controls: Vec<Control>,
    pub widgets: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: &'static str,
    pub tabs: Vec<Tab>,
}

/// Widget tree descriptor for the host. Country options come only from
/// loaded keys, in table order.
pub fn layout(router: &Router<'_>) -> Layout {
    let control = |id: &'static str, placeholder: Option<&'static str>, options: Vec<ControlOption>| Control {
        id,
        default: router.binding(id).map(|b| b.default).unwrap_or_default(),
        placeholder,
        options,
    };

    let widgets = |id: &str| -> Vec<&'static str> {
        router.binding(id).map(|b| b.widgets.to_vec()).unwrap_or_default()
    };

    let metric_options = Metric::ALL
        .iter()
        .map(|m| ControlOption {
            label: m.display_label().to_string(),
            value: m.as_str().to_string(),
        })
        .collect();
    let case_options = Metric::ALL.iter().map(|m| same(m.as_str())).collect();
    let country_options = router.store().country_names().map(same).collect();

    Layout {
        title: DASHBOARD_TITLE,
        tabs: vec![
            Tab {
                label: "Overview",
                controls: Vec::new(),
                widgets: widgets(INITIAL_TRIGGER),
            },
            Tab {
                label: "Top Countries",
                controls: vec![control(METRIC_DROPDOWN, None, metric_options)],
                widgets: widgets(METRIC_DROPDOWN),
            },
            Tab {
                label: "Country Analysis",
                controls: vec![control(COUNTRY_INPUT, Some("Select a country"), country_options)],
                widgets: widgets(COUNTRY_INPUT),
            },
            Tab {
                label: "Geographical Spread",
                controls: vec![control(CASE_INPUT, Some("Select a Case"), case_options)],
                widgets: widgets(CASE_INPUT),
            },
        ],
    }
}

fn same(value: &str) -> ControlOption {
    ControlOption {
        label: value.to_string(),
        value: value.to_string(),
    }
}

use std::fs;

use covidash::aggregate::{country_breakdown, daily_trend, global_totals, top_n};
use covidash::router::{COUNTRY_INPUT, GEO_MAP};
use covidash::{load, server, DashboardError, DataConfig, Metric, Router};
use tempfile::TempDir;

const COUNTRY_CSV: &str = "\
Country/Region,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered,Deaths / 100 Cases,Recovered / 100 Cases,Deaths / 100 Recovered,WHO Region
Afghanistan,36263,1269,25198,9796,106,10,18,3.5,69.49,5.04,Eastern Mediterranean
US,4290259,148011,1325804,2816444,56336,1076,27941,3.45,30.9,11.16,Americas
Brazil,2442375,87618,1846641,,23284,614,33728,3.59,75.61,4.74,Americas
India,1480073,33408,951166,495499,44457,637,33598,2.26,64.26,3.51,South-East Asia
Chad,922,75,810,37,7,0,0,8.13,87.85,9.26,Africa
Peru,389717,,NA,,0,0,0,,,,Americas
";

const DAILY_CSV: &str = "\
Province/State,Country/Region,Lat,Long,Date,Confirmed,Deaths,Recovered,Active,WHO Region
,Afghanistan,33.93911,67.709953,2020-01-22,0,0,0,0,Eastern Mediterranean
Hubei,China,30.9756,112.2707,2020-01-22,444,17,28,399,Western Pacific
Beijing,China,40.1824,116.4142,2020-01-22,14,,0,14,Western Pacific
,US,40.0,-100.0,2020-01-23,1,0,0,1,Americas
Hubei,China,30.9756,112.2707,2020-01-23,444,17,28,399,Western Pacific
";

fn write_fixture(country: &str, daily: &str) -> (TempDir, DataConfig) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("country_wise_latest.csv"), country).unwrap();
    fs::write(dir.path().join("covid_19_clean_complete.csv"), daily).unwrap();
    let config = DataConfig::in_dir(dir.path());
    (dir, config)
}

#[test]
fn loads_and_aggregates_fixture_files() {
    let (_dir, config) = write_fixture(COUNTRY_CSV, DAILY_CSV);
    let store = load(&config).unwrap();

    assert_eq!(store.countries().len(), 6);
    assert_eq!(store.daily().len(), 5);

    // Peru's empty Deaths and NA Recovered cells count as zero.
    let totals = global_totals(&store);
    assert_eq!(totals.confirmed, 36263 + 4290259 + 2442375 + 1480073 + 922 + 389717);
    assert_eq!(totals.deaths, 1269 + 148011 + 87618 + 33408 + 75);
    assert_eq!(totals.recovered, 25198 + 1325804 + 1846641 + 951166 + 810);

    let trend = daily_trend(&store);
    assert_eq!(trend.len(), 2);
    assert_eq!((trend[0].confirmed, trend[0].deaths), (458, 17));
    assert_eq!(trend[1].confirmed, 445);

    let us = country_breakdown(&store, "US").unwrap();
    assert_eq!(
        us.counts,
        vec![("Confirmed", 4290259), ("Deaths", 148011), ("Recovered", 1325804), ("Active", 2816444)]
    );

    // Brazil's Active cell is empty and zero-filled.
    let top = top_n(&store, "Active".parse::<Metric>().unwrap(), 3);
    let names: Vec<_> = top.rows.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(names, vec!["US", "India", "Afghanistan"]);
}

#[test]
fn bad_date_aborts_load() {
    let daily = "Province/State,Country/Region,Date,Confirmed,Deaths,Recovered\n,US,22/22/2020,1,0,0\n";
    let (_dir, config) = write_fixture(COUNTRY_CSV, daily);
    match load(&config) {
        Err(DashboardError::Parse { source_name, line, .. }) => {
            assert_eq!(source_name, "covid_19_clean_complete.csv");
            assert_eq!(line, 2);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn serves_host_session_end_to_end() {
    let (_dir, config) = write_fixture(COUNTRY_CSV, DAILY_CSV);
    let store = load(&config).unwrap();
    let router = Router::new(&store);

    let session = format!(
        "{}\n{}\n{}\n",
        r#"{"op":"render"}"#,
        r#"{"op":"change","control":"case-input","value":"Deaths"}"#,
        r#"{"op":"change","control":"country-input","value":"Nowhereland"}"#,
    );
    let mut out = Vec::new();
    server::serve(&router, session.as_bytes(), &mut out).unwrap();

    let responses: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);

    let initial = responses[0]["updates"].as_array().unwrap();
    assert_eq!(initial.len(), 8);
    assert!(initial.iter().all(|u| u["status"] == "ok"));

    let geo = responses[1]["updates"].as_array().unwrap();
    assert_eq!(geo.len(), 1);
    assert_eq!(geo[0]["widget"], GEO_MAP);
    assert_eq!(geo[0]["figure"]["title"], "Global COVID-19 Deaths Cases");
    assert_eq!(geo[0]["figure"]["values"][1], 148011);

    let missing = responses[2]["updates"].as_array().unwrap();
    assert_eq!(missing.len(), 2);
    assert!(missing.iter().all(|u| u["status"] == "error"));

    // The failed selection left nothing behind.
    let again = router.dispatch(COUNTRY_INPUT, "US").unwrap();
    assert!(again.iter().all(|u| u.is_ok()));
}

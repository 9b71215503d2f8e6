use crate::domain::{CountrySnapshot, DailyRecord};

/// The two base tables, immutable once constructed.
///
/// Built once by the loader at startup and shared by reference with every
/// query. There are no mutating methods, so concurrent readers need no lock.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    countries: Vec<CountrySnapshot>,
    daily: Vec<DailyRecord>,
}

impl DataStore {
    pub fn new(countries: Vec<CountrySnapshot>, daily: Vec<DailyRecord>) -> Self {
        Self { countries, daily }
    }

    pub fn countries(&self) -> &[CountrySnapshot] {
        &self.countries
    }

    pub fn daily(&self) -> &[DailyRecord] {
        &self.daily
    }

    pub fn country(&self, name: &str) -> Option<&CountrySnapshot> {
        self.countries.iter().find(|row| row.country == name)
    }

    /// Country keys in table order.
    pub fn country_names(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(|row| row.country.as_str())
    }
}

use std::env;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "COVIDASH_DATA_DIR";
pub const COUNTRY_FILE: &str = "country_wise_latest.csv";
pub const DAILY_FILE: &str = "covid_19_clean_complete.csv";

/// Locations of the two input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub country_path: PathBuf,
    pub daily_path: PathBuf,
}

impl DataConfig {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            country_path: dir.join(COUNTRY_FILE),
            daily_path: dir.join(DAILY_FILE),
        }
    }

    /// Resolves the fixed file names against `COVIDASH_DATA_DIR`, or the
    /// working directory when unset.
    pub fn from_env() -> Self {
        match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::in_dir(PathBuf::from(dir)),
            _ => Self::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

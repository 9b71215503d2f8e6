pub mod aggregate;
pub mod args;
pub mod config;
pub mod domain;
pub mod error;
pub mod layout;
pub mod loader;
pub mod present;
pub mod router;
pub mod server;
pub mod stats;
pub mod store;
pub mod utils;

pub use args::Args;
pub use config::DataConfig;
pub use domain::{CountrySnapshot, DailyRecord, Metric};
pub use error::DashboardError;
pub use loader::load;
pub use router::Router;
pub use store::DataStore;

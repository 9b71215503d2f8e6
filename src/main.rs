use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use tracing::{error, info};

use covidash::{load, server, utils, Args, DataConfig, Router};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);

    let config = DataConfig::from_env();
    info!(action = "configure", component = "main", country_path = ?config.country_path, daily_path = ?config.daily_path, "Resolved data paths");

    // No partial dashboard: a load failure stops the process before serving.
    let store = match load(&config) {
        Ok(store) => store,
        Err(e) => {
            error!(action = "load", component = "main", error = %e, "Failed to load datasets");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let router = Router::new(&store);
    let stdin = io::stdin();
    let stdout = io::stdout();
    server::serve(&router, stdin.lock(), stdout.lock()).context("Request loop failed")?;

    Ok(())
}

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "covidash",
    about = "Serve COVID-19 dashboard widget data to a rendering host over stdin/stdout",
    version,
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-pulse", version, about = "Periodic concurrent HTTP health-check monitor")]
pub struct Cli {
    /// Configuration file path
    #[arg(value_name = "FILE", env = "SITE_PULSE_CONFIG", default_value = "config.json")]
    pub config: PathBuf,
}

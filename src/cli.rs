use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scanhealth")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "Server health, statistics and diagnostics for the scanning admin backend")]
pub struct Cli {
    /// Write a default config file and exit
    #[arg(long = "init")]
    pub init: bool,

    /// Print the effective configuration
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Validate the configuration
    #[arg(short = 'c', long = "check")]
    pub check: bool,

    /// Use an alternative config file
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Check server health (default action)
    #[arg(long = "health")]
    pub health: bool,

    /// Fetch aggregate database statistics
    #[arg(short = 's', long = "stats")]
    pub stats: bool,

    /// Fetch the per-category record breakdown
    #[arg(long = "categories")]
    pub categories: bool,

    /// Run the endpoint diagnostic suite
    #[arg(short = 'd', long = "diagnose")]
    pub diagnose: bool,

    /// Emit JSON instead of text
    #[arg(long = "json")]
    pub json: bool,

    /// Override the per-attempt timeout in milliseconds
    #[arg(short = 't', long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u32>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

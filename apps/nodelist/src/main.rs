//! `nodelist` entry point.

mod app;
mod config;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Output a list of available nodes with their fingerprints.
#[derive(Parser, Debug)]
#[command(name = "nodelist", version)]
pub struct Args {
    /// Display all nodes even hidden ones.
    #[arg(short, long)]
    pub all: bool,

    /// Only display the number of nodes discovered.
    #[arg(short, long)]
    pub count_nodes: bool,

    /// Configuration file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Standard output carries the listing, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::Config::load(args.config.as_deref())?;

    let stdout = std::io::stdout();
    app::run(&args, &config, &mut stdout.lock())
}

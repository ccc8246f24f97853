//! batticon — a lightweight battery monitor with low/critical level commands.
//!
//! Run with:  `RUST_LOG=info batticon`

mod args;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = args::Args::parse();
    let config_path = args.config.clone().unwrap_or_else(batt_config::default_path);

    // `--debug` (or `debug = true` in the file) forces debug output; otherwise
    // RUST_LOG controls verbosity (default: info).  Logs go to stderr, stdout
    // carries the status lines.
    let debug = args.debug
        || batt_config::load(&config_path)
            .map(|c| c.debug)
            .unwrap_or(false);
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("batticon v{} starting", env!("CARGO_PKG_VERSION"));

    batt_tray::run(config_path, args.overrides()).map_err(Into::into)
}

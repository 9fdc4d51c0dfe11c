//! indent-detective - detect the indentation style of source files
//!
//! Votes on indentation changes between code lines and reports whether each
//! file indents with tabs or with spaces of a given width.

mod cli;
mod reporters;

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins; otherwise --log-level, raised to debug for --debug
    let level = if cli.debug && cli.log_level != "trace" {
        "debug"
    } else {
        cli.log_level.as_str()
    };
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let filter = env_filter.unwrap_or_else(|| EnvFilter::new(level));
    let (filter, filter_handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    // Config files are read with logging live, then may turn on debug output
    let config = cli.config();
    if config.enable_debug_messages && !from_env && !matches!(level, "debug" | "trace") {
        let directives = format!("{},indent_detective=debug", level);
        if let Err(e) = filter_handle.modify(|filter| *filter = EnvFilter::new(directives)) {
            warn!("Could not raise log level for debug messages: {}", e);
        }
    }

    cli::run(cli, config)
}

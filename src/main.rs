use anyhow::Result;
use clap::Parser;
use std::io;
use svcmap::cli::{Cli, Commands};
use svcmap::commands::{self, AnalyzeConfig, ServeConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            plain,
            verbosity,
        } => {
            init_logging(verbosity);
            commands::handle_analyze(AnalyzeConfig {
                path,
                format: format.into(),
                output,
                plain,
            })
        }
        Commands::Serve {
            ttl_seconds,
            verbosity,
        } => {
            init_logging(verbosity);
            commands::handle_serve(ServeConfig { ttl_seconds })
        }
        Commands::Init { force } => commands::init_config(force),
    }
}

/// Diagnostics go to stderr so reports on stdout stay parseable.
/// `RUST_LOG` takes precedence over the `-v` count.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

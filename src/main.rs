// dirserve: browsable http file server
// main entry point with minimal bootstrap logic

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use dirserve::config::{load_configuration, Cli};
use dirserve::server::{fs::write_not_found_page, start_server};

#[tokio::main]
async fn main() -> Result<()> {
    // parse command line arguments
    let cli = Cli::parse();

    // initialize logging based on verbosity flags
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    // load and merge configuration from file and cli
    let config = load_configuration(&cli)?;

    if config.server.write_404_page {
        write_not_found_page(&config.server.public_dir)?;
    }

    // start the http server
    start_server(config).await
}

/// initialize structured logging with tracing, to stderr or an appended log file
fn init_logging(verbose_count: u8, quiet_count: u8, log_file: Option<&Path>) -> Result<()> {
    // calculate log level: info (default) + verbose - quiet
    let base_level = 2i8; // info level
    let adjustment = verbose_count as i8 - quiet_count as i8;
    let final_level = (base_level + adjustment).clamp(0, 4);

    let level = match final_level {
        i8::MIN..=0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        4.. => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file: {}", path.display()))?;
            subscriber
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => subscriber.init(),
    }

    info!("logging initialized at level: {}", level);
    Ok(())
}

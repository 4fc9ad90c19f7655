//! Console front end for the Shelfkeep catalog.
//!
//! # Responsibility
//! - Resolve data/log paths from flags, environment and defaults.
//! - Run the interactive menu on stdin/stdout.
//! - Map session failures to a non-zero exit code.

mod console;
mod menu;

use clap::Parser;
use console::Console;
use log::{error, info};
use shelfkeep_core::config::{resolve_data_file, resolve_log_dir};
use shelfkeep_core::{default_log_level, init_logging, open_catalog};
use std::path::PathBuf;
use std::process::ExitCode;

/// Single-user library catalog on a JSON file.
#[derive(Parser, Debug)]
#[command(name = "shelfkeep", author, version, about, long_about = None)]
struct Args {
    /// Catalog file (defaults to $SHELFKEEP_DATA_FILE, then ./library.json)
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Log directory (defaults to $SHELFKEEP_LOG_DIR, then logs/ next to the catalog)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let data_file = resolve_data_file(args.data_file.as_deref());
    let log_dir = resolve_log_dir(args.log_dir.as_deref(), &data_file);
    let level = args.log_level.as_deref().unwrap_or(default_log_level());

    // Logging failures are non-fatal.
    if let Err(err) = init_logging(level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
    info!(
        "event=session_start module=cli status=ok data_file={}",
        data_file.display()
    );

    let service = open_catalog(&data_file);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let result = Console::new(&service, stdin.lock(), stdout.lock()).run();

    match result {
        Ok(()) => {
            info!("event=session_end module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=session_end module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

use clap::Parser;
use pget_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // Initialize logging as early as possible; --verbose goes to stderr, the
    // default goes to the state-dir log file with stderr as the fallback.
    if args.verbose {
        logging::init_logging_stderr(true);
    } else if logging::init_logging().is_err() {
        logging::init_logging_stderr(false);
    }

    if let Err(err) = cli::run(args).await {
        eprintln!("pget error: {:#}", err);
        std::process::exit(1);
    }
}

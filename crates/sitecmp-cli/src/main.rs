use sitecmp_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; stdout stays free for the report.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("log file unavailable ({:#}); logging to stderr", err);
    }

    if let Err(err) = Cli::run_from_args().await {
        tracing::error!("run failed: {:#}", err);
        eprintln!("sitecmp error: {:#}", err);
        std::process::exit(1);
    }
}

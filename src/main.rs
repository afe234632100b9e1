use std::process::ExitCode;
use std::sync::Arc;

use playback_metrics::config::{load_config, print_schema};
use playback_metrics::startup::run;
use playback_metrics::utils::logger::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    if std::env::args().any(|arg| arg == "--print-schema") {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(Arc::new(config)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server terminated: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! Microservice Log Generator - synthetic log traffic for pipeline testing
//!
//! This service writes one fake microservice log record per interval to
//! standard output and to hourly rotating files under the logs directory.
//!
//! ## Features
//!
//! - JSON log lines with timestamp, level, service, message, and id
//! - Hourly file rotation keeping the five most recent historical files
//! - Graceful shutdown on SIGINT/SIGTERM
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `SERVICE_NAME`: Single service name and file identifier (default: six demo services, files named `service-*`)
//! - `LOG_GENERATOR_INTERVAL_MS`: Milliseconds between records (default: 1000)
//! - `LOG_GENERATOR_LOGS_DIR`: Directory for log files (default: logs)
//! - `RUST_LOG`: Diagnostic logging level filter (default: info)
//!
//! Diagnostics go to standard error so standard output carries only records.

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use microservice_log_generator::config::Config;
use microservice_log_generator::log_generator::{GeneratorLoop, LogGenerator, StopHandle};
use microservice_log_generator::sink::LogSink;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with environment filter
    init_tracing();

    info!("Starting log generator...");

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => {
            info!(
                service_name = config.service_name.as_deref().unwrap_or("<defaults>"),
                interval_ms = config.interval.as_millis() as u64,
                logs_dir = %config.logs_dir.display(),
                "Configuration loaded"
            );
            config
        }
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    // Open console and rotating file output
    let sink = match LogSink::open(&config.sink_config()) {
        Ok(sink) => sink,
        Err(e) => {
            error!(error = %e, "Failed to initialize log storage");
            std::process::exit(1);
        }
    };

    let generator = LogGenerator::new(config.allow_list());
    info!(services = ?generator.services(), "Log generator initialized");

    let mut generator_loop = GeneratorLoop::new(generator, sink);

    // Shutdown signals stop the loop at its next boundary
    let handle = generator_loop.stop_handle();
    tokio::spawn(stop_on_signal(handle));

    info!("Log generator running. Press Ctrl+C to stop.");
    let result = generator_loop.start(config.interval).await;

    // Release the open log file before exiting
    drop(generator_loop);

    match result {
        Ok(records_written) => {
            info!(records_written, "Log generator stopped");
        }
        Err(e) => {
            error!(error = %e, "Log generation failed");
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Wait for SIGINT or SIGTERM, then stop the generator loop.
async fn stop_on_signal(handle: StopHandle) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down gracefully..."),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully..."),
    }

    handle.stop();
}

//! Microservice Log Generator Library
//!
//! This library produces synthetic microservice log traffic for exercising
//! log-collection and monitoring pipelines:
//!
//! - **config**: Environment-based configuration
//! - **record**: Log levels, records, and the rendered JSON line
//! - **phrase**: Catch-phrase style message text
//! - **log_generator**: Random record synthesis and the periodic generator loop
//! - **sink**: Console plus file output behind the `RecordSink` trait
//! - **rotation**: Hourly rotating log files with bounded history
//! - **clock**: Injectable wall clock used for timestamps and rotation
//!
//! # Example
//!
//! ```no_run
//! use microservice_log_generator::config::Config;
//! use microservice_log_generator::log_generator::{GeneratorLoop, LogGenerator};
//! use microservice_log_generator::sink::LogSink;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Load configuration from environment
//!     let config = Config::from_env().expect("Failed to load config");
//!
//!     // Open console + rotating file output
//!     let sink = LogSink::open(&config.sink_config()).expect("Failed to open sink");
//!
//!     // Generate records until stopped
//!     let generator = LogGenerator::new(config.allow_list());
//!     let mut generator_loop = GeneratorLoop::new(generator, sink);
//!     generator_loop.start(config.interval).await.ok();
//! }
//! ```

// Module declarations
pub mod clock;
pub mod config;
pub mod log_generator;
pub mod phrase;
pub mod record;
pub mod rotation;
pub mod sink;

// Re-export commonly used types at crate root for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError};
pub use log_generator::{
    GeneratorError, GeneratorLoop, LogGenerator, LoopState, StopHandle, DEFAULT_INTERVAL,
    DEFAULT_SERVICE_NAMES,
};
pub use record::{LogLevel, LogLine, LogRecord};
pub use rotation::{RotatingFile, DEFAULT_MAX_HISTORY};
pub use sink::{LogSink, RecordSink, SinkConfig, SinkError};

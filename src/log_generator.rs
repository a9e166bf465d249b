//! Log generator module for simulating microservice log traffic.
//!
//! [`LogGenerator`] synthesizes individual records. [`GeneratorLoop`] drives
//! it on a fixed interval and hands every record to a [`RecordSink`] until it
//! is stopped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::phrase;
use crate::record::{LogLevel, LogRecord};
use crate::sink::{RecordSink, SinkError};

/// Service names used when no single service is configured.
pub const DEFAULT_SERVICE_NAMES: [&str; 6] = [
    "web-service",
    "auth-service",
    "user-service",
    "order-service",
    "inventory-service",
    "payment-service",
];

/// Default pause between two generated records.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// How often the loop reports its progress.
const PROGRESS_REPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Record generator with a fixed service allow-list.
///
/// Service and level are both picked uniformly at random.
#[derive(Debug, Clone)]
pub struct LogGenerator {
    services: Vec<String>,
}

impl LogGenerator {
    /// Create a generator drawing services from `services`.
    ///
    /// An empty list falls back to [`DEFAULT_SERVICE_NAMES`].
    pub fn new<I, S>(services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let services: Vec<String> = services.into_iter().map(Into::into).collect();
        if services.is_empty() {
            return Self::with_defaults();
        }
        Self { services }
    }

    /// Create a generator over the six default service names.
    pub fn with_defaults() -> Self {
        Self {
            services: DEFAULT_SERVICE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The allow-list of service names.
    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Generate a single random record.
    pub fn generate(&self) -> LogRecord {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate a single record from the given random source.
    pub fn generate_with(&self, rng: &mut impl Rng) -> LogRecord {
        let service = &self.services[rng.gen_range(0..self.services.len())];
        let level = LogLevel::all()
            .choose(rng)
            .copied()
            .unwrap_or(LogLevel::Info);
        let message = phrase::catch_phrase(rng);

        LogRecord::new(level, service.as_str(), message)
    }
}

impl Default for LogGenerator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Run state of a [`GeneratorLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Errors that end a generator run.
#[derive(Debug)]
pub enum GeneratorError {
    /// The requested interval was zero
    InvalidInterval(Duration),

    /// The sink failed to write a record
    Sink(SinkError),
}

impl std::fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorError::InvalidInterval(interval) => {
                write!(f, "Generation interval must be positive, got {:?}", interval)
            }
            GeneratorError::Sink(e) => write!(f, "Sink write failed: {}", e),
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeneratorError::Sink(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SinkError> for GeneratorError {
    fn from(err: SinkError) -> Self {
        GeneratorError::Sink(err)
    }
}

/// Cloneable handle that stops a running loop from another task.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request the loop to stop. Idempotent.
    ///
    /// The loop observes the request after its current sleep completes.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn state(&self) -> LoopState {
        if self.running.load(Ordering::SeqCst) {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }
}

/// Periodic driver that feeds generated records into a sink.
///
/// # Example
///
/// ```no_run
/// use microservice_log_generator::log_generator::{GeneratorLoop, LogGenerator, DEFAULT_INTERVAL};
/// use microservice_log_generator::sink::{LogSink, SinkConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let sink = LogSink::open(&SinkConfig::new("logs", "service")).expect("Failed to open sink");
///     let mut generator_loop = GeneratorLoop::new(LogGenerator::with_defaults(), sink);
///
///     let handle = generator_loop.stop_handle();
///     tokio::spawn(async move {
///         tokio::signal::ctrl_c().await.ok();
///         handle.stop();
///     });
///
///     generator_loop.start(DEFAULT_INTERVAL).await.ok();
/// }
/// ```
pub struct GeneratorLoop<S> {
    generator: LogGenerator,
    sink: S,
    running: Arc<AtomicBool>,
}

impl<S: RecordSink> GeneratorLoop<S> {
    /// Create a stopped loop.
    pub fn new(generator: LogGenerator, sink: S) -> Self {
        Self {
            generator,
            sink,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run until stopped, writing one record per `interval`.
    ///
    /// The interval is a fixed sleep after each write, so a slow write delays
    /// the next record. Returns the number of records written.
    ///
    /// # Errors
    ///
    /// `GeneratorError::InvalidInterval` for a zero interval (nothing is
    /// written), `GeneratorError::Sink` when a write fails. The loop is left
    /// `Stopped` in both cases.
    pub async fn start(&mut self, interval: Duration) -> Result<u64, GeneratorError> {
        if interval.is_zero() {
            return Err(GeneratorError::InvalidInterval(interval));
        }

        self.running.store(true, Ordering::SeqCst);
        info!(interval_ms = interval.as_millis() as u64, "Generator loop started");

        let mut records_written: u64 = 0;
        let mut since_report: u64 = 0;
        let mut last_report_time = Instant::now();

        while self.running.load(Ordering::SeqCst) {
            if let Err(e) = self.generate_one() {
                self.stop();
                return Err(e.into());
            }
            records_written += 1;
            since_report += 1;

            if last_report_time.elapsed() >= PROGRESS_REPORT_INTERVAL {
                info!(
                    records_generated = since_report,
                    rate = format!("{:.1}/s", since_report as f64 / last_report_time.elapsed().as_secs_f64()),
                    "Generator progress"
                );
                since_report = 0;
                last_report_time = Instant::now();
            }

            tokio::time::sleep(interval).await;
        }

        info!(records_written, "Generator loop stopped");
        Ok(records_written)
    }

    /// Generate exactly one record and write it. No timing involved.
    pub fn generate_one(&mut self) -> Result<LogRecord, SinkError> {
        let record = self.generator.generate();
        self.sink.write(&record)?;
        debug!(level = %record.level, service = %record.service, "Record written");
        Ok(record)
    }
}

impl<S> GeneratorLoop<S> {
    /// Request the loop to stop. Safe to call in any state.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn state(&self) -> LoopState {
        if self.running.load(Ordering::SeqCst) {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: self.running.clone(),
        }
    }

    pub fn generator(&self) -> &LogGenerator {
        &self.generator
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the loop and hand back its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

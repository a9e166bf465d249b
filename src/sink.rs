//! Sink module: renders records and writes them to the console and to the
//! hourly rotating file set.
//!
//! The sink is an ordinary owned value. It is built once at startup and handed
//! to the generator loop; nothing about it is registered globally.

use std::io::{self, Write};
use std::path::PathBuf;

use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::record::{LogLine, LogRecord};
use crate::rotation::{RotatingFile, DEFAULT_MAX_HISTORY};

/// Destination for generated records.
///
/// The generator loop is generic over this trait so it can be driven against
/// an in-memory sink in tests.
pub trait RecordSink {
    /// Persist one record. An error ends the generator loop.
    fn write(&mut self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Errors that can occur while opening or writing the sink.
#[derive(Debug)]
pub enum SinkError {
    /// The logs directory could not be created
    CreateDir { path: PathBuf, source: io::Error },

    /// A rotation file could not be opened
    OpenFile { path: PathBuf, source: io::Error },

    /// Writing to a rotation file failed
    Write { path: PathBuf, source: io::Error },

    /// Writing to the console failed
    Console(io::Error),

    /// The record could not be rendered
    Serialize(serde_json::Error),
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkError::CreateDir { path, source } => {
                write!(f, "Failed to create log directory {}: {}", path.display(), source)
            }
            SinkError::OpenFile { path, source } => {
                write!(f, "Failed to open log file {}: {}", path.display(), source)
            }
            SinkError::Write { path, source } => {
                write!(f, "Failed to write log file {}: {}", path.display(), source)
            }
            SinkError::Console(e) => write!(f, "Failed to write to console: {}", e),
            SinkError::Serialize(e) => write!(f, "Failed to render log record: {}", e),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::CreateDir { source, .. }
            | SinkError::OpenFile { source, .. }
            | SinkError::Write { source, .. } => Some(source),
            SinkError::Console(e) => Some(e),
            SinkError::Serialize(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        SinkError::Serialize(err)
    }
}

/// Settings for the file side of the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Directory holding the rotation files
    pub logs_dir: PathBuf,

    /// Fixed identifier used in file names (not the per-record service)
    pub identifier: String,

    /// Historical files kept besides the active one
    pub max_history: usize,
}

impl SinkConfig {
    pub fn new(logs_dir: impl Into<PathBuf>, identifier: impl Into<String>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            identifier: identifier.into(),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Console plus rotating-file sink.
pub struct LogSink {
    clock: Box<dyn Clock>,
    console: Box<dyn Write + Send>,
    file: RotatingFile,
    records_written: u64,
}

impl LogSink {
    /// Open the sink on standard output and the system clock.
    ///
    /// # Errors
    ///
    /// Returns a `SinkError` if the logs directory or the current hour's
    /// file cannot be created. This is a fatal startup condition.
    pub fn open(config: &SinkConfig) -> Result<Self, SinkError> {
        Self::with_parts(config, SystemClock, io::stdout())
    }

    /// Open the sink with an explicit clock and console writer.
    pub fn with_parts(
        config: &SinkConfig,
        clock: impl Clock + 'static,
        console: impl Write + Send + 'static,
    ) -> Result<Self, SinkError> {
        let file = RotatingFile::open(
            &config.logs_dir,
            config.identifier.as_str(),
            config.max_history,
            clock.now(),
        )?;

        info!(
            path = %file.active_path().display(),
            max_history = config.max_history,
            "Log sink opened"
        );

        Ok(Self {
            clock: Box::new(clock),
            console: Box::new(console),
            file,
            records_written: 0,
        })
    }

    /// The rotating file behind this sink.
    pub fn file(&self) -> &RotatingFile {
        &self.file
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}

impl RecordSink for LogSink {
    fn write(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        let now = self.clock.now();
        let line = LogLine::new(now, record.clone()).render()?;

        // Console first and unbuffered, so a crash never hides the last record.
        writeln!(self.console, "{}", line).map_err(SinkError::Console)?;
        self.console.flush().map_err(SinkError::Console)?;

        self.file.write_line(now, &line)?;
        self.records_written += 1;
        Ok(())
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink")
            .field("file", &self.file)
            .field("records_written", &self.records_written)
            .finish_non_exhaustive()
    }
}

//! Wall-clock source used to stamp records and drive hourly rotation.
//!
//! The sink never calls `chrono::Local::now()` directly; it asks a [`Clock`].
//! Production code uses [`SystemClock`], tests drive rotation with
//! [`ManualClock`] without waiting for real hours to pass.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Local, NaiveDateTime};

/// A source of local wall-clock time.
pub trait Clock: Send {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the operating system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A settable clock for simulated time.
///
/// Clones share the same underlying instant, so a test can keep one handle
/// and hand another to the sink.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, instant: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Move the clock forward (or backward, for a negative delta).
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

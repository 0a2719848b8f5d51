//! Time abstractions: the auto-timestamp unit table and the clock trait

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Optional auto-timestamp column configuration
///
/// When active, ending a row injects a `time (<unit>)` field holding the
/// elapsed running time divided by the unit's divisor (integer division).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimestampMode {
    /// No timestamp column
    #[default]
    None,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

/// A timestamp unit: human-readable label plus millisecond divisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnit {
    /// Short unit label, used in the column name
    pub label: &'static str,
    /// Divisor applied to elapsed milliseconds
    pub divisor: u64,
}

impl TimeUnit {
    /// Name of the timestamp column for this unit
    pub fn column_name(&self) -> String {
        format!("time ({})", self.label)
    }
}

impl TimestampMode {
    /// Look up the unit for this mode, or `None` when disabled
    pub fn unit(self) -> Option<TimeUnit> {
        match self {
            TimestampMode::None => None,
            TimestampMode::Milliseconds => Some(TimeUnit { label: "ms", divisor: 1 }),
            TimestampMode::Seconds => Some(TimeUnit { label: "s", divisor: 1_000 }),
            TimestampMode::Minutes => Some(TimeUnit { label: "min", divisor: 60_000 }),
            TimestampMode::Hours => Some(TimeUnit { label: "h", divisor: 3_600_000 }),
            TimestampMode::Days => Some(TimeUnit { label: "d", divisor: 86_400_000 }),
        }
    }

    /// Whether a timestamp column is active
    pub fn is_active(self) -> bool {
        self != TimestampMode::None
    }
}

/// Time abstraction for testability
///
/// Reports elapsed running time in milliseconds since some fixed origin
/// (process start, session start). Only differences matter to the logger.
pub trait Clock: Send + Sync {
    /// Elapsed running time in milliseconds
    fn running_millis(&self) -> u64;
}

/// Real clock anchored at its own construction
#[derive(Debug)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    /// Create a clock anchored at the current instant
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn running_millis(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock for deterministic tests
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock at a given elapsed time
    pub fn at(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    /// Set the elapsed time
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// Advance the elapsed time
    pub fn advance(&self, delta: u64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn running_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

//! Logger configuration

use serde::{Deserialize, Serialize};
use tablog_core::TimestampMode;

/// Default byte budget of the emulated storage region
pub const DEFAULT_LOG_CAPACITY: usize = 118 * 1024;

/// Default store name the log is persisted under
pub const DEFAULT_LOG_NAME: &str = "datalog.csv";

/// Default field separator
///
/// Values containing the separator are not escaped; such a value corrupts
/// column alignment on read-back. This is a known format limitation.
pub const DEFAULT_SEPARATOR: char = ',';

/// Configuration for a [`RowLogger`](crate::RowLogger)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Store name the log is persisted under
    pub log_name: String,
    /// Maximum byte budget before the log-full rollover
    pub capacity: usize,
    /// Field separator for header and data lines
    pub separator: char,
    /// Auto-timestamp column mode
    pub timestamp_mode: TimestampMode,
    /// Whether raw lines are mirrored to the serial side channel
    pub mirror_to_serial: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_name: DEFAULT_LOG_NAME.to_string(),
            capacity: DEFAULT_LOG_CAPACITY,
            separator: DEFAULT_SEPARATOR,
            timestamp_mode: TimestampMode::None,
            mirror_to_serial: false,
        }
    }
}

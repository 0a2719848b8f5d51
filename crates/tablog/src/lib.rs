//! # Tablog
//!
//! A capacity-bounded, append-only tabular data logger, modeled on a
//! hardware data-logger that persists rows of named columns into a
//! fixed-size storage region and erases when that region fills.
//!
//! ## Features
//!
//! - **RowLogger**: Incremental row building with schema evolution and an
//!   atomic log-full rollover
//! - **MemoryByteStore**: In-memory persistence sink for testing/simulation
//! - **FileByteStore**: File-based persistence sink for production
//! - **Recording collaborators**: Capture notifications and mirrored lines
//!   for assertions
//!
//! ## Example
//!
//! ```rust,ignore
//! use tablog::{RowLogger, SessionId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut logger = RowLogger::new();
//!     logger.start_session(SessionId::from("run-1")).await.unwrap();
//!
//!     logger.begin_row().unwrap();
//!     logger.log_field("temperature", "21.5", false).unwrap();
//!     logger.end_row().await.unwrap();
//!
//!     assert_eq!(logger.get_row_count(0).await.unwrap(), 2); // header + row
//! }
//! ```

pub mod config;
pub mod logger;
pub mod memory;
pub mod persistent;

// Re-exports
pub use config::{DEFAULT_LOG_CAPACITY, DEFAULT_LOG_NAME, DEFAULT_SEPARATOR, LoggerConfig};
pub use logger::{RowLogger, RowLoggerBuilder};
pub use memory::{MemoryByteStore, NullBus, NullMirror, RecordingBus, RecordingMirror};
pub use persistent::FileByteStore;

// Re-export core types for convenience
pub use tablog_core::{
    ByteStore, Clock, LineKind, LogEvent, LoggerError, ManualClock, MirrorSink, NotificationBus,
    SessionId, SessionSource, StoreError, SystemClock, TablogError, TimestampMode,
};

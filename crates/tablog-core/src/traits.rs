//! Collaborator traits for the row logger
//!
//! The logger itself owns all schema and in-progress-row state; everything
//! at its boundary (persistence, host notifications, serial/debug
//! mirroring) goes through the narrow interfaces defined here.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;
use crate::line::LineKind;

/// Append-only byte store keyed by a fixed log name
///
/// This is the persistence sink behind the logger. Content is
/// newline-terminated text; every line the logger writes ends with exactly
/// one terminator, so a store holding N terminators holds N logical rows
/// (header row included).
///
/// Implementations may be asynchronous internally, but calls are issued by
/// the logger one at a time and must be durable on return so that byte
/// accounting matches stored state.
#[async_trait]
pub trait ByteStore: Send + Sync {
    /// Append bytes to the end of the named store, creating it if absent
    async fn append(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Discard all bytes under the named store
    async fn remove(&self, name: &str) -> Result<(), StoreError>;

    /// Read the full stored content, or `None` if the store is absent
    async fn read_all(&self, name: &str) -> Result<Option<Bytes>, StoreError>;
}

/// Events the logger reports to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEvent {
    /// The log storage region filled and was erased
    LogFull,
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEvent::LogFull => write!(f, "log storage full"),
        }
    }
}

/// Fire-and-forget host notification sink
#[async_trait]
pub trait NotificationBus: Send + Sync {
    /// Deliver an event; must not fail and must not block the commit path
    async fn notify(&self, event: LogEvent);
}

/// Serial/debug side channels for mirrored lines
///
/// Two independent channels: raw-line mirroring (gated by the logger's
/// serial-mirroring flag) and structured `(line, kind)` mirroring (always
/// on for non-plaintext lines and clear events). Neither affects persisted
/// state or size accounting.
pub trait MirrorSink: Send + Sync {
    /// Mirror a raw line as written to storage
    fn mirror_raw(&self, line: &str);

    /// Mirror a line together with its kind on the structured channel
    fn mirror_typed(&self, line: &str, kind: LineKind);
}

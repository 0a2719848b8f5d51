//! The row logger
//!
//! Builds rows incrementally out of named key/value fields whose key set
//! may grow between rows, reconciles that growth against the header line
//! already persisted to storage, accounts serialized bytes against a hard
//! capacity limit, and performs an atomic log-full rollover.

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use tablog_core::{
    ByteStore, Clock, LineKind, LogEvent, LoggerError, MirrorSink, NotificationBus, SessionId,
    SessionSource, SystemClock, TablogError, TimestampMode,
};

use crate::config::LoggerConfig;
use crate::memory::{MemoryByteStore, NullBus, NullMirror};

/// Capacity-bounded, append-only tabular data logger
///
/// Holds all schema and in-progress-row state, and produces a linear
/// stream of committed lines (header, data, plain-text) handed to a
/// [`ByteStore`]. Reads back from the store to answer row-count and
/// row-range queries.
///
/// The contract assumes a single logical caller: operations run to
/// completion and each store call is awaited before the next is issued, so
/// the cumulative byte size always reflects exactly the bytes already
/// durably appended.
pub struct RowLogger {
    config: LoggerConfig,
    store: Arc<dyn ByteStore>,
    bus: Arc<dyn NotificationBus>,
    mirror: Arc<dyn MirrorSink>,
    clock: Arc<dyn Clock>,
    /// Ordered, unique column names; insertion order is output order
    headers: Vec<String>,
    /// Leading columns already reflected in the last persisted header line
    committed_cols: usize,
    /// In-progress row, indexed like `headers`; empty string means unset
    current_row: Option<Vec<String>>,
    /// Bytes durably appended since the last erase, terminators included
    log_size: usize,
    /// Last observed session identity
    session: Option<SessionId>,
}

impl RowLogger {
    /// Create a logger with default configuration and in-memory
    /// collaborators
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for configuring collaborators and limits
    pub fn builder() -> RowLoggerBuilder {
        RowLoggerBuilder::new()
    }

    /// Start a logical session
    ///
    /// Must be called once per host session before logging. When the
    /// identity differs from the last observed one (including the first
    /// call), all state and storage are erased; repeating the same
    /// identity is a no-op.
    pub async fn start_session(&mut self, id: SessionId) -> Result<(), TablogError> {
        if self.session.as_ref() == Some(&id) {
            return Ok(());
        }

        info!(session = %id, "New session, erasing log");
        self.erase().await?;
        self.session = Some(id);
        Ok(())
    }

    /// Start a session using the host's identity source
    pub async fn start_session_from(
        &mut self,
        source: &dyn SessionSource,
    ) -> Result<(), TablogError> {
        self.start_session(source.current()).await
    }

    /// Open a new empty in-progress row
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidState`] if a row is already open.
    pub fn begin_row(&mut self) -> Result<(), TablogError> {
        if self.current_row.is_some() {
            return Err(LoggerError::InvalidState("row already open").into());
        }

        trace!("Opened row");
        self.current_row = Some(Vec::new());
        Ok(())
    }

    /// Set a field in the in-progress row
    ///
    /// The key is looked up in the schema by exact match. A known key
    /// overwrites its column's value. An unknown key grows the schema: at
    /// the end when `prepend` is false, or at the committed-column boundary
    /// when `prepend` is true, which places a computed field first among
    /// the uncommitted columns without perturbing already-committed order.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidState`] if no row is open.
    pub fn log_field(
        &mut self,
        key: &str,
        value: impl Into<String>,
        prepend: bool,
    ) -> Result<(), TablogError> {
        let row = self
            .current_row
            .as_mut()
            .ok_or(LoggerError::InvalidState("no row open"))?;
        let value = value.into();

        match self.headers.iter().position(|h| h == key) {
            Some(idx) => {
                if row.len() <= idx {
                    row.resize(idx + 1, String::new());
                }
                trace!(key, idx, "Overwrote field");
                row[idx] = value;
            }
            None if !prepend => {
                self.headers.push(key.to_string());
                row.resize(self.headers.len(), String::new());
                let idx = self.headers.len() - 1;
                trace!(key, idx, "Appended column");
                row[idx] = value;
            }
            None => {
                let idx = self.committed_cols;
                self.headers.insert(idx, key.to_string());
                if row.len() < idx {
                    row.resize(idx, String::new());
                }
                trace!(key, idx, "Prepended column at committed boundary");
                row.insert(idx, value);
            }
        }

        Ok(())
    }

    /// Finalize the in-progress row
    ///
    /// An active timestamp mode first injects a `time (<unit>)` field at
    /// the committed-column boundary. A row whose every slot is empty or
    /// unset is silently discarded. Otherwise the row is padded to the full
    /// schema width, an updated header line is committed iff the schema
    /// grew since the last header, and the data line is committed.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidState`] if no row is open.
    pub async fn end_row(&mut self) -> Result<(), TablogError> {
        if self.current_row.is_none() {
            return Err(LoggerError::InvalidState("no row open").into());
        }

        if let Some(unit) = self.config.timestamp_mode.unit() {
            let elapsed = self.clock.running_millis() / unit.divisor;
            self.log_field(&unit.column_name(), elapsed.to_string(), true)?;
        }

        let Some(mut row) = self.current_row.take() else {
            return Err(LoggerError::InvalidState("no row open").into());
        };

        if row.iter().all(|v| v.is_empty()) {
            debug!("Discarding row with no fields set");
            return Ok(());
        }

        row.resize(self.headers.len(), String::new());
        let sep = self.config.separator.to_string();

        if self.headers.len() != self.committed_cols {
            let header_line = self.headers.join(&sep);
            debug!(
                columns = self.headers.len(),
                committed = self.committed_cols,
                "Schema grew, committing header"
            );
            self.commit(&header_line, LineKind::Header).await?;
            // Re-derived rather than taken from the pre-commit width: the
            // header commit itself may have triggered a rollover.
            self.committed_cols = self.headers.len();
        }

        let line = row.join(&sep);
        self.commit(&line, LineKind::Row).await
    }

    /// Write a verbatim plain-text line, bypassing all schema logic
    ///
    /// An empty string is a no-op.
    pub async fn log_plain_text(&mut self, text: &str) -> Result<(), TablogError> {
        if text.is_empty() {
            return Ok(());
        }

        self.commit(text, LineKind::PlainText).await
    }

    /// Erase all in-memory state and stored bytes
    ///
    /// The `full_erase` flag is accepted for API parity with the emulated
    /// hardware but does not alter behavior; a full erase always occurs.
    pub async fn clear(&mut self, _full_erase: bool) -> Result<(), TablogError> {
        debug!("Clearing log");
        self.erase().await?;
        self.mirror.mirror_typed("", LineKind::Clear);
        Ok(())
    }

    /// Set the auto-timestamp mode; takes effect on the next `end_row`
    pub fn set_timestamp_mode(&mut self, mode: TimestampMode) {
        self.config.timestamp_mode = mode;
    }

    /// Toggle raw-line serial mirroring; takes effect on the next commit
    pub fn set_serial_mirroring(&mut self, enabled: bool) {
        self.config.mirror_to_serial = enabled;
    }

    /// Number of rows persisted at or after `from_row_index`
    ///
    /// The header line counts as a row. Negative indices clamp to zero;
    /// absent storage yields zero.
    pub async fn get_row_count(&self, from_row_index: i32) -> Result<usize, TablogError> {
        let from = from_row_index.max(0) as usize;
        let total = self.total_rows().await?;
        Ok(total.saturating_sub(from))
    }

    /// Read up to `n_rows` rows starting at `from_row_index`, joined by `\n`
    ///
    /// Negative start indices clamp to zero. A start index past the end, a
    /// non-positive count, or absent storage yields an empty string. The
    /// count is inclusive of the starting row, matching the hardware log
    /// read API this emulates.
    pub async fn get_rows(&self, from_row_index: i32, n_rows: i32) -> Result<String, TablogError> {
        let from = from_row_index.max(0) as usize;
        if n_rows <= 0 {
            return Ok(String::new());
        }

        let Some(bytes) = self.store.read_all(&self.config.log_name).await? else {
            return Ok(String::new());
        };

        let content = String::from_utf8_lossy(&bytes);
        // Stored content always ends with a terminator, so the final split
        // segment is empty and not a row.
        let rows: Vec<&str> = content.split('\n').collect();
        let total = rows.len().saturating_sub(1);
        if from >= total {
            return Ok(String::new());
        }

        let end = (from + n_rows as usize).min(total);
        Ok(rows[from..end].join("\n"))
    }

    /// Bytes durably appended since the last erase
    pub fn log_size(&self) -> usize {
        self.log_size
    }

    /// Current number of schema columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of leading columns reflected in the last persisted header
    pub fn committed_columns(&self) -> usize {
        self.committed_cols
    }

    /// Whether an in-progress row is open
    pub fn is_row_open(&self) -> bool {
        self.current_row.is_some()
    }

    /// The logger's configuration
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    async fn total_rows(&self) -> Result<usize, TablogError> {
        match self.store.read_all(&self.config.log_name).await? {
            None => Ok(0),
            Some(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                Ok(content.split('\n').count().saturating_sub(1))
            }
        }
    }

    /// Append one line to storage and run the overflow protocol
    ///
    /// Every emission path funnels through here: the line plus terminator
    /// is appended, its encoded byte length added to the running size, and
    /// reaching capacity triggers the log-full notification followed by an
    /// unconditional, destructive rollover.
    async fn commit(&mut self, line: &str, kind: LineKind) -> Result<(), TablogError> {
        let mut data = String::with_capacity(line.len() + 1);
        data.push_str(line);
        data.push('\n');

        self.store
            .append(&self.config.log_name, data.as_bytes())
            .await?;
        self.log_size += data.len();
        trace!(kind = %kind, bytes = data.len(), total = self.log_size, "Committed line");

        if self.log_size >= self.config.capacity {
            warn!(
                size = self.log_size,
                capacity = self.config.capacity,
                "Log storage full, rolling over"
            );
            self.bus.notify(LogEvent::LogFull).await;
            self.erase().await?;
        }

        if self.config.mirror_to_serial {
            self.mirror.mirror_raw(line);
        }
        if kind != LineKind::PlainText {
            self.mirror.mirror_typed(line, kind);
        }

        Ok(())
    }

    async fn erase(&mut self) -> Result<(), TablogError> {
        self.headers.clear();
        self.committed_cols = 0;
        self.current_row = None;
        self.log_size = 0;
        self.store.remove(&self.config.log_name).await?;
        Ok(())
    }
}

impl Default for RowLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`RowLogger`]
///
/// Unset collaborators default to in-memory/no-op implementations and a
/// system clock.
pub struct RowLoggerBuilder {
    config: LoggerConfig,
    store: Option<Arc<dyn ByteStore>>,
    bus: Option<Arc<dyn NotificationBus>>,
    mirror: Option<Arc<dyn MirrorSink>>,
    clock: Option<Arc<dyn Clock>>,
}

impl RowLoggerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            store: None,
            bus: None,
            mirror: None,
            clock: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the byte budget before rollover
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Set the store name the log is persisted under
    pub fn log_name(mut self, name: impl Into<String>) -> Self {
        self.config.log_name = name.into();
        self
    }

    /// Set the auto-timestamp mode
    pub fn timestamp_mode(mut self, mode: TimestampMode) -> Self {
        self.config.timestamp_mode = mode;
        self
    }

    /// Enable or disable raw-line serial mirroring
    pub fn mirror_to_serial(mut self, enabled: bool) -> Self {
        self.config.mirror_to_serial = enabled;
        self
    }

    /// Set the persistence sink
    pub fn store(mut self, store: Arc<dyn ByteStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the host notification bus
    pub fn bus(mut self, bus: Arc<dyn NotificationBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Set the serial/debug mirror sink
    pub fn mirror(mut self, mirror: Arc<dyn MirrorSink>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Set the clock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the logger
    pub fn build(self) -> RowLogger {
        RowLogger {
            config: self.config,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryByteStore::new())),
            bus: self.bus.unwrap_or_else(|| Arc::new(NullBus)),
            mirror: self.mirror.unwrap_or_else(|| Arc::new(NullMirror)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock::new())),
            headers: Vec::new(),
            committed_cols: 0,
            current_row: None,
            log_size: 0,
            session: None,
        }
    }
}

impl Default for RowLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

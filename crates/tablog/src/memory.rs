//! In-memory collaborator implementations
//!
//! This module provides in-memory implementations of the logger's
//! collaborator traits, suitable for testing and simulation environments.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use tablog_core::{ByteStore, LineKind, LogEvent, MirrorSink, NotificationBus, StoreError};

/// In-memory implementation of [`ByteStore`]
///
/// Uses a `DashMap` from store name to byte buffer. Suitable for testing
/// and simulation.
#[derive(Debug, Default)]
pub struct MemoryByteStore {
    buffers: DashMap<String, Vec<u8>>,
}

impl MemoryByteStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of named stores currently held
    pub fn store_count(&self) -> usize {
        self.buffers.len()
    }

    /// Byte length of a named store, or `None` if absent
    pub fn size_of(&self, name: &str) -> Option<usize> {
        self.buffers.get(name).map(|b| b.len())
    }
}

#[async_trait]
impl ByteStore for MemoryByteStore {
    async fn append(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        trace!(name, len = bytes.len(), "Appending bytes");
        self.buffers
            .entry(name.to_string())
            .or_default()
            .extend_from_slice(bytes);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StoreError> {
        if self.buffers.remove(name).is_some() {
            debug!(name, "Removed store");
        }
        Ok(())
    }

    async fn read_all(&self, name: &str) -> Result<Option<Bytes>, StoreError> {
        Ok(self
            .buffers
            .get(name)
            .map(|b| Bytes::copy_from_slice(b.value())))
    }
}

/// Notification bus that swallows every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBus;

#[async_trait]
impl NotificationBus for NullBus {
    async fn notify(&self, event: LogEvent) {
        trace!(event = %event, "Dropping notification");
    }
}

/// Mirror sink that discards both channels
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMirror;

impl MirrorSink for NullMirror {
    fn mirror_raw(&self, _line: &str) {}

    fn mirror_typed(&self, _line: &str, _kind: LineKind) {}
}

/// Notification bus that records delivered events, for assertions
#[derive(Debug, Default)]
pub struct RecordingBus {
    events: Mutex<Vec<LogEvent>>,
}

impl RecordingBus {
    /// Create an empty recording bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events delivered so far
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl NotificationBus for RecordingBus {
    async fn notify(&self, event: LogEvent) {
        self.events.lock().push(event);
    }
}

/// Mirror sink that records both channels, for assertions
#[derive(Debug, Default)]
pub struct RecordingMirror {
    raw: Mutex<Vec<String>>,
    typed: Mutex<Vec<(String, LineKind)>>,
}

impl RecordingMirror {
    /// Create an empty recording mirror
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the raw channel
    pub fn raw(&self) -> Vec<String> {
        self.raw.lock().clone()
    }

    /// Snapshot of the structured channel
    pub fn typed(&self) -> Vec<(String, LineKind)> {
        self.typed.lock().clone()
    }
}

impl MirrorSink for RecordingMirror {
    fn mirror_raw(&self, line: &str) {
        self.raw.lock().push(line.to_string());
    }

    fn mirror_typed(&self, line: &str, kind: LineKind) {
        self.typed.lock().push((line.to_string(), kind));
    }
}

//! End-to-end tests for the row-commit protocol
//!
//! These tests exercise schema evolution across many rows, capacity
//! rollover cycles, and the read-back query API against both the in-memory
//! and file-backed persistence sinks.

use std::sync::Arc;

use tablog::{
    ByteStore, FileByteStore, LineKind, LogEvent, ManualClock, MemoryByteStore, RecordingBus,
    RecordingMirror, RowLogger, SessionId, TimestampMode,
};
use tempfile::TempDir;

// ============================================================================
// Schema Evolution
// ============================================================================

/// A growing key set across rows re-commits the header exactly once per
/// growth event, and earlier rows keep their narrower width.
#[tokio::test]
async fn test_schema_growth_over_many_rows() {
    let store = Arc::new(MemoryByteStore::new());
    let mut logger = RowLogger::builder().store(store.clone()).build();
    logger.start_session(SessionId::from("run-1")).await.unwrap();

    // Widen the schema by one column every 10 rows
    for i in 0..30u32 {
        logger.begin_row().unwrap();
        logger.log_field("step", i.to_string(), false).unwrap();
        if i >= 10 {
            logger.log_field("temp", "20", false).unwrap();
        }
        if i >= 20 {
            logger.log_field("humidity", "55", false).unwrap();
        }
        logger.end_row().await.unwrap();
    }

    // header + 30 data rows + 2 re-committed headers
    assert_eq!(logger.get_row_count(0).await.unwrap(), 33);

    let content = String::from_utf8(
        store
            .read_all("datalog.csv")
            .await
            .unwrap()
            .unwrap()
            .to_vec(),
    )
    .unwrap();
    let rows: Vec<&str> = content.lines().collect();

    assert_eq!(rows[0], "step");
    assert_eq!(rows[1], "0");
    assert_eq!(rows[11], "step,temp"); // first widened header
    assert_eq!(rows[12], "10,20");
    assert_eq!(rows[22], "step,temp,humidity"); // second widened header
    assert_eq!(rows[23], "20,20,55");

    // Exactly three header lines in total
    let headers = rows.iter().filter(|r| r.starts_with("step")).count();
    assert_eq!(headers, 3);
}

/// Prepended timestamp columns stay ahead of columns appended in the same
/// row, but never move ahead of committed ones.
#[tokio::test]
async fn test_timestamp_placement_across_schema_growth() {
    let clock = Arc::new(ManualClock::at(5_000));
    let mut logger = RowLogger::builder()
        .clock(clock.clone())
        .timestamp_mode(TimestampMode::Milliseconds)
        .build();

    logger.begin_row().unwrap();
    logger.log_field("a", "1", false).unwrap();
    logger.end_row().await.unwrap();

    // "time (ms)" was prepended before "a" in the first row, so both are
    // committed now; a column appended later lands after them.
    clock.advance(500);
    logger.begin_row().unwrap();
    logger.log_field("b", "2", false).unwrap();
    logger.end_row().await.unwrap();

    assert_eq!(
        logger.get_rows(0, 10).await.unwrap(),
        "time (ms),a\n5000,1\ntime (ms),a,b\n5500,,2"
    );
}

// ============================================================================
// Rollover Cycles
// ============================================================================

/// Writing far past capacity produces repeated full erases; after each
/// one the logger keeps working with a fresh schema, and the bus hears
/// about every rollover.
#[tokio::test]
async fn test_repeated_rollover_cycles() {
    let store = Arc::new(MemoryByteStore::new());
    let bus = Arc::new(RecordingBus::new());
    let mut logger = RowLogger::builder()
        .store(store.clone())
        .bus(bus.clone())
        .capacity(64)
        .build();

    let mut rollovers_seen = 0;
    let mut last_size = 0;
    for i in 0..100u32 {
        logger.begin_row().unwrap();
        logger.log_field("n", i.to_string(), false).unwrap();
        logger.end_row().await.unwrap();

        if logger.log_size() < last_size {
            rollovers_seen += 1;
        }
        last_size = logger.log_size();
    }

    assert!(rollovers_seen >= 2, "expected several rollovers, saw {rollovers_seen}");
    assert_eq!(bus.events().len(), rollovers_seen);
    assert!(bus.events().iter().all(|e| *e == LogEvent::LogFull));

    // Size accounting stays exact across every cycle
    let stored = store.read_all("datalog.csv").await.unwrap();
    let stored_len = stored.map(|b| b.len()).unwrap_or(0);
    assert_eq!(logger.log_size(), stored_len);
    assert!(logger.log_size() < 64);
}

/// The erase is destructive: nothing from before the rollover is readable.
#[tokio::test]
async fn test_rollover_discards_history() {
    let mut logger = RowLogger::builder().capacity(10).build();

    logger.begin_row().unwrap();
    logger.log_field("x", "1", false).unwrap();
    logger.end_row().await.unwrap(); // "x\n1\n" = 4 bytes

    logger.log_plain_text("0123456").await.unwrap(); // 8 more, crosses 10

    assert_eq!(logger.get_row_count(0).await.unwrap(), 0);
    assert_eq!(logger.get_rows(0, 100).await.unwrap(), "");
    assert_eq!(logger.log_size(), 0);
}

// ============================================================================
// Query API
// ============================================================================

/// Row counts and ranges over a realistic mixed log, including plain-text
/// lines interleaved with data rows.
#[tokio::test]
async fn test_query_sweep_with_mixed_lines() {
    let mut logger = RowLogger::new();

    logger.begin_row().unwrap();
    logger.log_field("reading", "10", false).unwrap();
    logger.end_row().await.unwrap();

    logger.log_plain_text("marker: phase two").await.unwrap();

    logger.begin_row().unwrap();
    logger.log_field("reading", "11", false).unwrap();
    logger.end_row().await.unwrap();

    // header, row, plaintext, row
    assert_eq!(logger.get_row_count(0).await.unwrap(), 4);
    assert_eq!(logger.get_row_count(2).await.unwrap(), 2);
    assert_eq!(logger.get_rows(0, 1).await.unwrap(), "reading");
    assert_eq!(logger.get_rows(2, 1).await.unwrap(), "marker: phase two");
    assert_eq!(logger.get_rows(3, 5).await.unwrap(), "11");
}

// ============================================================================
// File-Backed Store
// ============================================================================

/// Full protocol against the file-backed sink: the log outlives one logger
/// and is readable by a successor in the same session, while a new session
/// starts from scratch.
#[tokio::test]
async fn test_file_store_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileByteStore::new(temp_dir.path()).await.unwrap());

    {
        let mut logger = RowLogger::builder().store(store.clone()).build();
        logger.start_session(SessionId::from("run-1")).await.unwrap();

        logger.begin_row().unwrap();
        logger.log_field("x", "1", false).unwrap();
        logger.end_row().await.unwrap();
    }

    // Successor logger in the same session sees the persisted rows
    let mut logger = RowLogger::builder().store(store.clone()).build();
    assert_eq!(logger.get_row_count(0).await.unwrap(), 2);
    assert_eq!(logger.get_rows(0, 2).await.unwrap(), "x\n1");

    // A new session erases the file
    logger.start_session(SessionId::from("run-2")).await.unwrap();
    assert_eq!(logger.get_row_count(0).await.unwrap(), 0);
    assert!(store.read_all("datalog.csv").await.unwrap().is_none());
}

// ============================================================================
// Mirroring
// ============================================================================

/// The structured channel sees every header/row/clear regardless of the
/// serial flag; the raw channel only flows while mirroring is enabled.
#[tokio::test]
async fn test_mirror_channels_end_to_end() {
    let mirror = Arc::new(RecordingMirror::new());
    let mut logger = RowLogger::builder().mirror(mirror.clone()).build();

    logger.begin_row().unwrap();
    logger.log_field("a", "1", false).unwrap();
    logger.end_row().await.unwrap();

    logger.set_serial_mirroring(true);
    logger.begin_row().unwrap();
    logger.log_field("a", "2", false).unwrap();
    logger.end_row().await.unwrap();

    logger.log_plain_text("aside").await.unwrap();
    logger.clear(false).await.unwrap();

    assert_eq!(mirror.raw(), vec!["2".to_string(), "aside".to_string()]);
    assert_eq!(
        mirror.typed(),
        vec![
            ("a".to_string(), LineKind::Header),
            ("1".to_string(), LineKind::Row),
            ("2".to_string(), LineKind::Row),
            ("".to_string(), LineKind::Clear),
        ]
    );
}

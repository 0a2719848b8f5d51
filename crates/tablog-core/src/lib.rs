//! # Tablog Core
//!
//! Core traits, types, and errors for the tablog data logger.
//!
//! This crate provides the foundational abstractions that let the same
//! row-logging logic run against both in-memory collaborators (for testing
//! and simulation) and real file-backed persistence.
//!
//! ## Key Traits
//!
//! - [`ByteStore`]: Abstraction over the append-only persistence sink
//! - [`NotificationBus`]: Fire-and-forget host event sink
//! - [`MirrorSink`]: Serial/debug side channels for mirrored lines
//! - [`SessionSource`]: Source of the current logical session identity
//! - [`Clock`]: Time abstraction for testability
//!
//! ## Key Types
//!
//! - [`LineKind`]: Classification of lines on the structured mirror channel
//! - [`TimestampMode`]: Optional auto-timestamp column with its unit table
//! - [`SessionId`]: Opaque per-session token driving reset-on-new-session

pub mod error;
pub mod line;
pub mod session;
pub mod time;
pub mod traits;

// Re-export main types
pub use error::*;
pub use line::*;
pub use session::*;
pub use time::*;
pub use traits::*;

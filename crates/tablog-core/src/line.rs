//! Line classification for the structured mirror channel

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a logical line, as reported on the structured mirror channel
///
/// `Header`, `Row`, and `PlainText` lines are written to the persistence
/// sink. `Clear` never reaches storage; it only announces a full erase on
/// the structured channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    /// Schema header line (column names joined by the separator)
    Header,
    /// Data row line (field values joined by the separator)
    Row,
    /// Verbatim plain-text line, bypassing all schema logic
    PlainText,
    /// Full erase of the log storage
    Clear,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LineKind::Header => "header",
            LineKind::Row => "row",
            LineKind::PlainText => "plaintext",
            LineKind::Clear => "clear",
        };
        write!(f, "{}", s)
    }
}

//! Session identity
//!
//! A session is one logical run of the host (e.g. one simulation run). The
//! logger erases its storage exactly once per new session, which reconciles
//! "fresh run" semantics with a persistent store that outlives runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque per-session token
///
/// Compared only for equality; the logger attaches no meaning to the
/// contents beyond "same session or not".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session id from any string-like token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for SessionId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of the current logical session identity
///
/// Implemented by the host; the logger only consumes it through
/// an explicit session-start call.
pub trait SessionSource: Send + Sync {
    /// Get the identity of the currently running session
    fn current(&self) -> SessionId;
}

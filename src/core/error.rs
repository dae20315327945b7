// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A command was rejected because it would break the session's invariants.
    ///
    /// Examples:
    /// - creating an activity whose id is already taken
    InvalidCommand(CommandError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    DuplicateId(String),
}

/// Failures reported by an `ActivityStore`.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Codec(serde_json::Error),
}

// ---------------- Display ----------------

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCommand(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::DuplicateId(id) => write!(f, "activity id already exists: {id}"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store io error: {e}"),
            StoreError::Codec(e) => write!(f, "store decode error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Codec(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err)
    }
}

//! Error types for the bgeo writer.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bgeo serialization.
#[derive(Error, Debug)]
pub enum Error {
    /// A length or count below zero was handed to the length encoder
    #[error("Cannot encode negative length: {0}")]
    NegativeLength(i64),

    /// A value does not fit the element type of a fixed-width array
    #[error("Value {value} does not fit into {storage}")]
    ValueOutOfRange { value: i64, storage: &'static str },

    /// A block was closed with the wrong delimiter or without being opened
    #[error("Unbalanced block: expected {expected}, found {found}")]
    UnbalancedBlock { expected: &'static str, found: &'static str },

    /// The buffer was finished while blocks were still open
    #[error("{0} block(s) still open when finishing the stream")]
    UnclosedBlocks(usize),

    /// Attribute or primitive data is inconsistent
    #[error("Invalid attribute '{name}': {reason}")]
    InvalidAttribute { name: String, reason: String },

    /// Embedded geometry payload is not a serialized bgeo unit
    #[error("Invalid embedded geometry '{0}': missing bgeo magic header")]
    InvalidEmbeddedPayload(String),

    /// Skeleton bone refers to a parent that does not exist
    #[error("Unknown parent bone '{parent}' for bone '{bone}'")]
    UnknownParentBone { bone: String, parent: String },

    /// The compressed `.bgeo.sc` container was requested
    #[error("Compressed container output is not available: {0}")]
    CompressionUnavailable(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid attribute error.
    pub fn invalid_attribute(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute { name: name.into(), reason: reason.into() }
    }
}

/// Result type alias for bgeo operations.
pub type Result<T> = std::result::Result<T, Error>;

use std::num::ParseIntError;
use thiserror::Error;

/// Errors produced while scanning and parsing an elementary stream.
#[derive(Error, Debug)]
pub enum DemuxError {
    /// Failure reported by the underlying byte source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Bitstream exhausted or a malformed variable-length code.
    #[error("parser error: {0}")]
    Parser(String),

    /// Data that cannot be interpreted well enough to route control flow.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A resumed element found its parameter set missing from the store.
    #[error("{element}: parameter set {id} is still missing on reparse")]
    MissingParameterSet {
        /// Name of the element being resumed.
        element: String,
        /// Parameter set id the element refers to.
        id: u32,
    },

    /// The deferred parsing protocol was driven out of order.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Numeric value in a configuration file failed to parse.
    #[error("parse int error: {0}")]
    ParseInt(#[from] ParseIntError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DemuxError>;

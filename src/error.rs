//! # Error Types
//!
//! Every encoder in this crate reports failures through [`EncodeError`].
//! Encoding either produces a complete symbol or returns one of these
//! variants; partial symbols are never handed out.

use thiserror::Error;

/// Main error type for symbol encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The message does not fit the requested (or the largest) symbol
    #[error("Too much data: {0}")]
    CapacityExceeded(String),

    /// A character can not be represented by the requested compaction mode
    #[error("Invalid character: {0}")]
    InvalidCharacter(String),

    /// Invalid size, mode or version combination
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Reed-Solomon engine built with unusable field parameters
    #[error("Invalid Galois field: {0}")]
    InvalidField(String),

    /// Malformed GS1 application identifier input
    #[error("Invalid GS1 data: {0}")]
    InvalidGs1(String),
}

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, EncodeError>;

//! Error types for the application-layer codec
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::codec::LengthError;
use crate::command::{Cid, Direction};

/// Result type alias using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;

/// Unified error type for codec operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    /// Payload bytes do not match the length the resolved shape requires
    #[error("{protocol}: {source}")]
    Length {
        protocol: &'static str,
        source: LengthError,
    },

    /// No payload shape is registered for this CID in this direction
    #[error("{protocol}: unknown {direction} command {cid}")]
    UnknownCommand {
        protocol: &'static str,
        direction: Direction,
        cid: Cid,
    },

    // -------------------------------------------------------------------------
    // Encode Errors
    // -------------------------------------------------------------------------
    /// Command value cannot be encoded as constructed
    #[error("{protocol}: malformed command {cid}: {reason}")]
    MalformedCommand {
        protocol: &'static str,
        cid: Cid,
        reason: &'static str,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CodecError {
    /// Attach the protocol name to a payload-level length error
    pub(crate) fn length(protocol: &'static str, source: LengthError) -> Self {
        CodecError::Length { protocol, source }
    }

    /// Number of bytes the failing payload required, for length errors
    pub fn expected_len(&self) -> Option<usize> {
        match self {
            CodecError::Length { source, .. } => Some(source.expected()),
            _ => None,
        }
    }
}

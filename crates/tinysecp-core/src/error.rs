//! Validation errors

use thiserror::Error;

/// Why an argument was refused.
///
/// Each variant names the kind of argument that failed, never a generic
/// failure. Degenerate arithmetic outcomes (infinity, zero scalar) are not
/// errors and are reported as `Ok(None)` by the operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Expected Private")]
    InvalidPrivateKey,
    #[error("Expected Point")]
    InvalidPoint,
    #[error("Expected Tweak")]
    InvalidTweak,
    #[error("Expected Hash")]
    InvalidHash,
    #[error("Expected Signature")]
    InvalidSignature,
    #[error("Expected Extra Data (32 bytes)")]
    InvalidExtraData,
    #[error("Expected Parity (1 | 0)")]
    InvalidParity,
    #[error("Bad Recovery Id")]
    InvalidRecoveryId,
    #[error("Expected {expected} arguments, got {got}")]
    InvalidArity { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, ValidationError>;

//! tinysecp Core
//!
//! Validation and dispatch layer between caller-supplied byte buffers and
//! secp256k1 arithmetic. Every public operation classifies its inputs,
//! enforces the curve-domain rules, calls into a [`CurveEngine`] and encodes
//! the result canonically.

mod bench;
pub mod classify;
pub mod codec;
mod error;
mod invoke;
mod ops;
mod stats;
pub mod validate;

pub use bench::{BenchConfig, BenchError, BenchOperation, BenchReport, Benchmark};
pub use codec::{Encoding, PointBytes, RecoverableSignature, XOnlyPoint};
pub use error::{Result, ValidationError};
pub use invoke::{CallOptions, Operation, Output, UnknownOperation};
pub use ops::{PointOptions, Secp256k1, VerifyOptions};
pub use stats::OpStats;

// Re-exports for convenience
pub use tinysecp_crypto::{hash::sha256, random_private_key, CurveEngine, K256Engine};

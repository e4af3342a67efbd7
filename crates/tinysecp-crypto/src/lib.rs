//! tinysecp Crypto Primitives
//!
//! The curve engine consumed by the validation layer, and the hash helpers
//! used to produce message digests.

pub mod engine;
pub mod hash;
pub mod secp256k1;

pub use self::engine::CurveEngine;
pub use self::secp256k1::{random_private_key, K256Engine};

// Engine types are k256's; re-exported so callers can name them
pub use k256;

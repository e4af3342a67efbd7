//! Curve engine capability set.
//!
//! The validation layer never does curve math itself. Everything it needs from
//! the group (parsing, serialization, tweaks, ECDSA and BIP340 primitives) is
//! reached through this trait, so the contract layer can be driven by any
//! backend that honours these semantics.

/// Scalar bytes, big-endian.
pub type ScalarBytes = [u8; 32];

/// Arithmetic backend for secp256k1.
///
/// Implementations hold no mutable state: one instance is built at startup and
/// shared read-only across threads. Every method returning `Option` uses
/// `None` for "the engine could not produce a result", which covers both
/// malformed input and degenerate outcomes such as the point at infinity.
pub trait CurveEngine: Send + Sync {
    /// A decoded, on-curve, non-identity point.
    type Point: Clone;
    /// A parsed ECDSA signature.
    type Signature: Clone;

    /// Decode a SEC1 encoded point (33 or 65 bytes).
    fn parse_point(&self, bytes: &[u8]) -> Option<Self::Point>;

    /// SEC1 encoding of a point, 33 bytes if `compressed` else 65.
    fn serialize_point(&self, point: &Self::Point, compressed: bool) -> Vec<u8>;

    /// `scalar * G`.
    fn point_from_scalar(&self, scalar: &ScalarBytes) -> Option<Self::Point>;

    /// `a + b`; `None` at infinity.
    fn combine_points(&self, a: &Self::Point, b: &Self::Point) -> Option<Self::Point>;

    /// `point + tweak * G`; `None` at infinity.
    fn tweak_add_point(&self, point: &Self::Point, tweak: &ScalarBytes) -> Option<Self::Point>;

    /// `point * tweak`; `None` for a zero tweak or an out-of-range one.
    fn tweak_mul_point(&self, point: &Self::Point, tweak: &ScalarBytes) -> Option<Self::Point>;

    /// `scalar + tweak (mod n)`; `None` when the sum is zero.
    fn tweak_add_scalar(&self, scalar: &ScalarBytes, tweak: &ScalarBytes) -> Option<ScalarBytes>;

    /// `n - scalar`. The input must be below the group order.
    fn negate_scalar(&self, scalar: &ScalarBytes) -> ScalarBytes;

    /// `0 < scalar < n`.
    fn is_valid_private_key(&self, scalar: &ScalarBytes) -> bool;

    /// ECDSA with an RFC 6979 nonce, `entropy` mixed in as additional data.
    /// The result is always low-S.
    fn sign(
        &self,
        hash: &[u8; 32],
        scalar: &ScalarBytes,
        entropy: Option<&[u8; 32]>,
    ) -> Option<Self::Signature>;

    /// ECDSA verification. High-S signatures never verify.
    fn verify(&self, signature: &Self::Signature, hash: &[u8; 32], point: &Self::Point) -> bool;

    /// Low-S form of `signature`.
    fn normalize_signature(&self, signature: &Self::Signature) -> Self::Signature;

    /// Parse a 64 byte `r || s`; `None` if either half is zero or overflows.
    fn parse_signature_compact(&self, bytes: &[u8]) -> Option<Self::Signature>;

    fn serialize_signature_compact(&self, signature: &Self::Signature) -> [u8; 64];

    /// Same as [`CurveEngine::sign`] and also returns the recovery id.
    fn sign_recoverable(
        &self,
        hash: &[u8; 32],
        scalar: &ScalarBytes,
        entropy: Option<&[u8; 32]>,
    ) -> Option<(Self::Signature, u8)>;

    /// Recover the signing point from a signature and recovery id.
    fn recover(
        &self,
        signature: &Self::Signature,
        recovery_id: u8,
        hash: &[u8; 32],
    ) -> Option<Self::Point>;

    /// X coordinate and y parity (0 even, 1 odd).
    fn x_only(&self, point: &Self::Point) -> ([u8; 32], u8);

    /// BIP340 Schnorr signature over a 32 byte message.
    fn sign_schnorr(
        &self,
        hash: &[u8; 32],
        scalar: &ScalarBytes,
        aux_rand: &[u8; 32],
    ) -> Option<[u8; 64]>;

    /// BIP340 verification against an x-only key.
    fn verify_schnorr(&self, hash: &[u8; 32], x_only: &[u8; 32], signature: &[u8; 64]) -> bool;
}

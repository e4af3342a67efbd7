//! Curve-domain validation
//!
//! Predicates answer "is this buffer a valid X" with a bool; the `require_*`
//! functions return the typed, decoded value or the [`ValidationError`] that
//! names the failing argument. Decoded points and signatures are handed back
//! so the calling operation never parses the same buffer twice.

use tinysecp_crypto::CurveEngine;

use crate::classify::{
    as_uint256, is_below_order, is_point_shape, split_compact, EXTRA_DATA_SIZE, P_MINUS_N,
    SIGNATURE_SIZE, X_ONLY_PUBLIC_KEY_SIZE,
};
use crate::error::{Result, ValidationError};

/// 32 bytes and `0 < value < n`, as judged by the engine.
pub fn is_private_key<E: CurveEngine>(engine: &E, buf: &[u8]) -> bool {
    as_uint256(buf).map_or(false, |scalar| engine.is_valid_private_key(scalar))
}

/// 32 bytes and `value < n`. Zero is allowed.
pub fn is_order_scalar(buf: &[u8]) -> bool {
    as_uint256(buf).map_or(false, is_below_order)
}

/// Decode a 33 or 65 byte point, `None` if the engine rejects it.
pub fn decode_point<E: CurveEngine>(engine: &E, buf: &[u8]) -> Option<E::Point> {
    if !is_point_shape(buf) {
        return None;
    }
    engine.parse_point(buf)
}

pub fn is_point<E: CurveEngine>(engine: &E, buf: &[u8]) -> bool {
    decode_point(engine, buf).is_some()
}

/// Decode a 32 byte x-only point by lifting it to the even-y point.
pub fn decode_x_only_point<E: CurveEngine>(engine: &E, buf: &[u8]) -> Option<E::Point> {
    if buf.len() != X_ONLY_PUBLIC_KEY_SIZE {
        return None;
    }
    let mut compressed = [0u8; 33];
    compressed[0] = 0x02;
    compressed[1..].copy_from_slice(buf);
    engine.parse_point(&compressed)
}

pub fn is_x_only_point<E: CurveEngine>(engine: &E, buf: &[u8]) -> bool {
    decode_x_only_point(engine, buf).is_some()
}

/// Decode a 64 byte compact signature; both halves nonzero and below n.
pub fn decode_signature<E: CurveEngine>(engine: &E, buf: &[u8]) -> Option<E::Signature> {
    if buf.len() != SIGNATURE_SIZE {
        return None;
    }
    engine.parse_signature_compact(buf)
}

pub fn is_signature<E: CurveEngine>(engine: &E, buf: &[u8]) -> bool {
    decode_signature(engine, buf).is_some()
}

pub fn require_private<'a, E: CurveEngine>(engine: &E, buf: &'a [u8]) -> Result<&'a [u8; 32]> {
    match as_uint256(buf) {
        Some(scalar) if engine.is_valid_private_key(scalar) => Ok(scalar),
        _ => Err(ValidationError::InvalidPrivateKey),
    }
}

pub fn require_tweak(buf: &[u8]) -> Result<&[u8; 32]> {
    match as_uint256(buf) {
        Some(tweak) if is_below_order(tweak) => Ok(tweak),
        _ => Err(ValidationError::InvalidTweak),
    }
}

pub fn require_hash(buf: &[u8]) -> Result<&[u8; 32]> {
    as_uint256(buf).ok_or(ValidationError::InvalidHash)
}

/// Absent, or exactly 32 bytes.
pub fn require_extra_data(buf: Option<&[u8]>) -> Result<Option<&[u8; 32]>> {
    match buf {
        None => Ok(None),
        Some(data) if data.len() == EXTRA_DATA_SIZE => Ok(as_uint256(data)),
        Some(_) => Err(ValidationError::InvalidExtraData),
    }
}

pub fn require_point<E: CurveEngine>(engine: &E, buf: &[u8]) -> Result<E::Point> {
    decode_point(engine, buf).ok_or(ValidationError::InvalidPoint)
}

pub fn require_x_only_point<E: CurveEngine>(engine: &E, buf: &[u8]) -> Result<E::Point> {
    decode_x_only_point(engine, buf).ok_or(ValidationError::InvalidPoint)
}

pub fn require_signature<E: CurveEngine>(engine: &E, buf: &[u8]) -> Result<E::Signature> {
    decode_signature(engine, buf).ok_or(ValidationError::InvalidSignature)
}

/// Shape-only check for BIP340 signatures; their content is judged at verify time.
pub fn require_schnorr_signature(buf: &[u8]) -> Result<&[u8; 64]> {
    buf.try_into().map_err(|_| ValidationError::InvalidSignature)
}

pub fn require_parity(parity: u8) -> Result<u8> {
    match parity {
        0 | 1 => Ok(parity),
        _ => Err(ValidationError::InvalidParity),
    }
}

/// Recovery ids are 0..=3. Bit 1 means `r` overflowed n when the nonce point
/// was reduced, which is only possible while `r < p - n`.
pub fn require_recovery_id(recovery_id: u8, signature: &[u8; 64]) -> Result<u8> {
    if recovery_id > 3 {
        return Err(ValidationError::InvalidRecoveryId);
    }
    let (r, _) = split_compact(signature);
    if recovery_id & 2 != 0 && r >= P_MINUS_N {
        return Err(ValidationError::InvalidRecoveryId);
    }
    Ok(recovery_id)
}

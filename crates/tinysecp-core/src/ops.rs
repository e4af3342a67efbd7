//! Operation dispatcher
//!
//! Each operation checks its arguments left to right, so the first invalid
//! argument decides the reported error. Outcomes the arithmetic cannot encode
//! (point at infinity, scalar congruent to zero) come back as `Ok(None)`.

use serde::{Deserialize, Serialize};
use tinysecp_crypto::{CurveEngine, K256Engine};
use tracing::{debug, warn};

use crate::classify::{is_compressed_point_shape, is_zero, ZERO32};
use crate::codec::{
    encode_point, encode_signature, encode_x_only, Encoding, PointBytes, RecoverableSignature,
    XOnlyPoint,
};
use crate::error::{Result, ValidationError};
use crate::validate::{
    decode_point, decode_x_only_point, is_private_key, require_extra_data, require_hash,
    require_parity, require_point, require_private, require_recovery_id,
    require_schnorr_signature, require_signature, require_tweak, require_x_only_point,
};

/// Output encoding for operations that return a point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOptions {
    /// `None` follows the first point argument, or compressed if there is none
    pub compressed: Option<bool>,
}

impl PointOptions {
    pub fn compressed() -> Self {
        Self { compressed: Some(true) }
    }

    pub fn uncompressed() -> Self {
        Self { compressed: Some(false) }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOptions {
    /// Require the signature to already be low-S
    pub strict: bool,
}

impl VerifyOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Validated secp256k1 operations over a shared, immutable engine.
///
/// The handle is built once and may be shared by reference across threads;
/// no operation mutates it.
#[derive(Debug, Clone, Default)]
pub struct Secp256k1<E: CurveEngine = K256Engine> {
    engine: E,
}

fn no_result<T>(operation: &'static str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        debug!(op = operation, "no result");
    }
    value
}

impl<E: CurveEngine> Secp256k1<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn encode(&self, point: Option<E::Point>, encoding: Encoding) -> Result<Option<PointBytes>> {
        point
            .map(|point| encode_point(&self.engine, &point, encoding))
            .transpose()
    }

    pub fn is_point(&self, p: &[u8]) -> bool {
        decode_point(&self.engine, p).is_some()
    }

    /// Whether a valid point is in its 33 byte form. Invalid points are an error.
    pub fn is_point_compressed(&self, p: &[u8]) -> Result<bool> {
        require_point(&self.engine, p)?;
        Ok(is_compressed_point_shape(p))
    }

    pub fn is_private(&self, d: &[u8]) -> bool {
        is_private_key(&self.engine, d)
    }

    pub fn point_from_scalar(&self, d: &[u8], options: PointOptions) -> Result<Option<PointBytes>> {
        let d = require_private(&self.engine, d)?;
        let encoding = Encoding::infer(options.compressed, None);
        let point = no_result("pointFromScalar", self.engine.point_from_scalar(d));
        self.encode(point, encoding)
    }

    pub fn point_compress(&self, p: &[u8], options: PointOptions) -> Result<PointBytes> {
        let point = require_point(&self.engine, p)?;
        encode_point(&self.engine, &point, Encoding::infer(options.compressed, Some(p)))
    }

    pub fn point_add(
        &self,
        p_a: &[u8],
        p_b: &[u8],
        options: PointOptions,
    ) -> Result<Option<PointBytes>> {
        let a = require_point(&self.engine, p_a)?;
        let b = require_point(&self.engine, p_b)?;
        let encoding = Encoding::infer(options.compressed, Some(p_a));
        let sum = no_result("pointAdd", self.engine.combine_points(&a, &b));
        self.encode(sum, encoding)
    }

    /// `p + tweak * G`
    pub fn point_add_scalar(
        &self,
        p: &[u8],
        tweak: &[u8],
        options: PointOptions,
    ) -> Result<Option<PointBytes>> {
        let point = require_point(&self.engine, p)?;
        let tweak = require_tweak(tweak)?;
        let encoding = Encoding::infer(options.compressed, Some(p));
        let tweaked = no_result("pointAddScalar", self.engine.tweak_add_point(&point, tweak));
        self.encode(tweaked, encoding)
    }

    /// `p * tweak`. A zero tweak is accepted and yields no result.
    pub fn point_multiply(
        &self,
        p: &[u8],
        tweak: &[u8],
        options: PointOptions,
    ) -> Result<Option<PointBytes>> {
        let point = require_point(&self.engine, p)?;
        let tweak = require_tweak(tweak)?;
        let encoding = Encoding::infer(options.compressed, Some(p));
        let product = no_result("pointMultiply", self.engine.tweak_mul_point(&point, tweak));
        self.encode(product, encoding)
    }

    /// `d + tweak (mod n)`
    pub fn private_add(&self, d: &[u8], tweak: &[u8]) -> Result<Option<[u8; 32]>> {
        let d = require_private(&self.engine, d)?;
        let tweak = require_tweak(tweak)?;
        Ok(no_result("privateAdd", self.engine.tweak_add_scalar(d, tweak)))
    }

    /// `d - tweak (mod n)`
    pub fn private_sub(&self, d: &[u8], tweak: &[u8]) -> Result<Option<[u8; 32]>> {
        let d = require_private(&self.engine, d)?;
        let tweak = require_tweak(tweak)?;
        // zero has no negation as a key, and d - 0 is d
        if is_zero(tweak) {
            return Ok(Some(*d));
        }
        let negated = self.engine.negate_scalar(tweak);
        Ok(no_result("privateSub", self.engine.tweak_add_scalar(d, &negated)))
    }

    /// `n - d`
    pub fn private_negate(&self, d: &[u8]) -> Result<[u8; 32]> {
        let d = require_private(&self.engine, d)?;
        Ok(self.engine.negate_scalar(d))
    }

    /// Deterministic RFC 6979 ECDSA. The signature is always low-S.
    pub fn sign(&self, h: &[u8], d: &[u8]) -> Result<[u8; 64]> {
        self.sign_with_entropy(h, d, None)
    }

    /// RFC 6979 ECDSA with `e` mixed into the nonce derivation as additional data.
    pub fn sign_with_entropy(&self, h: &[u8], d: &[u8], e: Option<&[u8]>) -> Result<[u8; 64]> {
        let hash = require_hash(h)?;
        let d = require_private(&self.engine, d)?;
        let entropy = require_extra_data(e)?;
        match self.engine.sign(hash, d, entropy) {
            Some(signature) => Ok(encode_signature(&self.engine, &signature)),
            None => {
                warn!("engine failed to sign a validated hash");
                Err(ValidationError::InvalidSignature)
            }
        }
    }

    /// ECDSA verification. Without `strict`, a high-S signature is normalized
    /// before checking.
    pub fn verify(
        &self,
        h: &[u8],
        q: &[u8],
        signature: &[u8],
        options: VerifyOptions,
    ) -> Result<bool> {
        let hash = require_hash(h)?;
        let point = require_point(&self.engine, q)?;
        let signature = require_signature(&self.engine, signature)?;
        let signature = if options.strict {
            signature
        } else {
            self.engine.normalize_signature(&signature)
        };
        Ok(self.engine.verify(&signature, hash, &point))
    }

    pub fn is_x_only_point(&self, p: &[u8]) -> bool {
        decode_x_only_point(&self.engine, p).is_some()
    }

    pub fn x_only_point_from_scalar(&self, d: &[u8]) -> Result<XOnlyPoint> {
        let d = require_private(&self.engine, d)?;
        match self.engine.point_from_scalar(d) {
            Some(point) => Ok(encode_x_only(&self.engine, &point)),
            None => Err(ValidationError::InvalidPrivateKey),
        }
    }

    pub fn x_only_point_from_point(&self, p: &[u8]) -> Result<XOnlyPoint> {
        let point = require_point(&self.engine, p)?;
        Ok(encode_x_only(&self.engine, &point))
    }

    /// Lift `p` to its even-y point and add `tweak * G`.
    pub fn x_only_point_add_tweak(&self, p: &[u8], tweak: &[u8]) -> Result<Option<XOnlyPoint>> {
        let point = require_x_only_point(&self.engine, p)?;
        let tweak = require_tweak(tweak)?;
        let tweaked = no_result("xOnlyPointAddTweak", self.engine.tweak_add_point(&point, tweak));
        Ok(tweaked.map(|point| encode_x_only(&self.engine, &point)))
    }

    /// Whether `tweaked` is the x coordinate of `p + tweak * G`, and when a
    /// parity is given, whether its y parity matches too.
    pub fn x_only_point_add_tweak_check(
        &self,
        p: &[u8],
        tweaked: &[u8],
        tweak: &[u8],
        parity: Option<u8>,
    ) -> Result<bool> {
        let point = require_x_only_point(&self.engine, p)?;
        require_x_only_point(&self.engine, tweaked)?;
        let parity = parity.map(require_parity).transpose()?;
        let tweak = require_tweak(tweak)?;

        let Some(result) = self.engine.tweak_add_point(&point, tweak) else {
            debug!(op = "xOnlyPointAddTweakCheck", "no result");
            return Ok(false);
        };
        let XOnlyPoint { x, parity: actual } = encode_x_only(&self.engine, &result);
        Ok(x[..] == tweaked[..] && parity.map_or(true, |expected| expected == actual))
    }

    /// BIP340 signature. Absent `aux` means 32 zero bytes.
    pub fn sign_schnorr(&self, h: &[u8], d: &[u8], aux: Option<&[u8]>) -> Result<[u8; 64]> {
        let hash = require_hash(h)?;
        let d = require_private(&self.engine, d)?;
        let aux = require_extra_data(aux)?.unwrap_or(&ZERO32);
        self.engine.sign_schnorr(hash, d, aux).ok_or_else(|| {
            warn!("engine failed to produce a BIP340 signature");
            ValidationError::InvalidSignature
        })
    }

    pub fn verify_schnorr(&self, h: &[u8], q: &[u8], signature: &[u8]) -> Result<bool> {
        let hash = require_hash(h)?;
        let point = require_x_only_point(&self.engine, q)?;
        let signature = require_schnorr_signature(signature)?;
        let (x, _) = self.engine.x_only(&point);
        Ok(self.engine.verify_schnorr(hash, &x, signature))
    }

    /// Low-S ECDSA signature plus the id that recovers the signer's point.
    pub fn sign_recoverable(
        &self,
        h: &[u8],
        d: &[u8],
        e: Option<&[u8]>,
    ) -> Result<RecoverableSignature> {
        let hash = require_hash(h)?;
        let d = require_private(&self.engine, d)?;
        let entropy = require_extra_data(e)?;
        match self.engine.sign_recoverable(hash, d, entropy) {
            Some((signature, recovery_id)) => Ok(RecoverableSignature {
                signature: encode_signature(&self.engine, &signature),
                recovery_id,
            }),
            None => {
                warn!("engine failed to sign a validated hash");
                Err(ValidationError::InvalidSignature)
            }
        }
    }

    /// Public point that produced `signature` over `h`. Compressed unless asked otherwise.
    pub fn recover(
        &self,
        h: &[u8],
        signature: &[u8],
        recovery_id: u8,
        options: PointOptions,
    ) -> Result<Option<PointBytes>> {
        let hash = require_hash(h)?;
        let signature = require_signature(&self.engine, signature)?;
        let compact = encode_signature(&self.engine, &signature);
        let recovery_id = require_recovery_id(recovery_id, &compact)?;
        let encoding = Encoding::infer(options.compressed, None);
        let point = no_result("recover", self.engine.recover(&signature, recovery_id, hash));
        self.encode(point, encoding)
    }
}

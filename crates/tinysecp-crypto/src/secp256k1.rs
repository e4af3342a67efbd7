//! secp256k1 curve engine backed by `k256`

use k256::{
    ecdsa::{
        hazmat::sign_prehashed, signature::hazmat::PrehashVerifier, RecoveryId, Signature,
        VerifyingKey,
    },
    elliptic_curve::{
        bigint::ArrayEncoding, ops::Reduce, rand_core::OsRng, sec1::ToEncodedPoint, Curve,
        PrimeField,
    },
    schnorr, FieldBytes, ProjectivePoint, PublicKey, Scalar, SecretKey, Secp256k1, U256,
};
use sha2::Sha256;

use crate::engine::{CurveEngine, ScalarBytes};

/// Stateless engine over the RustCrypto `k256` arithmetic.
///
/// `k256` needs no precomputed context, so the handle is a unit value and is
/// trivially shareable between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct K256Engine;

impl K256Engine {
    pub const fn new() -> Self {
        Self
    }
}

/// Generate a fresh random private key
pub fn random_private_key() -> ScalarBytes {
    SecretKey::random(&mut OsRng).to_bytes().into()
}

fn to_scalar(bytes: &ScalarBytes) -> Option<Scalar> {
    Option::from(Scalar::from_repr(FieldBytes::from(*bytes)))
}

fn from_projective(point: ProjectivePoint) -> Option<PublicKey> {
    PublicKey::from_affine(point.to_affine()).ok()
}

/// Deterministic RFC 6979 nonce for `hash` under `scalar`.
///
/// The DRBG is seeded with the hash bytes as given, not reduced mod n, so a
/// hash at or above the order yields the same nonce libsecp256k1 derives.
/// Caller entropy is appended to the seed as additional data.
fn nonce(scalar: &ScalarBytes, hash: &[u8; 32], entropy: Option<&[u8; 32]>) -> Option<Scalar> {
    let order = FieldBytes::from(Secp256k1::ORDER.to_be_byte_array());
    let k = rfc6979::generate_k::<Sha256, _>(
        &FieldBytes::from(*scalar),
        &order,
        &FieldBytes::from(*hash),
        entropy.map_or(&[][..], |extra| &extra[..]),
    );
    Option::from(Scalar::from_repr(k))
}

impl CurveEngine for K256Engine {
    type Point = PublicKey;
    type Signature = Signature;

    fn parse_point(&self, bytes: &[u8]) -> Option<PublicKey> {
        // k256 also takes compact (0x05) and identity encodings; secp256k1 keys do not
        match (bytes.len(), bytes.first()) {
            (33, Some(0x02 | 0x03)) | (65, Some(0x04)) => {}
            _ => return None,
        }
        PublicKey::from_sec1_bytes(bytes).ok()
    }

    fn serialize_point(&self, point: &PublicKey, compressed: bool) -> Vec<u8> {
        point.to_encoded_point(compressed).as_bytes().to_vec()
    }

    fn point_from_scalar(&self, scalar: &ScalarBytes) -> Option<PublicKey> {
        let secret_key = SecretKey::from_bytes(scalar.into()).ok()?;
        Some(secret_key.public_key())
    }

    fn combine_points(&self, a: &PublicKey, b: &PublicKey) -> Option<PublicKey> {
        from_projective(a.to_projective() + b.to_projective())
    }

    fn tweak_add_point(&self, point: &PublicKey, tweak: &ScalarBytes) -> Option<PublicKey> {
        let tweak = to_scalar(tweak)?;
        from_projective(point.to_projective() + ProjectivePoint::GENERATOR * tweak)
    }

    fn tweak_mul_point(&self, point: &PublicKey, tweak: &ScalarBytes) -> Option<PublicKey> {
        let tweak = to_scalar(tweak)?;
        if bool::from(tweak.is_zero()) {
            return None;
        }
        from_projective(point.to_projective() * tweak)
    }

    fn tweak_add_scalar(&self, scalar: &ScalarBytes, tweak: &ScalarBytes) -> Option<ScalarBytes> {
        let sum = to_scalar(scalar)? + to_scalar(tweak)?;
        if bool::from(sum.is_zero()) {
            None
        } else {
            Some(sum.to_bytes().into())
        }
    }

    fn negate_scalar(&self, scalar: &ScalarBytes) -> ScalarBytes {
        let value = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*scalar));
        (-value).to_bytes().into()
    }

    fn is_valid_private_key(&self, scalar: &ScalarBytes) -> bool {
        SecretKey::from_bytes(scalar.into()).is_ok()
    }

    fn sign(
        &self,
        hash: &[u8; 32],
        scalar: &ScalarBytes,
        entropy: Option<&[u8; 32]>,
    ) -> Option<Signature> {
        self.sign_recoverable(hash, scalar, entropy).map(|(signature, _)| signature)
    }

    fn verify(&self, signature: &Signature, hash: &[u8; 32], point: &PublicKey) -> bool {
        // High-S is malleable; only the normalized form is accepted here
        if signature.normalize_s().is_some() {
            return false;
        }
        match VerifyingKey::from_affine(*point.as_affine()) {
            Ok(verifying_key) => verifying_key.verify_prehash(hash, signature).is_ok(),
            Err(_) => false,
        }
    }

    fn normalize_signature(&self, signature: &Signature) -> Signature {
        signature.normalize_s().unwrap_or_else(|| signature.clone())
    }

    fn parse_signature_compact(&self, bytes: &[u8]) -> Option<Signature> {
        Signature::from_slice(bytes).ok()
    }

    fn serialize_signature_compact(&self, signature: &Signature) -> [u8; 64] {
        let mut out = [0u8; 64];
        out.copy_from_slice(&signature.to_bytes());
        out
    }

    fn sign_recoverable(
        &self,
        hash: &[u8; 32],
        scalar: &ScalarBytes,
        entropy: Option<&[u8; 32]>,
    ) -> Option<(Signature, u8)> {
        let d = *SecretKey::from_bytes(scalar.into()).ok()?.to_nonzero_scalar();
        let k = nonce(scalar, hash, entropy)?;
        let (signature, recovery_id) =
            sign_prehashed::<Secp256k1, Scalar>(&d, k, &FieldBytes::from(*hash)).ok()?;

        // Negating s mirrors R, which flips the y parity bit of the id
        match signature.normalize_s() {
            Some(low) => Some((low, recovery_id.to_byte() ^ 1)),
            None => Some((signature, recovery_id.to_byte())),
        }
    }

    fn recover(&self, signature: &Signature, recovery_id: u8, hash: &[u8; 32]) -> Option<PublicKey> {
        // High-S recovers the same key once s and the parity bit are flipped back
        let (signature, recovery_id) = match signature.normalize_s() {
            Some(low) => (low, recovery_id ^ 1),
            None => (signature.clone(), recovery_id),
        };
        let recovery_id = RecoveryId::from_byte(recovery_id)?;
        let verifying_key =
            VerifyingKey::recover_from_prehash(hash, &signature, recovery_id).ok()?;
        PublicKey::from_affine(*verifying_key.as_affine()).ok()
    }

    fn x_only(&self, point: &PublicKey) -> ([u8; 32], u8) {
        let encoded = point.to_encoded_point(true);
        let bytes = encoded.as_bytes();
        let mut x = [0u8; 32];
        x.copy_from_slice(&bytes[1..33]);
        (x, bytes[0] & 1)
    }

    fn sign_schnorr(
        &self,
        hash: &[u8; 32],
        scalar: &ScalarBytes,
        aux_rand: &[u8; 32],
    ) -> Option<[u8; 64]> {
        let signing_key = schnorr::SigningKey::from_bytes(scalar).ok()?;
        let signature = signing_key.sign_raw(hash, aux_rand).ok()?;
        Some(signature.to_bytes())
    }

    fn verify_schnorr(&self, hash: &[u8; 32], x_only: &[u8; 32], signature: &[u8; 64]) -> bool {
        let Ok(verifying_key) = schnorr::VerifyingKey::from_bytes(x_only) else {
            return false;
        };
        let Ok(signature) = schnorr::Signature::try_from(&signature[..]) else {
            return false;
        };
        verifying_key.verify_raw(hash, &signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;

    const ONE: [u8; 32] = {
        let mut one = [0u8; 32];
        one[31] = 1;
        one
    };

    fn scalar(hex_str: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut out).unwrap();
        out
    }

    #[test]
    fn test_random_private_key() {
        let engine = K256Engine::new();
        let d = random_private_key();
        assert!(engine.is_valid_private_key(&d));
        let point = engine.point_from_scalar(&d).unwrap();
        assert_eq!(engine.serialize_point(&point, true).len(), 33);
        assert_eq!(engine.serialize_point(&point, false)[0], 0x04);
    }

    #[test]
    fn test_known_vector() {
        let engine = K256Engine::new();
        let point = engine.point_from_scalar(&ONE).unwrap();

        // Generator point G
        assert_eq!(
            hex::encode(engine.serialize_point(&point, true)),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        let (x, parity) = engine.x_only(&point);
        assert_eq!(
            hex::encode(x),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(parity, 0);
    }

    #[test]
    fn test_scalar_edges() {
        let engine = K256Engine::new();
        let n_minus_1 =
            scalar("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140");

        assert!(!engine.is_valid_private_key(&[0u8; 32]));
        assert!(engine.is_valid_private_key(&n_minus_1));
        assert_eq!(engine.negate_scalar(&ONE), n_minus_1);
        assert_eq!(engine.tweak_add_scalar(&n_minus_1, &ONE), None);
    }

    #[test]
    fn test_point_degenerate_results() {
        let engine = K256Engine::new();
        let g = engine.point_from_scalar(&ONE).unwrap();
        let neg_g = engine.tweak_mul_point(&g, &engine.negate_scalar(&ONE)).unwrap();

        assert!(engine.combine_points(&g, &neg_g).is_none());
        assert!(engine.tweak_mul_point(&g, &[0u8; 32]).is_none());
        assert!(engine.tweak_add_point(&neg_g, &ONE).is_none());
    }

    #[test]
    fn test_ecdsa_known_vector() {
        let engine = K256Engine::new();
        let hash = sha256(b"Everything should be made as simple as possible, but not simpler.");
        let signature = engine.sign(&hash, &ONE, None).unwrap();

        assert_eq!(
            hex::encode(engine.serialize_signature_compact(&signature)),
            "33a69cd2065432a30f3d1ce4eb0d59b8ab58c74f27c41a7fdb5696ad4e6108c9\
             6f807982866f785d3f6418d24163ddae117b7db4d5fdf0071de069fa54342262"
        );
        let point = engine.point_from_scalar(&ONE).unwrap();
        assert!(engine.verify(&signature, &hash, &point));
    }

    #[test]
    fn test_ecdsa_hash_above_order() {
        let engine = K256Engine::new();
        let all_ones = [0xffu8; 32];
        let order = scalar("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
        let point = engine.point_from_scalar(&ONE).unwrap();

        // Nonce seeded with the unreduced hash bytes
        let (signature, id) = engine.sign_recoverable(&all_ones, &ONE, None).unwrap();
        assert_eq!(
            hex::encode(engine.serialize_signature_compact(&signature)),
            "3f8fe493cf305a7f02b2d2c060ba66a8f7bd13a7a64d5200c0655ad069bd85b5\
             1cf94236c3857e33a1023a5216cbc81b1dc3adcc1c71f4212df1997ffdfb140a"
        );
        assert_eq!(id, 1);
        assert!(engine.verify(&signature, &all_ones, &point));

        let signature = engine.sign(&order, &ONE, None).unwrap();
        assert_eq!(
            hex::encode(engine.serialize_signature_compact(&signature)),
            "584d928bc02fb43cb889788304f47adb538f03a963fbe649a4112398adca0b70\
             4dd3158c4f4d7e45a5ec3a41bd407d2822e0302a4342ec5279dde7cf90175eef"
        );
        assert!(engine.verify(&signature, &order, &point));

        let signature = engine.sign(&all_ones, &ONE, Some(&[1u8; 32])).unwrap();
        assert_eq!(
            hex::encode(engine.serialize_signature_compact(&signature)),
            "ef54a9066c4cb4e412d75ae55527c82b2113842e609478efa9c420fd234a004c\
             080639c3808f3238dfa13610a6f941752972341375baa67277996d33f90ac956"
        );
    }

    #[test]
    fn test_recover_high_s() {
        let engine = K256Engine::new();
        let hash = sha256(b"Everything should be made as simple as possible, but not simpler.");
        let (signature, id) = engine.sign_recoverable(&hash, &ONE, None).unwrap();
        assert_eq!(id, 0);

        let mut high = engine.serialize_signature_compact(&signature);
        high[32..].copy_from_slice(&scalar(
            "907f867d799087a2c09be72dbe9c2250a9335f31d94ab034a1f1f4927c021edf",
        ));
        let high = engine.parse_signature_compact(&high).unwrap();

        let g = engine.point_from_scalar(&ONE).unwrap();
        assert_eq!(engine.recover(&high, id ^ 1, &hash), Some(g));
        assert_ne!(engine.recover(&high, id, &hash), Some(g));
    }

    #[test]
    fn test_recovery_roundtrip() {
        let engine = K256Engine::new();
        let hash = sha256(b"recoverable");
        let d = random_private_key();
        let (signature, id) = engine.sign_recoverable(&hash, &d, None).unwrap();
        let recovered = engine.recover(&signature, id, &hash).unwrap();
        assert_eq!(recovered, engine.point_from_scalar(&d).unwrap());
    }

    #[test]
    fn test_schnorr_bip340_vector_0() {
        let engine = K256Engine::new();
        let mut d = [0u8; 32];
        d[31] = 3;
        let signature = engine.sign_schnorr(&[0u8; 32], &d, &[0u8; 32]).unwrap();
        assert_eq!(
            hex::encode(signature),
            "e907831f80848d1069a5371b402410364bdf1c5f8307b0084c55f1ce2dca8215\
             25f66a4a85ea8b71e482a74f382d2ce5ebeee8fdb2172f477df4900d310536c0"
        );

        let x = scalar("f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9");
        assert!(engine.verify_schnorr(&[0u8; 32], &x, &signature));
        assert!(!engine.verify_schnorr(&[1u8; 32], &x, &signature));
    }
}

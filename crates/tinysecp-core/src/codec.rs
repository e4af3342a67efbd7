//! Canonical point and signature encodings

use std::fmt;

use serde::{Serialize, Serializer};
use tinysecp_crypto::CurveEngine;

use crate::classify::PUBLIC_KEY_UNCOMPRESSED_SIZE;
use crate::error::{Result, ValidationError};

/// SEC1 output encoding of a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// 33 bytes: 0x02/0x03 || x
    Compressed,
    /// 65 bytes: 0x04 || x || y
    Uncompressed,
}

impl Encoding {
    /// Pick the output encoding for an operation.
    ///
    /// An explicit flag always wins. Otherwise the encoding follows the shape
    /// of the first point argument (33 bytes compressed, 65 uncompressed), and
    /// operations with no point argument default to compressed.
    pub fn infer(compressed: Option<bool>, reference: Option<&[u8]>) -> Self {
        match (compressed, reference) {
            (Some(true), _) => Encoding::Compressed,
            (Some(false), _) => Encoding::Uncompressed,
            (None, Some(point)) if point.len() == PUBLIC_KEY_UNCOMPRESSED_SIZE => {
                Encoding::Uncompressed
            }
            (None, _) => Encoding::Compressed,
        }
    }

    pub fn is_compressed(self) -> bool {
        self == Encoding::Compressed
    }
}

/// An encoded point returned to the caller
#[derive(Clone, PartialEq, Eq)]
pub enum PointBytes {
    Compressed([u8; 33]),
    Uncompressed([u8; 65]),
}

impl PointBytes {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PointBytes::Compressed(bytes) => bytes,
            PointBytes::Uncompressed(bytes) => bytes,
        }
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            PointBytes::Compressed(_) => Encoding::Compressed,
            PointBytes::Uncompressed(_) => Encoding::Uncompressed,
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.encoding().is_compressed()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl AsRef<[u8]> for PointBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for PointBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointBytes::Compressed(_) => write!(f, "Compressed({})", self.to_hex()),
            PointBytes::Uncompressed(_) => write!(f, "Uncompressed({})", self.to_hex()),
        }
    }
}

impl fmt::Display for PointBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PointBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// 32 byte x coordinate plus the parity of the full point's y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XOnlyPoint {
    #[serde(serialize_with = "serialize_hex")]
    pub x: [u8; 32],
    pub parity: u8,
}

/// Compact ECDSA signature plus its recovery id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoverableSignature {
    #[serde(serialize_with = "serialize_hex")]
    pub signature: [u8; 64],
    pub recovery_id: u8,
}

/// Serialize any byte buffer as a lowercase hex string.
pub fn serialize_hex<T, S>(bytes: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes.as_ref()))
}

/// Serialize a decoded point in the requested encoding.
pub fn encode_point<E: CurveEngine>(
    engine: &E,
    point: &E::Point,
    encoding: Encoding,
) -> Result<PointBytes> {
    let bytes = engine.serialize_point(point, encoding.is_compressed());
    // The engine owns the encoding; a length mismatch means it broke its contract
    match encoding {
        Encoding::Compressed => bytes
            .as_slice()
            .try_into()
            .map(PointBytes::Compressed)
            .map_err(|_| ValidationError::InvalidPoint),
        Encoding::Uncompressed => bytes
            .as_slice()
            .try_into()
            .map(PointBytes::Uncompressed)
            .map_err(|_| ValidationError::InvalidPoint),
    }
}

pub fn encode_signature<E: CurveEngine>(engine: &E, signature: &E::Signature) -> [u8; 64] {
    engine.serialize_signature_compact(signature)
}

pub fn encode_x_only<E: CurveEngine>(engine: &E, point: &E::Point) -> XOnlyPoint {
    let (x, parity) = engine.x_only(point);
    XOnlyPoint { x, parity }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinysecp_crypto::K256Engine;

    const G_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const G_UNCOMPRESSED: &str = "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
                                  483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

    #[test]
    fn test_infer_explicit_flag_wins() {
        let uncompressed = [4u8; 65];
        let compressed = [2u8; 33];
        assert_eq!(Encoding::infer(Some(true), Some(&uncompressed[..])), Encoding::Compressed);
        assert_eq!(Encoding::infer(Some(false), Some(&compressed[..])), Encoding::Uncompressed);
        assert_eq!(Encoding::infer(Some(false), None), Encoding::Uncompressed);
    }

    #[test]
    fn test_infer_from_reference() {
        assert_eq!(Encoding::infer(None, Some(&[2u8; 33][..])), Encoding::Compressed);
        assert_eq!(Encoding::infer(None, Some(&[4u8; 65][..])), Encoding::Uncompressed);
        assert_eq!(Encoding::infer(None, None), Encoding::Compressed);
    }

    #[test]
    fn test_encode_roundtrip_both_forms() {
        let engine = K256Engine::new();
        let g = hex::decode(G_COMPRESSED).unwrap();
        let point = engine.parse_point(&g).unwrap();

        let compressed = encode_point(&engine, &point, Encoding::Compressed).unwrap();
        let uncompressed = encode_point(&engine, &point, Encoding::Uncompressed).unwrap();
        assert_eq!(compressed.to_hex(), G_COMPRESSED);
        assert_eq!(uncompressed.to_hex(), G_UNCOMPRESSED);
        assert_eq!(uncompressed.len(), 65);
        assert!(!uncompressed.is_compressed());

        let reparsed = engine.parse_point(uncompressed.as_bytes()).unwrap();
        assert_eq!(reparsed, point);
    }

    #[test]
    fn test_serialize_as_hex() {
        let point = XOnlyPoint { x: [0xab; 32], parity: 1 };
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, format!("{{\"x\":\"{}\",\"parity\":1}}", "ab".repeat(32)));

        let recoverable = RecoverableSignature { signature: [1u8; 64], recovery_id: 0 };
        let json = serde_json::to_value(recoverable).unwrap();
        assert_eq!(json["recoveryId"], 0);
        assert_eq!(json["signature"], "01".repeat(64));
    }
}

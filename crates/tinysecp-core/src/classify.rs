//! Byte classification and shared constants
//!
//! Pure length/shape checks. Nothing here knows about the curve; a buffer of
//! the right shape can still be rejected by the validation layer.

pub const PRIVATE_KEY_SIZE: usize = 32;
pub const PUBLIC_KEY_COMPRESSED_SIZE: usize = 33;
pub const PUBLIC_KEY_UNCOMPRESSED_SIZE: usize = 65;
pub const X_ONLY_PUBLIC_KEY_SIZE: usize = 32;
pub const TWEAK_SIZE: usize = 32;
pub const HASH_SIZE: usize = 32;
pub const EXTRA_DATA_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = 64;

pub const ZERO32: [u8; 32] = [0u8; 32];

/// Order of the secp256k1 generator subgroup (n)
pub const GROUP_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// n - 1, which is -1 mod n
pub const GROUP_ORDER_LESS_1: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x40,
];

/// Field prime minus group order (p - n)
pub const P_MINUS_N: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    0x45, 0x51, 0x23, 0x19, 0x50, 0xb7, 0x5f, 0xc4, 0x40, 0x2d, 0xa1, 0x72, 0x2f, 0xc9, 0xba, 0xee,
];

/// Shape of a caller-supplied buffer, decided by length alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// 32 bytes: scalar, hash, tweak, entropy or x-only point
    Uint256,
    /// 33 bytes
    CompressedPoint,
    /// 65 bytes
    UncompressedPoint,
    /// 64 bytes: compact `r || s`
    Signature,
}

impl Shape {
    pub fn of(buf: &[u8]) -> Option<Self> {
        match buf.len() {
            PRIVATE_KEY_SIZE => Some(Shape::Uint256),
            PUBLIC_KEY_COMPRESSED_SIZE => Some(Shape::CompressedPoint),
            PUBLIC_KEY_UNCOMPRESSED_SIZE => Some(Shape::UncompressedPoint),
            SIGNATURE_SIZE => Some(Shape::Signature),
            _ => None,
        }
    }

    pub fn is_point(self) -> bool {
        matches!(self, Shape::CompressedPoint | Shape::UncompressedPoint)
    }
}

pub fn is_uint256(buf: &[u8]) -> bool {
    buf.len() == 32
}

/// Only drives the default output encoding; says nothing about validity.
pub fn is_compressed_point_shape(buf: &[u8]) -> bool {
    buf.len() == PUBLIC_KEY_COMPRESSED_SIZE
}

pub fn is_point_shape(buf: &[u8]) -> bool {
    Shape::of(buf).map_or(false, Shape::is_point)
}

pub fn is_zero(buf: &[u8; 32]) -> bool {
    buf == &ZERO32
}

/// Big-endian `value < n`. Lexicographic order on equal-length byte arrays is
/// numeric order.
pub fn is_below_order(value: &[u8; 32]) -> bool {
    value < &GROUP_ORDER
}

/// View a 32 byte slice as an array, `None` for any other length.
pub fn as_uint256(buf: &[u8]) -> Option<&[u8; 32]> {
    buf.try_into().ok()
}

/// Split a compact signature into `(r, s)`.
pub fn split_compact(signature: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&signature[..32]);
    s.copy_from_slice(&signature[32..]);
    (r, s)
}

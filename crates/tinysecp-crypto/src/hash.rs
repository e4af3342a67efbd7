//! Hash functions for message digests

use sha2::{Digest, Sha256};

/// SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let result = sha256(b"hello");
        assert_eq!(
            hex::encode(result),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_sha256_message_digest() {
        let result = sha256(b"Everything should be made as simple as possible, but not simpler.");
        assert_eq!(
            hex::encode(result),
            "06ef2b193b83b3d701f765f1db34672ab84897e1252343cc2197829af3a30456"
        );
    }
}

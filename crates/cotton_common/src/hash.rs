//! Content hashing for cache integrity and template identity digests.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    bytes.iter().try_for_each(|b| write!(f, "{b:02x}"))
}

/// XXH3-128 checksum of a cached payload.
///
/// A stored payload whose checksum no longer matches reads as a miss.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Checksums `payload`.
    pub fn of(payload: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(payload).to_le_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentHash(")?;
        write_hex(f, &self.0[..4])?;
        f.write_str("..)")
    }
}

/// SHA-256 digest of a template identity (its logical name).
///
/// Displays as 64 lowercase hex characters, the form embedded in cache keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityDigest([u8; 32]);

impl IdentityDigest {
    /// Digests the UTF-8 bytes of a template identity.
    pub fn of(identity: &str) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(Sha256::digest(identity.as_bytes()).as_slice());
        Self(bytes)
    }
}

impl fmt::Display for IdentityDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Debug for IdentityDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityDigest(")?;
        write_hex(f, &self.0[..4])?;
        f.write_str("..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_tracks_payload() {
        assert_eq!(ContentHash::of(b"<c-card />"), ContentHash::of(b"<c-card />"));
        assert_ne!(ContentHash::of(b"<c-card />"), ContentHash::of(b"<c-button />"));
    }

    #[test]
    fn checksum_is_32_hex_chars() {
        let text = ContentHash::of(b"{% cotton_component %}").to_string();
        assert_eq!(text.len(), 32);
        assert!(text.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn checksum_survives_json() {
        let sum = ContentHash::of(b"compiled");
        let text = serde_json::to_string(&sum).unwrap();
        assert_eq!(serde_json::from_str::<ContentHash>(&text).unwrap(), sum);
    }

    #[test]
    fn identity_digest_matches_known_sha256() {
        let d = IdentityDigest::of("abc");
        assert_eq!(
            d.to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn identity_digest_of_empty_string() {
        let d = IdentityDigest::of("");
        assert_eq!(
            d.to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn debug_is_abbreviated() {
        assert_eq!(format!("{:?}", IdentityDigest::of("abc")), "IdentityDigest(ba7816bf..)");
    }
}

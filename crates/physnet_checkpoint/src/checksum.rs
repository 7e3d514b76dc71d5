//! Payload checksums recorded in checkpoint headers.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CheckpointError;

/// XXH3-128 digest of an encoded graph.
///
/// Written into the header by [`encode`](crate::artifact::encode) and
/// recomputed on load, so a truncated or edited file fails before its payload
/// is decoded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum([u8; 16]);

impl Checksum {
    /// Digests a payload.
    pub fn of(payload: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(payload).to_le_bytes())
    }

    /// Checks that `payload`, read from `path`, still has this digest.
    pub fn verify(self, payload: &[u8], path: &Path) -> Result<(), CheckpointError> {
        let actual = Self::of(payload);
        if actual == self {
            return Ok(());
        }
        Err(CheckpointError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: self.to_string(),
            actual: actual.to_string(),
        })
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_digested_payload() {
        let payload = b"LUT6_2 u_phys INIT=64'hCAFEBABE5A5A5A5A";
        Checksum::of(payload)
            .verify(payload, Path::new("top.pnc"))
            .unwrap();
    }

    #[test]
    fn one_flipped_bit_is_a_mismatch() {
        let payload = b"RAM32M u_ram INIT_A=64'h0".to_vec();
        let checksum = Checksum::of(&payload);
        let mut edited = payload.clone();
        edited[0] ^= 1;
        let err = checksum.verify(&edited, Path::new("top.pnc")).unwrap_err();
        match err {
            CheckpointError::ChecksumMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, checksum.to_string());
                assert_ne!(expected, actual);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn renders_as_32_hex_digits() {
        let text = Checksum::of(b"").to_string();
        assert_eq!(text.len(), 32);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(format!("{:?}", Checksum::of(b"")), format!("Checksum({text})"));
    }
}

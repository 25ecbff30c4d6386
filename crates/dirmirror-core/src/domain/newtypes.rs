//! Validated newtypes
//!
//! [`ContentDigest`] wraps the 32-byte SHA-256 output used to compare file
//! content. Two files with equal digests are treated as having identical
//! content; a hash collision is an accepted approximation, not something
//! the engine guards against.

/// Prefix of the textual digest form
const DIGEST_PREFIX: &str = "sha256:";

/// Length of a SHA-256 digest in bytes
const DIGEST_LEN: usize = 32;

// ============================================================================
// ContentDigest
// ============================================================================

/// SHA-256 digest of a file's full byte stream
///
/// Displays as `sha256:<64 lowercase hex chars>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; DIGEST_LEN]);

impl ContentDigest {
    /// Wraps raw digest bytes
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(DIGEST_PREFIX)?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

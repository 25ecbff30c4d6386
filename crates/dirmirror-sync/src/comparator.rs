//! Content comparison by SHA-256 digest
//!
//! Two files are reported equal when the SHA-256 digests of their full byte
//! streams match. This is a probabilistic check: a digest collision would
//! report different files as equal. The probability is negligible and the
//! engine treats equal digests as equal content.
//!
//! Files of different length cannot have equal content, so sizes are
//! compared first and hashing is skipped when they differ. The observable
//! result is the same as hashing both.

use std::{fs::File, path::Path};

use dirmirror_core::domain::ContentDigest;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::SyncError;

/// Decides whether two files have identical content
#[derive(Debug, Clone, Default)]
pub struct ContentComparator;

impl ContentComparator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Computes the SHA-256 digest of the file at `path`.
    ///
    /// The file is streamed through the hasher rather than read into memory.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn digest(&self, path: &Path) -> Result<ContentDigest, SyncError> {
        let mut file = File::open(path).map_err(|e| SyncError::io("open", path, e))?;
        let mut hasher = Sha256::new();
        std::io::copy(&mut file, &mut hasher).map_err(|e| SyncError::io("read", path, e))?;

        let bytes: [u8; 32] = hasher.finalize().into();
        let digest = ContentDigest::from_bytes(bytes);
        debug!(%digest, "digest computed");
        Ok(digest)
    }

    /// Returns whether `a` and `b` have identical content.
    ///
    /// Either file being unreadable is an error, never a silent "not equal".
    pub fn are_equal(&self, a: &Path, b: &Path) -> Result<bool, SyncError> {
        let len_a = std::fs::metadata(a)
            .map_err(|e| SyncError::io("inspect", a, e))?
            .len();
        let len_b = std::fs::metadata(b)
            .map_err(|e| SyncError::io("inspect", b, e))?
            .len();

        if len_a != len_b {
            debug!(
                a = %a.display(),
                b = %b.display(),
                len_a,
                len_b,
                "sizes differ, skipping digest"
            );
            return Ok(false);
        }

        Ok(self.digest(a)? == self.digest(b)?)
    }
}

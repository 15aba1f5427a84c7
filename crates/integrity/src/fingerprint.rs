//! Fingerprint computation and verification.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use billforge_core::{EngineError, EngineResult};

use crate::canonical::{canonical_bytes, InvoiceContent};

/// Identifier of the digest algorithm + canonical-form version producing
/// fingerprints today. Stored alongside every digest for forward migration.
pub const FINGERPRINT_ALGORITHM: &str = "sha256.bf1";

/// The stored tamper indicator: digest plus the algorithm that produced it.
///
/// Produced at creation and at every content-changing update; never any
/// other way. The value is public-verifiable, not a secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityRecord {
    pub algorithm: String,
    /// Lowercase hex, 64 characters for SHA-256.
    pub digest: String,
}

impl core::fmt::Display for IntegrityRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Compute the fingerprint of an invoice content snapshot.
pub fn fingerprint(content: &InvoiceContent<'_>) -> IntegrityRecord {
    let digest = Sha256::digest(canonical_bytes(content));
    IntegrityRecord {
        algorithm: FINGERPRINT_ALGORITHM.to_string(),
        digest: to_hex(&digest),
    }
}

/// Recompute the fingerprint from current content and compare to the stored
/// record.
///
/// Any mismatch - including an unrecognized algorithm tag - is an
/// `IntegrityViolation`, never auto-corrected. A match proves the content
/// fields have not been altered since the record was produced.
pub fn verify(content: &InvoiceContent<'_>, stored: &IntegrityRecord) -> EngineResult<()> {
    let recomputed = fingerprint(content);
    if stored.algorithm != recomputed.algorithm || stored.digest != recomputed.digest {
        return Err(EngineError::IntegrityViolation {
            stored: stored.to_string(),
            recomputed: recomputed.to_string(),
        });
    }
    Ok(())
}

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::StoreError;
use crate::models::ContentFingerprint;

use super::MetadataStore;

type InFlight = Arc<Mutex<HashSet<ContentFingerprint>>>;

/// Result of checking an upload against known content
#[derive(Debug)]
pub enum DedupCheck {
    /// Unseen content, reserved for the caller until the claim is dropped
    New(FingerprintClaim),
    /// Already stored, or being processed by another upload
    Duplicate(ContentFingerprint),
}

/// Exclusive hold on a fingerprint while its upload is processed
#[derive(Debug)]
pub struct FingerprintClaim {
    fingerprint: ContentFingerprint,
    in_flight: InFlight,
}

impl FingerprintClaim {
    pub fn fingerprint(&self) -> &ContentFingerprint {
        &self.fingerprint
    }
}

impl Drop for FingerprintClaim {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.fingerprint);
    }
}

/// Rejects uploads whose exact bytes were processed before or are being
/// processed right now
pub struct DedupGate {
    metadata: Arc<dyn MetadataStore>,
    in_flight: InFlight,
}

impl DedupGate {
    pub fn new(metadata: Arc<dyn MetadataStore>) -> Self {
        Self {
            metadata,
            in_flight: InFlight::default(),
        }
    }

    pub fn fingerprint(bytes: &[u8]) -> ContentFingerprint {
        ContentFingerprint::of(bytes)
    }

    pub async fn is_duplicate(&self, fingerprint: &ContentFingerprint) -> Result<bool, StoreError> {
        self.metadata.exists_by_fingerprint(fingerprint).await
    }

    /// Fingerprint `bytes`, reserve the fingerprint and look it up
    pub async fn check(&self, bytes: &[u8]) -> Result<DedupCheck, StoreError> {
        let fingerprint = Self::fingerprint(bytes);

        let claimed = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(fingerprint.clone());
        if !claimed {
            return Ok(DedupCheck::Duplicate(fingerprint));
        }
        let claim = FingerprintClaim {
            fingerprint,
            in_flight: self.in_flight.clone(),
        };

        if self.is_duplicate(claim.fingerprint()).await? {
            return Ok(DedupCheck::Duplicate(claim.fingerprint().clone()));
        }
        Ok(DedupCheck::New(claim))
    }
}

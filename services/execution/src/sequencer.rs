//! Per-identity submission serialization
//!
//! One broadcast may be in flight per signing identity. Later submissions for
//! the same identity wait on an async mutex in FIFO order; different
//! identities never block each other.

use crate::broadcaster::SigningIdentity;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

#[derive(Debug, Default)]
pub struct SubmissionSequencer {
    accounts: DashMap<SigningIdentity, Arc<Mutex<u64>>>,
}

/// Exclusive right to submit for one identity
///
/// Dropping the permit releases the identity, including when the owning
/// future is cancelled by a timeout.
#[derive(Debug)]
pub struct SubmissionPermit {
    identity: SigningIdentity,
    next_sequence: OwnedMutexGuard<u64>,
}

impl SubmissionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other submission for `identity` is in flight
    pub async fn acquire(&self, identity: &SigningIdentity) -> SubmissionPermit {
        // Clone the Arc out so the shard lock is not held across the await
        let account = self
            .accounts
            .entry(identity.clone())
            .or_insert_with(|| Arc::new(Mutex::new(0)))
            .clone();

        let next_sequence = account.lock_owned().await;
        debug!(signer = %identity, sequence = *next_sequence, "Submission slot acquired");

        SubmissionPermit {
            identity: identity.clone(),
            next_sequence,
        }
    }

    /// Identities seen so far
    pub fn known_identities(&self) -> usize {
        self.accounts.len()
    }
}

impl SubmissionPermit {
    pub fn identity(&self) -> &SigningIdentity {
        &self.identity
    }

    /// Take the sequence number for the next broadcast
    pub fn take_sequence(&mut self) -> u64 {
        let sequence = *self.next_sequence;
        *self.next_sequence += 1;
        sequence
    }
}

// Slash Ledger - The once-only enforcement record
// Principle: Every violation is punished at most once, forever
//
// Keys are flat composite tuples so comparison stays O(1) and message kinds
// can never collide. Records are never deleted: Unslashed -> Slashed and
// Active -> Blacklisted are terminal, one-way transitions.

use crate::types::{Height, MessageKind, Round, ValidatorIdentity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Composite key for an equivocation slash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlashKey {
    pub height: Height,
    pub round: Round,
    pub kind: MessageKind,
    pub signer: ValidatorIdentity,
}

/// Process-wide record of punishments already applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlashLedger {
    /// Equivocation slashes, keyed per (height, round, kind, signer)
    slashed: HashSet<SlashKey>,

    /// Secret-reveal slashes, keyed per (signer, commitment id)
    reveal_slashed: HashSet<(ValidatorIdentity, u64)>,

    /// Permanently blacklisted identities
    blacklisted: HashSet<ValidatorIdentity>,
}

impl SlashLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-then-set for an equivocation slash key
    pub fn try_record_slash(&mut self, key: SlashKey) -> Result<(), LedgerError> {
        if self.slashed.contains(&key) {
            return Err(LedgerError::AlreadySlashed { key });
        }
        self.slashed.insert(key);
        Ok(())
    }

    /// Check-then-set for a secret-reveal slash
    pub fn try_record_reveal_slash(
        &mut self,
        signer: ValidatorIdentity,
        commitment_id: u64,
    ) -> Result<(), LedgerError> {
        if self.reveal_slashed.contains(&(signer, commitment_id)) {
            return Err(LedgerError::AlreadyRevealSlashed {
                signer,
                commitment_id,
            });
        }
        self.reveal_slashed.insert((signer, commitment_id));
        Ok(())
    }

    /// Check-then-set for a blacklist entry
    pub fn try_blacklist(&mut self, identity: ValidatorIdentity) -> Result<(), LedgerError> {
        if self.blacklisted.contains(&identity) {
            return Err(LedgerError::AlreadyBlacklisted { identity });
        }
        self.blacklisted.insert(identity);
        Ok(())
    }

    pub fn is_slashed(&self, key: &SlashKey) -> bool {
        self.slashed.contains(key)
    }

    pub fn is_reveal_slashed(&self, signer: &ValidatorIdentity, commitment_id: u64) -> bool {
        self.reveal_slashed.contains(&(*signer, commitment_id))
    }

    pub fn is_blacklisted(&self, identity: &ValidatorIdentity) -> bool {
        self.blacklisted.contains(identity)
    }

    // Rollback hooks for the facade: a ledger write is undone only when the
    // bond deduction of the same operation is refused, so that a rejected
    // call observes no state mutation.

    pub(crate) fn revert_slash(&mut self, key: &SlashKey) {
        self.slashed.remove(key);
    }

    pub(crate) fn revert_reveal_slash(&mut self, signer: &ValidatorIdentity, commitment_id: u64) {
        self.reveal_slashed.remove(&(*signer, commitment_id));
    }

    pub(crate) fn revert_blacklist(&mut self, identity: &ValidatorIdentity) {
        self.blacklisted.remove(identity);
    }
}

/// Ledger rejection reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("already slashed: {} at height {} round {} by {}", key.kind, key.height, key.round, key.signer)]
    AlreadySlashed { key: SlashKey },

    #[error("already slashed: secret reveal by {signer} for commitment {commitment_id}")]
    AlreadyRevealSlashed {
        signer: ValidatorIdentity,
        commitment_id: u64,
    },

    #[error("already blacklisted: {identity}")]
    AlreadyBlacklisted { identity: ValidatorIdentity },
}

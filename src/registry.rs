// Bond registry - The external authority holding validator bonds
//
// The slashing engine never touches bond balances directly: it goes through
// the BondAuthority capability, so the evidence and ledger logic stays
// independently testable against an in-memory registry. The production
// registry (epoch management, token transfers) lives outside this crate.

use crate::types::{Balance, Hash, ValidatorIdentity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum bond required to register a validator
pub const MIN_VALIDATOR_BOND: Balance = 100_000;

/// A stored secret commitment for one validator
///
/// `commitment` is the canonical digest of the opening tuple the validator
/// committed to. A later signed reveal either reproduces this digest
/// (honest) or proves misbehavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentRecord {
    /// Identifier scoping the once-only slash key for this commitment
    pub id: u64,

    /// Digest of the committed opening tuple
    pub commitment: Hash,
}

/// Capability interface consumed by the slashing facade
pub trait BondAuthority {
    /// Current bond balance; zero for unknown identities
    fn bond(&self, id: &ValidatorIdentity) -> Balance;

    /// Reduce a bond, returning the new balance
    fn deduct_bond(
        &mut self,
        id: &ValidatorIdentity,
        amount: Balance,
    ) -> Result<Balance, RegistryError>;

    /// Stored commitment for the identity, if any
    fn commitment(&self, id: &ValidatorIdentity) -> Option<CommitmentRecord>;
}

/// In-memory bond registry
///
/// # Thread safety
/// This struct is not internally thread-safe. Concurrent hosts must wrap it
/// (together with the slasher that owns it) in a single mutual-exclusion
/// domain, e.g. `Arc<RwLock<_>>`, so that check-then-act sequences stay
/// atomic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BondRegistry {
    /// Bond balance per validator
    bonds: HashMap<ValidatorIdentity, Balance>,

    /// Secret commitments per validator
    commitments: HashMap<ValidatorIdentity, CommitmentRecord>,
}

impl BondRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator with its bond
    pub fn register(&mut self, id: ValidatorIdentity, bond: Balance) -> Result<(), RegistryError> {
        if bond < MIN_VALIDATOR_BOND {
            return Err(RegistryError::InsufficientBond {
                id,
                requested: MIN_VALIDATOR_BOND,
                available: bond,
            });
        }
        self.bonds.insert(id, bond);
        Ok(())
    }

    /// Store the commitment a validator is bound to
    pub fn record_commitment(&mut self, id: ValidatorIdentity, record: CommitmentRecord) {
        self.commitments.insert(id, record);
    }

    pub fn is_registered(&self, id: &ValidatorIdentity) -> bool {
        self.bonds.contains_key(id)
    }
}

impl BondAuthority for BondRegistry {
    fn bond(&self, id: &ValidatorIdentity) -> Balance {
        self.bonds.get(id).copied().unwrap_or(0)
    }

    fn deduct_bond(
        &mut self,
        id: &ValidatorIdentity,
        amount: Balance,
    ) -> Result<Balance, RegistryError> {
        let bond = self.bonds.get_mut(id).ok_or(RegistryError::UnknownValidator { id: *id })?;

        if amount > *bond {
            return Err(RegistryError::InsufficientBond {
                id: *id,
                requested: amount,
                available: *bond,
            });
        }

        *bond = bond.saturating_sub(amount);
        Ok(*bond)
    }

    fn commitment(&self, id: &ValidatorIdentity) -> Option<CommitmentRecord> {
        self.commitments.get(id).copied()
    }
}

/// Registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown validator: {id}")]
    UnknownValidator { id: ValidatorIdentity },

    #[error("insufficient bond for {id}: requested {requested}, available {available}")]
    InsufficientBond {
        id: ValidatorIdentity,
        requested: Balance,
        available: Balance,
    },
}

// Slasher - The public facade over evidence, ledger, config and bonds
// Principle: Evaluate, record, then deduct - in that order, atomically
//
// Every operation runs to completion under &mut self, so the borrow checker
// enforces the single-writer contract. The ledger record is written before
// the bond deduction; if the authority refuses the deduction the record is
// rolled back, so a rejected call observes no state mutation.

use crate::config::{ConfigError, SlashConfig};
use crate::evidence::{self, EvidenceError};
use crate::ledger::{LedgerError, SlashKey, SlashLedger};
use crate::registry::{BondAuthority, RegistryError};
use crate::types::{
    Balance, ConsensusMessage, Hash, Height, MessageKind, RecoverableSignature, Round,
    SecretOpening, ValidatorIdentity,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Type-specific content of a Propose message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeContent {
    pub block_hash: Hash,
    pub valid_round: Round,
}

/// Type-specific content of a Prevote or Precommit message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteContent {
    pub block_hash: Hash,
}

/// Why a bond was deducted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlashCause {
    Equivocation {
        height: Height,
        round: Round,
        kind: MessageKind,
    },
    SecretReveal {
        commitment_id: u64,
    },
    Blacklist,
}

/// Audit-trail record of an applied slash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashEvent {
    pub signer: ValidatorIdentity,
    pub cause: SlashCause,
    pub percent: u64,
    pub amount: Balance,
}

/// The slashing engine facade
pub struct Slasher<A: BondAuthority> {
    authority: A,
    config: SlashConfig,
    ledger: SlashLedger,
    history: Vec<SlashEvent>,
}

impl<A: BondAuthority> Slasher<A> {
    pub fn new(authority: A) -> Self {
        Self {
            authority,
            config: SlashConfig::new(),
            ledger: SlashLedger::new(),
            history: Vec::new(),
        }
    }

    pub fn with_config(authority: A, config: SlashConfig) -> Self {
        Self {
            authority,
            config,
            ledger: SlashLedger::new(),
            history: Vec::new(),
        }
    }

    // --- configuration -----------------------------------------------------

    pub fn set_blacklist_percent(&mut self, percent: u64) -> Result<(), ConfigError> {
        self.config.set_blacklist_percent(percent)
    }

    pub fn set_malicious_percent(&mut self, percent: u64) -> Result<(), ConfigError> {
        self.config.set_malicious_percent(percent)
    }

    pub fn set_secret_reveal_percent(&mut self, percent: u64) -> Result<(), ConfigError> {
        self.config.set_secret_reveal_percent(percent)
    }

    pub fn config(&self) -> &SlashConfig {
        &self.config
    }

    // --- accessors ---------------------------------------------------------

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut A {
        &mut self.authority
    }

    pub fn ledger(&self) -> &SlashLedger {
        &self.ledger
    }

    /// Immutable audit trail of every applied slash
    pub fn history(&self) -> &[SlashEvent] {
        &self.history
    }

    // --- the five public operations ----------------------------------------

    /// Slash a validator that signed two different proposals for the same
    /// height and round
    pub fn slash_duplicate_propose(
        &mut self,
        height: Height,
        round: Round,
        content_a: ProposeContent,
        sig_a: RecoverableSignature,
        content_b: ProposeContent,
        sig_b: RecoverableSignature,
    ) -> Result<Balance, SlashError> {
        let msg_a = ConsensusMessage::Propose {
            height,
            round,
            block_hash: content_a.block_hash,
            valid_round: content_a.valid_round,
        };
        let msg_b = ConsensusMessage::Propose {
            height,
            round,
            block_hash: content_b.block_hash,
            valid_round: content_b.valid_round,
        };
        self.slash_equivocation(&msg_a, &sig_a, &msg_b, &sig_b)
    }

    /// Slash a validator that signed two different prevotes for the same
    /// height and round
    pub fn slash_duplicate_prevote(
        &mut self,
        height: Height,
        round: Round,
        content_a: VoteContent,
        sig_a: RecoverableSignature,
        content_b: VoteContent,
        sig_b: RecoverableSignature,
    ) -> Result<Balance, SlashError> {
        let msg_a = ConsensusMessage::Prevote {
            height,
            round,
            block_hash: content_a.block_hash,
        };
        let msg_b = ConsensusMessage::Prevote {
            height,
            round,
            block_hash: content_b.block_hash,
        };
        self.slash_equivocation(&msg_a, &sig_a, &msg_b, &sig_b)
    }

    /// Slash a validator that signed two different precommits for the same
    /// height and round
    pub fn slash_duplicate_precommit(
        &mut self,
        height: Height,
        round: Round,
        content_a: VoteContent,
        sig_a: RecoverableSignature,
        content_b: VoteContent,
        sig_b: RecoverableSignature,
    ) -> Result<Balance, SlashError> {
        let msg_a = ConsensusMessage::Precommit {
            height,
            round,
            block_hash: content_a.block_hash,
        };
        let msg_b = ConsensusMessage::Precommit {
            height,
            round,
            block_hash: content_b.block_hash,
        };
        self.slash_equivocation(&msg_a, &sig_a, &msg_b, &sig_b)
    }

    /// Slash a validator that revealed a secret opening which does not
    /// satisfy its stored commitment
    pub fn slash_secret_reveal(
        &mut self,
        opening: SecretOpening,
        sig: RecoverableSignature,
    ) -> Result<Balance, SlashError> {
        let authority = &self.authority;
        let violation =
            evidence::evaluate_secret_reveal(&opening, &sig, |id| authority.commitment(id))?;

        self.ledger
            .try_record_reveal_slash(violation.signer, violation.commitment_id)?;

        let percent = self.config.secret_reveal_percent();
        let cause = SlashCause::SecretReveal {
            commitment_id: violation.commitment_id,
        };
        match self.apply_deduction(violation.signer, percent, cause) {
            Ok(amount) => Ok(amount),
            Err(err) => {
                self.ledger
                    .revert_reveal_slash(&violation.signer, violation.commitment_id);
                Err(err)
            }
        }
    }

    /// Permanently blacklist an identity, deducting the blacklist percentage
    ///
    /// Removal from future validator selection is the registry's concern,
    /// triggered by the bond deduction, not by this engine.
    pub fn blacklist(&mut self, identity: ValidatorIdentity) -> Result<Balance, SlashError> {
        self.ledger.try_blacklist(identity)?;

        let percent = self.config.blacklist_percent();
        match self.apply_deduction(identity, percent, SlashCause::Blacklist) {
            Ok(amount) => Ok(amount),
            Err(err) => {
                self.ledger.revert_blacklist(&identity);
                Err(err)
            }
        }
    }

    // --- internals ----------------------------------------------------------

    fn slash_equivocation(
        &mut self,
        msg_a: &ConsensusMessage,
        sig_a: &RecoverableSignature,
        msg_b: &ConsensusMessage,
        sig_b: &RecoverableSignature,
    ) -> Result<Balance, SlashError> {
        let accepted = evidence::evaluate_equivocation(msg_a, sig_a, msg_b, sig_b)?;

        let key = SlashKey {
            height: accepted.height,
            round: accepted.round,
            kind: accepted.kind,
            signer: accepted.signer,
        };
        self.ledger.try_record_slash(key)?;

        let percent = self.config.malicious_percent();
        let cause = SlashCause::Equivocation {
            height: accepted.height,
            round: accepted.round,
            kind: accepted.kind,
        };
        match self.apply_deduction(accepted.signer, percent, cause) {
            Ok(amount) => Ok(amount),
            Err(err) => {
                self.ledger.revert_slash(&key);
                Err(err)
            }
        }
    }

    /// Deduct `percent` of the signer's current bond and record the event
    ///
    /// The percentage is read here, at slash time: reconfiguring never
    /// affects already-recorded slashes.
    fn apply_deduction(
        &mut self,
        signer: ValidatorIdentity,
        percent: u64,
        cause: SlashCause,
    ) -> Result<Balance, SlashError> {
        let bond = self.authority.bond(&signer);
        let amount = slash_amount(bond, percent);

        match self.authority.deduct_bond(&signer, amount) {
            Ok(remaining) => {
                info!(
                    signer = %signer,
                    ?cause,
                    percent,
                    amount,
                    remaining,
                    "bond slashed"
                );
                self.history.push(SlashEvent {
                    signer,
                    cause,
                    percent,
                    amount,
                });
                Ok(amount)
            }
            Err(err) => {
                warn!(signer = %signer, ?cause, amount, %err, "bond deduction refused");
                Err(err.into())
            }
        }
    }
}

/// Exact `floor(bond * percent / 100)` without overflow or floating point
///
/// Splitting the bond as `100q + r` gives `q*percent + floor(r*percent/100)`,
/// which equals the widened product for any `percent <= 100`.
pub fn slash_amount(bond: Balance, percent: u64) -> Balance {
    debug_assert!(percent <= 100);
    let percent = percent as Balance;
    (bond / 100) * percent + (bond % 100) * percent / 100
}

/// Terminal rejection reasons for the five public operations
///
/// None of these is retryable: they indicate malformed or adversarial input,
/// or a violation that has already been punished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlashError {
    #[error(transparent)]
    Evidence(#[from] EvidenceError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_amount_basic() {
        assert_eq!(slash_amount(1_000_000, 10), 100_000);
        assert_eq!(slash_amount(1_000_000, 0), 0);
        assert_eq!(slash_amount(1_000_000, 100), 1_000_000);
    }

    #[test]
    fn test_slash_amount_floors() {
        // floor(99 * 10 / 100) = 9
        assert_eq!(slash_amount(99, 10), 9);
        // floor(1 * 99 / 100) = 0
        assert_eq!(slash_amount(1, 99), 0);
        // floor(150 * 33 / 100) = 49
        assert_eq!(slash_amount(150, 33), 49);
    }

    #[test]
    fn test_slash_amount_never_exceeds_bond() {
        for bond in [0u128, 1, 99, 100, 101, 12_345_678] {
            for percent in [0u64, 1, 50, 99, 100] {
                assert!(slash_amount(bond, percent) <= bond);
            }
        }
    }

    #[test]
    fn test_slash_amount_no_overflow_at_max_bond() {
        // The widened product would overflow u128; the split form must not.
        assert_eq!(slash_amount(Balance::MAX, 100), Balance::MAX);
        assert_eq!(slash_amount(Balance::MAX, 0), 0);
    }
}

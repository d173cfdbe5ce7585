// Noctis Slasher - Evidence verification and bond slashing for darknode consensus
// Principle: No punishment without cryptographic evidence, no evidence punished twice

pub mod codec;
pub mod config;
pub mod evidence;
pub mod ledger;
pub mod registry;
pub mod slasher;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, SlashConfig};
pub use evidence::{Equivocation, EvidenceError, SecretViolation};
pub use ledger::{LedgerError, SlashKey, SlashLedger};
pub use registry::{BondAuthority, BondRegistry, CommitmentRecord, RegistryError};
pub use slasher::{ProposeContent, SlashCause, SlashError, SlashEvent, Slasher, VoteContent};
pub use types::{
    Balance, FieldElement, Hash, Height, MessageKind, RecoverableSignature, Round, SecretOpening,
    SignatureError, ValidatorIdentity,
};

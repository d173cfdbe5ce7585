// Evidence Evaluator - Decides whether submitted evidence proves misbehavior
// Principle: Reject everything that is not a provable violation
//
// The check order matters: signer mismatch is rejected before content
// identity, because two identical messages from different signers are a
// coincidence, not a protocol violation. Content identity is rejected so a
// validator resubmitting the exact same vote (deduplication) can never be
// punished, and so an observer cannot grief a validator by replaying one
// honest message twice.

use crate::codec;
use crate::registry::CommitmentRecord;
use crate::types::{
    ConsensusMessage, Hash, Height, MessageKind, RecoverableSignature, Round, SecretOpening,
    SignatureError, ValidatorIdentity,
};
use tracing::debug;

/// Accepted equivocation evidence: one validator, two conflicting messages
/// for the same (height, round, kind)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Equivocation {
    pub signer: ValidatorIdentity,
    pub height: Height,
    pub round: Round,
    pub kind: MessageKind,
}

/// Accepted secret-reveal evidence: a signed opening that does not satisfy
/// the signer's stored commitment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretViolation {
    pub signer: ValidatorIdentity,
    pub commitment_id: u64,
}

/// Evaluate a pair of signed messages as equivocation evidence
///
/// Two messages are only comparable if their kind, height and round all
/// match. The facade constructs both sides from a single coordinate set,
/// but this function is public, so the invariant is checked here too:
/// two honest votes at different coordinates are never equivocation.
pub fn evaluate_equivocation(
    msg_a: &ConsensusMessage,
    sig_a: &RecoverableSignature,
    msg_b: &ConsensusMessage,
    sig_b: &RecoverableSignature,
) -> Result<Equivocation, EvidenceError> {
    if msg_a.kind() != msg_b.kind()
        || msg_a.height() != msg_b.height()
        || msg_a.round() != msg_b.round()
    {
        debug!(
            kind_a = %msg_a.kind(),
            height_a = msg_a.height(),
            round_a = msg_a.round(),
            kind_b = %msg_b.kind(),
            height_b = msg_b.height(),
            round_b = msg_b.round(),
            "evidence refused: incomparable messages"
        );
        return Err(EvidenceError::IncomparableMessages {
            kind_a: msg_a.kind(),
            height_a: msg_a.height(),
            round_a: msg_a.round(),
            kind_b: msg_b.kind(),
            height_b: msg_b.height(),
            round_b: msg_b.round(),
        });
    }

    let encoding_a = codec::encode_message(msg_a);
    let encoding_b = codec::encode_message(msg_b);

    let signer_a = sig_a.recover(&Hash::digest(&encoding_a))?;
    let signer_b = sig_b.recover(&Hash::digest(&encoding_b))?;

    if signer_a != signer_b {
        debug!(
            signer_a = %signer_a,
            signer_b = %signer_b,
            height = msg_a.height(),
            round = msg_a.round(),
            kind = %msg_a.kind(),
            "evidence refused: different signer"
        );
        return Err(EvidenceError::DifferentSigner {
            a: signer_a,
            b: signer_b,
        });
    }

    if encoding_a == encoding_b {
        debug!(
            signer = %signer_a,
            height = msg_a.height(),
            round = msg_a.round(),
            kind = %msg_a.kind(),
            "evidence refused: identical message"
        );
        return Err(EvidenceError::IdenticalMessage {
            signer: signer_a,
            height: msg_a.height(),
            round: msg_a.round(),
            kind: msg_a.kind(),
        });
    }

    Ok(Equivocation {
        signer: signer_a,
        height: msg_a.height(),
        round: msg_a.round(),
        kind: msg_a.kind(),
    })
}

/// Evaluate a signed secret opening against the signer's stored commitment
///
/// A single-message integrity check: there is no different-signer branch.
/// The commitment store is external (the Bond Authority), so the lookup is
/// passed in. An opening whose digest equals the stored commitment is an
/// honest reveal and must never be slashable; a signer with no stored
/// commitment has nothing to violate.
pub fn evaluate_secret_reveal<F>(
    opening: &SecretOpening,
    sig: &RecoverableSignature,
    lookup: F,
) -> Result<SecretViolation, EvidenceError>
where
    F: FnOnce(&ValidatorIdentity) -> Option<CommitmentRecord>,
{
    let digest = codec::opening_digest(opening);
    let signer = sig.recover(&digest)?;

    let commitment = match lookup(&signer) {
        Some(record) => record,
        None => {
            debug!(signer = %signer, "evidence refused: no stored commitment");
            return Err(EvidenceError::UnknownCommitment { signer });
        }
    };

    if digest == commitment.commitment {
        debug!(
            signer = %signer,
            commitment_id = commitment.id,
            "evidence refused: reveal satisfies commitment"
        );
        return Err(EvidenceError::CommitmentSatisfied {
            signer,
            commitment_id: commitment.id,
        });
    }

    Ok(SecretViolation {
        signer,
        commitment_id: commitment.id,
    })
}

/// Evidence rejection reasons
///
/// Every variant carries the key fields an external auditor needs to
/// confirm why the evidence was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EvidenceError {
    #[error("invalid signature")]
    InvalidSignature(#[from] SignatureError),

    #[error(
        "incomparable messages: {kind_a} at height {height_a} round {round_a} \
         vs {kind_b} at height {height_b} round {round_b}"
    )]
    IncomparableMessages {
        kind_a: MessageKind,
        height_a: Height,
        round_a: Round,
        kind_b: MessageKind,
        height_b: Height,
        round_b: Round,
    },

    #[error("different signer: {a} and {b}")]
    DifferentSigner {
        a: ValidatorIdentity,
        b: ValidatorIdentity,
    },

    #[error("identical {kind} message from {signer} at height {height} round {round}")]
    IdenticalMessage {
        signer: ValidatorIdentity,
        height: Height,
        round: Round,
        kind: MessageKind,
    },

    #[error("reveal by {signer} satisfies commitment {commitment_id}")]
    CommitmentSatisfied {
        signer: ValidatorIdentity,
        commitment_id: u64,
    },

    #[error("no commitment stored for {signer}")]
    UnknownCommitment { signer: ValidatorIdentity },
}

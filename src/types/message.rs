// Consensus messages - The signable payloads evidence is built from
//
// Two messages are only comparable as evidence if their kind, height and
// round all match. The facade constructs both sides of an evidence pair
// from a single (height, round, kind); the evidence evaluator re-checks
// the invariant for callers that build the pair themselves.

use crate::types::primitives::{FieldElement, Hash, Height, Round};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Consensus message kinds subject to equivocation slashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Propose,
    Prevote,
    Precommit,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MessageKind::Propose => write!(f, "propose"),
            MessageKind::Prevote => write!(f, "prevote"),
            MessageKind::Precommit => write!(f, "precommit"),
        }
    }
}

/// A consensus message as signed by a validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusMessage {
    Propose {
        height: Height,
        round: Round,
        block_hash: Hash,
        valid_round: Round,
    },
    Prevote {
        height: Height,
        round: Round,
        block_hash: Hash,
    },
    Precommit {
        height: Height,
        round: Round,
        block_hash: Hash,
    },
}

impl ConsensusMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            ConsensusMessage::Propose { .. } => MessageKind::Propose,
            ConsensusMessage::Prevote { .. } => MessageKind::Prevote,
            ConsensusMessage::Precommit { .. } => MessageKind::Precommit,
        }
    }

    pub fn height(&self) -> Height {
        match self {
            ConsensusMessage::Propose { height, .. }
            | ConsensusMessage::Prevote { height, .. }
            | ConsensusMessage::Precommit { height, .. } => *height,
        }
    }

    pub fn round(&self) -> Round {
        match self {
            ConsensusMessage::Propose { round, .. }
            | ConsensusMessage::Prevote { round, .. }
            | ConsensusMessage::Precommit { round, .. } => *round,
        }
    }
}

/// The six components of a secret commitment opening
///
/// A Shamir-style share plus the commitment parameters it must satisfy.
/// Validating a mismatch is a pure function of these six inputs and the
/// originally stored commitment digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretOpening {
    pub a: FieldElement,
    pub b: FieldElement,
    pub c: FieldElement,
    pub d: FieldElement,
    pub e: FieldElement,
    pub f: FieldElement,
}

impl SecretOpening {
    pub fn new(
        a: FieldElement,
        b: FieldElement,
        c: FieldElement,
        d: FieldElement,
        e: FieldElement,
        f: FieldElement,
    ) -> Self {
        Self { a, b, c, d, e, f }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_accessors() {
        let msg = ConsensusMessage::Propose {
            height: 7,
            round: 3,
            block_hash: Hash::digest(b"block"),
            valid_round: 1,
        };
        assert_eq!(msg.kind(), MessageKind::Propose);
        assert_eq!(msg.height(), 7);
        assert_eq!(msg.round(), 3);

        let vote = ConsensusMessage::Prevote {
            height: 9,
            round: 0,
            block_hash: Hash::ZERO,
        };
        assert_eq!(vote.kind(), MessageKind::Prevote);
        assert_eq!(vote.height(), 9);
    }
}

// Codec - Canonical byte encoding of signable payloads
//
// Two logically identical messages always encode identically; two messages
// that differ in any field (including the kind) encode differently. Fields
// are fixed-width big-endian in declared order behind a per-kind domain
// separator, so there is no padding or length ambiguity. Encoding is total
// over well-typed input: no error paths.

use crate::types::{ConsensusMessage, Hash, SecretOpening};

// Domain separation prevents a signature over one message kind from being
// replayed as another kind. The kind is part of the hashed payload, never
// inferred from signature shape.

/// Domain separator for block proposals
pub const DOMAIN_PROPOSE: &[u8] = b"NOCTIS_PROPOSE_V1:";

/// Domain separator for prevotes
pub const DOMAIN_PREVOTE: &[u8] = b"NOCTIS_PREVOTE_V1:";

/// Domain separator for precommits
pub const DOMAIN_PRECOMMIT: &[u8] = b"NOCTIS_PRECOMMIT_V1:";

/// Domain separator for secret share reveals
pub const DOMAIN_SECRET_REVEAL: &[u8] = b"NOCTIS_SECRET_REVEAL_V1:";

/// Canonical encoding of a consensus message
pub fn encode_message(msg: &ConsensusMessage) -> Vec<u8> {
    match msg {
        ConsensusMessage::Propose {
            height,
            round,
            block_hash,
            valid_round,
        } => {
            let mut out = Vec::with_capacity(DOMAIN_PROPOSE.len() + 8 + 8 + 32 + 8);
            out.extend_from_slice(DOMAIN_PROPOSE);
            out.extend_from_slice(&height.to_be_bytes());
            out.extend_from_slice(&round.to_be_bytes());
            out.extend_from_slice(block_hash.as_bytes());
            out.extend_from_slice(&valid_round.to_be_bytes());
            out
        }
        ConsensusMessage::Prevote {
            height,
            round,
            block_hash,
        } => encode_vote(DOMAIN_PREVOTE, *height, *round, block_hash),
        ConsensusMessage::Precommit {
            height,
            round,
            block_hash,
        } => encode_vote(DOMAIN_PRECOMMIT, *height, *round, block_hash),
    }
}

fn encode_vote(domain: &[u8], height: u64, round: u64, block_hash: &Hash) -> Vec<u8> {
    let mut out = Vec::with_capacity(domain.len() + 8 + 8 + 32);
    out.extend_from_slice(domain);
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&round.to_be_bytes());
    out.extend_from_slice(block_hash.as_bytes());
    out
}

/// Canonical encoding of a secret opening
pub fn encode_opening(opening: &SecretOpening) -> Vec<u8> {
    let mut out = Vec::with_capacity(DOMAIN_SECRET_REVEAL.len() + 6 * 32);
    out.extend_from_slice(DOMAIN_SECRET_REVEAL);
    out.extend_from_slice(opening.a.as_bytes());
    out.extend_from_slice(opening.b.as_bytes());
    out.extend_from_slice(opening.c.as_bytes());
    out.extend_from_slice(opening.d.as_bytes());
    out.extend_from_slice(opening.e.as_bytes());
    out.extend_from_slice(opening.f.as_bytes());
    out
}

/// SHA-256 digest of a message's canonical encoding
pub fn message_digest(msg: &ConsensusMessage) -> Hash {
    Hash::digest(&encode_message(msg))
}

/// SHA-256 digest of an opening's canonical encoding
pub fn opening_digest(opening: &SecretOpening) -> Hash {
    Hash::digest(&encode_opening(opening))
}

// Property Tests - Randomized invariant checks
// Arithmetic exactness, percentage bounds and evidence refusal rules

#[cfg(test)]
mod property_tests {
    use crate::codec;
    use crate::config::SlashConfig;
    use crate::evidence::{self, EvidenceError};
    use crate::slasher::slash_amount;
    use crate::types::{ConsensusMessage, Hash, RecoverableSignature};
    use k256::ecdsa::SigningKey;
    use proptest::prelude::*;

    // Nonzero and below the curve order, so always a valid scalar
    fn signing_key(seed: u128) -> SigningKey {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&seed.max(1).to_be_bytes());
        SigningKey::from_slice(&bytes).unwrap()
    }

    fn sign(key: &SigningKey, msg: &ConsensusMessage) -> RecoverableSignature {
        let digest = codec::message_digest(msg);
        let (signature, recovery_id) = key.sign_prehash_recoverable(digest.as_bytes()).unwrap();
        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = recovery_id.to_byte();
        RecoverableSignature::from_bytes(bytes)
    }

    proptest! {
        #[test]
        fn prop_slash_amount_is_exact_floor(bond in any::<u64>(), percent in 0u64..=100) {
            // For bonds that fit u64 the widened product fits u128, so the
            // naive formula is computable and must agree with the split form.
            let bond = bond as u128;
            let expected = bond * percent as u128 / 100;
            prop_assert_eq!(slash_amount(bond, percent), expected);
        }

        #[test]
        fn prop_slash_amount_never_exceeds_bond(bond in any::<u128>(), percent in 0u64..=100) {
            prop_assert!(slash_amount(bond, percent) <= bond);
        }

        #[test]
        fn prop_full_percent_takes_everything(bond in any::<u128>()) {
            prop_assert_eq!(slash_amount(bond, 100), bond);
        }

        #[test]
        fn prop_config_accepts_percentages(percent in 0u64..=100) {
            let mut config = SlashConfig::new();
            prop_assert!(config.set_malicious_percent(percent).is_ok());
            prop_assert!(config.set_blacklist_percent(percent).is_ok());
            prop_assert!(config.set_secret_reveal_percent(percent).is_ok());
            prop_assert_eq!(config.malicious_percent(), percent);
        }

        #[test]
        fn prop_config_rejects_out_of_range(percent in 101u64..) {
            let mut config = SlashConfig::new();
            let before = config.malicious_percent();
            prop_assert!(config.set_malicious_percent(percent).is_err());
            prop_assert_eq!(config.malicious_percent(), before);
        }

        #[test]
        fn prop_identical_message_never_slashable(
            seed in 1u128..,
            height in any::<u64>(),
            round in any::<u64>(),
            block in any::<[u8; 32]>(),
        ) {
            // The same honest vote submitted twice is deduplication, not
            // equivocation, regardless of the coordinates.
            let key = signing_key(seed);
            let msg = ConsensusMessage::Prevote {
                height,
                round,
                block_hash: Hash::digest(&block),
            };
            let sig = sign(&key, &msg);
            let result = evidence::evaluate_equivocation(&msg, &sig, &msg, &sig);
            let refused = matches!(result, Err(EvidenceError::IdenticalMessage { .. }));
            prop_assert!(refused, "identical message was not refused: {:?}", result);
        }

        #[test]
        fn prop_conflicting_blocks_always_accepted(
            seed in 1u128..,
            height in any::<u64>(),
            round in any::<u64>(),
            block_a in any::<[u8; 32]>(),
            block_b in any::<[u8; 32]>(),
        ) {
            prop_assume!(block_a != block_b);
            let key = signing_key(seed);
            let msg_a = ConsensusMessage::Prevote {
                height,
                round,
                block_hash: Hash::digest(&block_a),
            };
            let msg_b = ConsensusMessage::Prevote {
                height,
                round,
                block_hash: Hash::digest(&block_b),
            };
            let accepted = evidence::evaluate_equivocation(
                &msg_a,
                &sign(&key, &msg_a),
                &msg_b,
                &sign(&key, &msg_b),
            );
            prop_assert!(accepted.is_ok());
            let accepted = accepted.unwrap();
            prop_assert_eq!(accepted.height, height);
            prop_assert_eq!(accepted.round, round);
        }

        #[test]
        fn prop_different_keys_never_equivocation(
            seed_a in 1u128..,
            seed_b in 1u128..,
            block_a in any::<[u8; 32]>(),
            block_b in any::<[u8; 32]>(),
        ) {
            prop_assume!(seed_a != seed_b);
            let key_a = signing_key(seed_a);
            let key_b = signing_key(seed_b);
            let msg_a = ConsensusMessage::Precommit {
                height: 1,
                round: 1,
                block_hash: Hash::digest(&block_a),
            };
            let msg_b = ConsensusMessage::Precommit {
                height: 1,
                round: 1,
                block_hash: Hash::digest(&block_b),
            };
            let result = evidence::evaluate_equivocation(
                &msg_a,
                &sign(&key_a, &msg_a),
                &msg_b,
                &sign(&key_b, &msg_b),
            );
            let refused = matches!(result, Err(EvidenceError::DifferentSigner { .. }));
            prop_assert!(refused, "signer mismatch was not refused: {:?}", result);
        }

        #[test]
        fn prop_encoding_is_field_sensitive(
            height in any::<u64>(),
            round in any::<u64>(),
            block in any::<[u8; 32]>(),
        ) {
            // Distinct kinds at the same coordinates never collide.
            let block_hash = Hash::digest(&block);
            let prevote = ConsensusMessage::Prevote { height, round, block_hash };
            let precommit = ConsensusMessage::Precommit { height, round, block_hash };
            prop_assert_ne!(
                codec::encode_message(&prevote),
                codec::encode_message(&precommit)
            );
        }
    }
}

// RecoverableSignature - ECDSA signature with recovery id
//
// Signer identity is never transmitted: it is recovered from the signature
// over the canonical message digest. The message kind lives inside the
// hashed payload (see codec), so a signature can never be replayed across
// message kinds.

use crate::types::identity::ValidatorIdentity;
use crate::types::primitives::Hash;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wrapper for recoverable secp256k1 signatures (65 bytes: r || s || v)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature(pub [u8; 65]);

impl RecoverableSignature {
    pub fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// Assemble from components; `v` may be 0/1 or the legacy 27/28
    pub fn from_parts(r: &[u8; 32], s: &[u8; 32], v: u8) -> Self {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(r);
        bytes[32..64].copy_from_slice(s);
        bytes[64] = v;
        Self(bytes)
    }

    /// Recover the signer identity from the message digest
    ///
    /// Deterministic, no side effects. Fails if r or s is out of range,
    /// the recovery id is invalid, or recovery does not resolve to a
    /// valid curve point.
    pub fn recover(&self, digest: &Hash) -> Result<ValidatorIdentity, SignatureError> {
        let signature = Signature::from_slice(&self.0[..64])
            .map_err(|_| SignatureError::InvalidSignature)?;

        let v = self.0[64];
        // Legacy encodings put the recovery id at 27/28
        let recovery_byte = match v {
            0 | 1 => v,
            27 | 28 => v - 27,
            _ => return Err(SignatureError::InvalidSignature),
        };
        let recovery_id =
            RecoveryId::from_byte(recovery_byte).ok_or(SignatureError::InvalidSignature)?;

        let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, recovery_id)
            .map_err(|_| SignatureError::InvalidSignature)?;

        Ok(ValidatorIdentity::from_public_key(&key))
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}..", hex::encode(&self.0[..8]))
    }
}

impl From<[u8; 65]> for RecoverableSignature {
    fn from(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for RecoverableSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Manual serialization: serde has no blanket impl for [u8; 65]
impl Serialize for RecoverableSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = <Vec<u8>>::deserialize(deserializer)?;
        if bytes.len() != 65 {
            return Err(serde::de::Error::custom("signature must be 65 bytes"));
        }
        let mut arr = [0u8; 65];
        arr.copy_from_slice(&bytes);
        Ok(RecoverableSignature(arr))
    }
}

/// Signature errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid signature")]
    InvalidSignature,
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    fn sign(key: &SigningKey, digest: &Hash) -> RecoverableSignature {
        let (signature, recovery_id) = key
            .sign_prehash_recoverable(digest.as_bytes())
            .expect("signing cannot fail on a 32-byte prehash");
        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = recovery_id.to_byte();
        RecoverableSignature(bytes)
    }

    #[test]
    fn test_recover_round_trip() {
        let key = SigningKey::random(&mut rand::rngs::OsRng);
        let expected = ValidatorIdentity::from_public_key(key.verifying_key());

        let digest = Hash::digest(b"some canonical message");
        let sig = sign(&key, &digest);

        assert_eq!(sig.recover(&digest).unwrap(), expected);
    }

    #[test]
    fn test_recover_accepts_legacy_v() {
        let key = SigningKey::random(&mut rand::rngs::OsRng);
        let expected = ValidatorIdentity::from_public_key(key.verifying_key());

        let digest = Hash::digest(b"legacy v encoding");
        let mut sig = sign(&key, &digest);
        sig.0[64] += 27;

        assert_eq!(sig.recover(&digest).unwrap(), expected);
    }

    #[test]
    fn test_recover_rejects_bad_recovery_id() {
        let key = SigningKey::random(&mut rand::rngs::OsRng);
        let digest = Hash::digest(b"bad recovery id");
        let mut sig = sign(&key, &digest);
        sig.0[64] = 5;

        assert_eq!(sig.recover(&digest), Err(SignatureError::InvalidSignature));
    }

    #[test]
    fn test_recover_rejects_out_of_range_scalars() {
        // r = 0 is out of range for a valid ECDSA signature
        let sig = RecoverableSignature::from_parts(&[0u8; 32], &[1u8; 32], 0);
        let digest = Hash::digest(b"zero r");
        assert_eq!(sig.recover(&digest), Err(SignatureError::InvalidSignature));
    }

    #[test]
    fn test_recover_different_digest_gives_different_signer() {
        let key = SigningKey::random(&mut rand::rngs::OsRng);
        let expected = ValidatorIdentity::from_public_key(key.verifying_key());

        let digest = Hash::digest(b"original");
        let sig = sign(&key, &digest);

        // Recovery over a different digest resolves to some other key
        let other = Hash::digest(b"tampered");
        match sig.recover(&other) {
            Ok(id) => assert_ne!(id, expected),
            Err(SignatureError::InvalidSignature) => {}
        }
    }

    #[test]
    fn test_serde_round_trip_length_check() {
        let sig = RecoverableSignature::from_parts(&[7u8; 32], &[9u8; 32], 1);
        assert_eq!(sig.as_bytes().len(), 65);
        assert_eq!(sig.as_bytes()[64], 1);
    }
}

// ValidatorIdentity - Address-like public identifier
// Principle: No identity, just keys; equality is byte-exact

use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

/// ValidatorIdentity = 20-byte address derived from a secp256k1 public key
///
/// The address is the last 20 bytes of the Keccak-256 digest of the
/// uncompressed public key (without the 0x04 prefix byte). Always derived
/// from signature recovery, never stored redundantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValidatorIdentity([u8; 20]);

impl ValidatorIdentity {
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let digest = Keccak256::digest(&point.as_bytes()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&digest[12..]);
        ValidatorIdentity(address)
    }

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        ValidatorIdentity(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for ValidatorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

impl From<[u8; 20]> for ValidatorIdentity {
    fn from(bytes: [u8; 20]) -> Self {
        ValidatorIdentity(bytes)
    }
}

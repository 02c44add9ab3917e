use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

use crate::error::TypeError;

/// Non-reversible token standing in for a voter's identity.
///
/// A `VoterHash` is never empty. The usual way to obtain one is
/// [`VoterHash::derive`], which hashes the voter's account id the same way
/// the vote-casting route does.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VoterHash(String);

impl VoterHash {
    /// Literal voter hash carried by the genesis block.
    pub const GENESIS: &'static str = "genesis";

    /// Wrap an existing token. Fails if `token` is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, TypeError> {
        let token = token.into();
        if token.is_empty() {
            return Err(TypeError::EmptyVoterHash);
        }
        Ok(Self(token))
    }

    /// Derive the token for a voter account id: lowercase hex SHA-256 of
    /// the id's decimal representation.
    pub fn derive(voter_id: u64) -> Self {
        let digest = Sha256::digest(voter_id.to_string().as_bytes());
        Self(hex::encode(digest))
    }

    /// A fresh random 256-bit token, hex-encoded.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self(hex::encode(bytes))
    }

    /// The fixed voter hash of the genesis block.
    pub fn genesis() -> Self {
        Self(Self::GENESIS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VoterHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "VoterHash({prefix})")
    }
}

impl fmt::Display for VoterHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VoterHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for VoterHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

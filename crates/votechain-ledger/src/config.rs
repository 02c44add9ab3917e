use serde::{Deserialize, Serialize};
use votechain_crypto::DigestAlgorithm;

/// What `append_submission` does with a missing or empty voter hash.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyVoterHashPolicy {
    /// Store a freshly generated random token instead.
    #[default]
    Substitute,
    /// Fail the append with [`LedgerError::EmptyVoterHash`](crate::LedgerError::EmptyVoterHash).
    Reject,
}

/// Configuration for a [`VoteLedger`](crate::VoteLedger).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Digest used for every block hash.
    pub algorithm: DigestAlgorithm,
    /// Handling of submissions without a voter hash.
    pub empty_voter_hash: EmptyVoterHashPolicy,
}

impl LedgerConfig {
    /// Configuration that refuses votes without a voter hash instead of
    /// making one up.
    pub fn strict() -> Self {
        Self {
            empty_voter_hash: EmptyVoterHashPolicy::Reject,
            ..Default::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

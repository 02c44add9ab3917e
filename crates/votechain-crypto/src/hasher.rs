use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use votechain_types::{BlockHash, Timestamp, VoteRecord};

/// Hash function used to digest canonical block content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256, the digest the election application has always stored.
    #[default]
    Sha256,
    /// BLAKE3 in its default 256-bit mode.
    Blake3,
}

impl DigestAlgorithm {
    /// Digest raw bytes.
    pub fn digest(&self, data: &[u8]) -> [u8; 32] {
        match self {
            Self::Sha256 => Sha256::digest(data).into(),
            Self::Blake3 => *blake3::hash(data).as_bytes(),
        }
    }
}

/// The hashed fields of a block: everything except the block's own hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockContent<'a> {
    pub index: u64,
    pub timestamp: Timestamp,
    pub vote: &'a VoteRecord,
    /// `None` for the genesis block.
    pub previous_hash: Option<&'a BlockHash>,
}

/// Deterministic block hasher.
///
/// Content is rendered into a fixed text encoding before hashing:
///
/// ```text
/// votechain-block-v1:{"index":1,"timestamp":1700000000000,"vote":{"candidateId":1,"electionId":10,"voterHash":"abc"},"previousHash":"<hex>"}
/// ```
///
/// Key order never changes, integers are plain base-10, strings are JSON
/// escaped, and the genesis block's missing predecessor is written as `"0"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockHasher {
    algorithm: DigestAlgorithm,
}

impl BlockHasher {
    /// Domain tag prepended to every encoding.
    pub const DOMAIN: &'static str = "votechain-block-v1";

    /// Literal written in place of the genesis block's predecessor hash.
    pub const GENESIS_PREVIOUS_HASH: &'static str = "0";

    pub const fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The exact bytes that get digested for `content`.
    pub fn canonical_bytes(content: &BlockContent<'_>) -> Vec<u8> {
        let vote = content.vote;
        let previous = content
            .previous_hash
            .map(BlockHash::to_hex)
            .unwrap_or_else(|| Self::GENESIS_PREVIOUS_HASH.to_string());

        format!(
            "{}:{{\"index\":{},\"timestamp\":{},\"vote\":{{\"candidateId\":{},\"electionId\":{},\"voterHash\":{}}},\"previousHash\":{}}}",
            Self::DOMAIN,
            content.index,
            content.timestamp.as_millis(),
            vote.candidate_id.0,
            vote.election_id.0,
            json_string(vote.voter_hash.as_str()),
            json_string(&previous),
        )
        .into_bytes()
    }

    /// Digest block content.
    pub fn hash(&self, content: &BlockContent<'_>) -> BlockHash {
        BlockHash::from_bytes(self.algorithm.digest(&Self::canonical_bytes(content)))
    }

    /// Returns `true` if `content` digests to `expected`.
    pub fn verify(&self, content: &BlockContent<'_>, expected: &BlockHash) -> bool {
        self.hash(content) == *expected
    }
}

fn json_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

use serde::{Deserialize, Serialize};
use votechain_crypto::{BlockContent, BlockHasher, ChainLink};
use votechain_types::{BlockHash, Timestamp, VoteRecord};

/// One immutable entry in the vote ledger.
///
/// Serializes as
/// `{"index","timestamp","vote":{...},"previousHash","hash"}` with hex
/// digests; the genesis block's `previousHash` is the literal `"0"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    pub timestamp: Timestamp,
    pub vote: VoteRecord,
    #[serde(with = "previous_hash_serde")]
    pub previous_hash: Option<BlockHash>,
    pub hash: BlockHash,
}

impl Block {
    /// Build a block and seal it with its content hash.
    pub(crate) fn seal(
        hasher: &BlockHasher,
        index: u64,
        timestamp: Timestamp,
        vote: VoteRecord,
        previous_hash: Option<BlockHash>,
    ) -> Self {
        let hash = hasher.hash(&BlockContent {
            index,
            timestamp,
            vote: &vote,
            previous_hash: previous_hash.as_ref(),
        });
        Self {
            index,
            timestamp,
            vote,
            previous_hash,
            hash,
        }
    }

    /// The hashed fields of this block.
    pub fn content(&self) -> BlockContent<'_> {
        BlockContent {
            index: self.index,
            timestamp: self.timestamp,
            vote: &self.vote,
            previous_hash: self.previous_hash.as_ref(),
        }
    }

    /// Hex form of the previous hash, `"0"` for genesis.
    pub fn previous_hash_hex(&self) -> String {
        self.previous_hash
            .map(|h| h.to_hex())
            .unwrap_or_else(|| BlockHasher::GENESIS_PREVIOUS_HASH.to_string())
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash.is_none()
    }
}

impl ChainLink for Block {
    fn link_hash(&self) -> BlockHash {
        self.hash
    }

    fn prev_link(&self) -> Option<BlockHash> {
        self.previous_hash
    }

    fn content(&self) -> BlockContent<'_> {
        Block::content(self)
    }
}

mod previous_hash_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use votechain_crypto::BlockHasher;
    use votechain_types::BlockHash;

    pub fn serialize<S>(hash: &Option<BlockHash>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match hash {
            Some(h) => serializer.serialize_str(&h.to_hex()),
            None => serializer.serialize_str(BlockHasher::GENESIS_PREVIOUS_HASH),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BlockHash>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == BlockHasher::GENESIS_PREVIOUS_HASH {
            return Ok(None);
        }
        BlockHash::from_hex(&s)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

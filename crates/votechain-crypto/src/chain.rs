use votechain_types::BlockHash;

use crate::hasher::{BlockContent, BlockHasher};

/// Trait for records that participate in a hash chain.
pub trait ChainLink {
    /// The record's stored hash.
    fn link_hash(&self) -> BlockHash;
    /// The stored hash of the previous record (None for genesis).
    fn prev_link(&self) -> Option<BlockHash>;
    /// The hashed content of the record.
    fn content(&self) -> BlockContent<'_>;
}

/// Hash chain integrity verifier.
///
/// Verifies that a sequence of records forms a valid hash chain: each
/// record's previous hash matches the prior record's stored hash, and each
/// record's stored hash is correctly computed from its content.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain of records.
    ///
    /// Checks:
    /// 1. First record has no previous hash
    /// 2. Each subsequent record's previous hash matches the prior stored hash
    /// 3. Each record's hash is correct for its content
    pub fn verify_chain<L: ChainLink>(hasher: &BlockHasher, links: &[L]) -> Result<(), ChainError> {
        let Some(first) = links.first() else {
            return Ok(());
        };

        if first.prev_link().is_some() {
            return Err(ChainError::GenesisHasPrevHash);
        }
        if !hasher.verify(&first.content(), &first.link_hash()) {
            return Err(ChainError::HashMismatch { position: 0 });
        }

        for (position, pair) in links.windows(2).enumerate() {
            let position = position + 1;
            let (prev, current) = (&pair[0], &pair[1]);
            match current.prev_link() {
                Some(link) if link == prev.link_hash() => {}
                Some(_) => return Err(ChainError::BrokenLink { position }),
                None => return Err(ChainError::MissingPrevHash { position }),
            }

            if !hasher.verify(&current.content(), &current.link_hash()) {
                return Err(ChainError::HashMismatch { position });
            }
        }

        Ok(())
    }
}

/// Errors from chain verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("genesis record has a previous hash (should be None)")]
    GenesisHasPrevHash,

    #[error("broken link at position {position}: previous hash does not match")]
    BrokenLink { position: usize },

    #[error("missing previous hash at position {position} (should reference prior record)")]
    MissingPrevHash { position: usize },

    #[error("hash mismatch at position {position}: computed hash differs from stored")]
    HashMismatch { position: usize },
}

impl ChainError {
    /// Chain position of the failing record.
    pub fn position(&self) -> usize {
        match self {
            Self::GenesisHasPrevHash => 0,
            Self::BrokenLink { position }
            | Self::MissingPrevHash { position }
            | Self::HashMismatch { position } => *position,
        }
    }
}

use votechain_crypto::BlockHasher;
use votechain_types::{BlockHash, ElectionId, VoteRecord, VoteSubmission};

use crate::block::Block;
use crate::error::LedgerError;

/// Write boundary for vote ledger append operations.
pub trait LedgerWriter: Send + Sync {
    /// Append an already validated vote.
    ///
    /// Fails with [`LedgerError::ReservedElectionId`] for election `0`, which
    /// only the genesis block may carry.
    fn append(&self, vote: VoteRecord) -> Result<Block, LedgerError>;

    /// Append a raw submission, applying the configured voter-hash policy.
    fn append_submission(&self, submission: VoteSubmission) -> Result<Block, LedgerError>;
}

/// Read boundary for vote ledger queries and audits.
pub trait LedgerReader: Send + Sync {
    /// The hasher every block in this ledger was sealed with.
    fn hasher(&self) -> BlockHasher;

    /// The most recently appended block (genesis for a fresh ledger).
    fn head(&self) -> Result<Block, LedgerError>;

    /// Number of blocks, genesis included.
    fn block_count(&self) -> Result<u64, LedgerError>;

    /// Snapshot of the whole chain in order.
    fn blocks(&self) -> Result<Vec<Block>, LedgerError>;

    fn block_at(&self, index: u64) -> Result<Option<Block>, LedgerError>;

    /// Resolve a digest stored by the vote store back to its block.
    fn block_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>, LedgerError>;

    /// Blocks recording votes in `election`, in chain order. Never includes
    /// the genesis block.
    fn blocks_for_election(&self, election: ElectionId) -> Result<Vec<Block>, LedgerError>;
}

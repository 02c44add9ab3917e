use std::collections::{BTreeMap, BTreeSet};

use votechain_types::{BlockHash, CandidateId, ElectionId, Timestamp, VoterHash};

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Vote counts for one election, reconstructed from the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElectionTally {
    pub election: ElectionId,
    pub total_votes: u64,
    pub distinct_voters: u64,
    pub by_candidate: BTreeMap<CandidateId, u64>,
    pub first_block: Option<u64>,
    pub last_block: Option<u64>,
}

impl ElectionTally {
    /// Candidate with the most votes; ties go to the lowest id.
    pub fn leader(&self) -> Option<(CandidateId, u64)> {
        self.by_candidate
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(c, n)| (*c, *n))
    }
}

/// Row in the audit index: the ledger side of one vote row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditIndexEntry {
    pub index: u64,
    pub block_hash: BlockHash,
    pub timestamp: Timestamp,
    pub candidate: CandidateId,
    pub voter_hash: VoterHash,
}

/// Every block of an election in chain order, keyed for cross-checking
/// against the `blockHash` column of stored votes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditIndexProjection {
    pub election: ElectionId,
    pub entries: Vec<AuditIndexEntry>,
}

impl AuditIndexProjection {
    pub fn find(&self, block_hash: &BlockHash) -> Option<&AuditIndexEntry> {
        self.entries.iter().find(|e| e.block_hash == *block_hash)
    }
}

/// Deterministic projection builders.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn tally<R: LedgerReader>(
        reader: &R,
        election: ElectionId,
    ) -> Result<ElectionTally, LedgerError> {
        let blocks = reader.blocks_for_election(election)?;
        let mut by_candidate = BTreeMap::new();
        let mut voters = BTreeSet::new();

        for block in &blocks {
            *by_candidate.entry(block.vote.candidate_id).or_insert(0u64) += 1;
            voters.insert(block.vote.voter_hash.clone());
        }

        Ok(ElectionTally {
            election,
            total_votes: blocks.len() as u64,
            distinct_voters: voters.len() as u64,
            by_candidate,
            first_block: blocks.first().map(|b| b.index),
            last_block: blocks.last().map(|b| b.index),
        })
    }

    pub fn audit_index<R: LedgerReader>(
        reader: &R,
        election: ElectionId,
    ) -> Result<AuditIndexProjection, LedgerError> {
        let entries = reader
            .blocks_for_election(election)?
            .into_iter()
            .map(|block| AuditIndexEntry {
                index: block.index,
                block_hash: block.hash,
                timestamp: block.timestamp,
                candidate: block.vote.candidate_id,
                voter_hash: block.vote.voter_hash,
            })
            .collect();

        Ok(AuditIndexProjection { election, entries })
    }
}

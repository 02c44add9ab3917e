use votechain_types::VoteRecord;

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Result of a full-chain audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditReport {
    pub block_count: u64,
    pub hash_chain_valid: bool,
    pub sequence_contiguous: bool,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Index of the earliest failing block, if any.
    pub fn first_violation(&self) -> Option<u64> {
        self.violations.iter().map(|v| v.position).min()
    }
}

/// A specific integrity violation detected during an audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Position of the block in the chain.
    pub position: u64,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    SequenceGap,
    HashChainBreak,
    HashMismatch,
    MalformedGenesis,
}

/// Full-scan chain auditor.
///
/// Unlike `VoteLedger::verify`, which stops at the first failure and only
/// answers yes or no, the auditor visits every block and records every
/// violation it finds.
pub struct ChainAuditor;

impl ChainAuditor {
    pub fn audit<R: LedgerReader>(reader: &R) -> Result<AuditReport, LedgerError> {
        let hasher = reader.hasher();
        let blocks = reader.blocks()?;
        let mut violations = Vec::new();
        let mut hash_chain_valid = true;
        let mut sequence_contiguous = true;

        for (position, block) in blocks.iter().enumerate() {
            let position = position as u64;

            if block.index != position {
                sequence_contiguous = false;
                violations.push(Violation {
                    position,
                    kind: ViolationKind::SequenceGap,
                    description: format!("expected index {position}, got {}", block.index),
                });
            }

            if position == 0 {
                if block.previous_hash.is_some() || block.vote != VoteRecord::genesis() {
                    violations.push(Violation {
                        position,
                        kind: ViolationKind::MalformedGenesis,
                        description: "genesis block does not carry the genesis vote and \"0\" predecessor".into(),
                    });
                }
            } else {
                let expected_prev = blocks[position as usize - 1].hash;
                if block.previous_hash != Some(expected_prev) {
                    hash_chain_valid = false;
                    violations.push(Violation {
                        position,
                        kind: ViolationKind::HashChainBreak,
                        description: format!(
                            "previous hash {} does not match block {} hash {}",
                            block.previous_hash_hex(),
                            position - 1,
                            expected_prev
                        ),
                    });
                }
            }

            if !hasher.verify(&block.content(), &block.hash) {
                hash_chain_valid = false;
                violations.push(Violation {
                    position,
                    kind: ViolationKind::HashMismatch,
                    description: "block hash does not match computed".into(),
                });
            }
        }

        Ok(AuditReport {
            block_count: blocks.len() as u64,
            hash_chain_valid,
            sequence_contiguous,
            violations,
        })
    }
}

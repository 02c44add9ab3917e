use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};
use votechain_crypto::{BlockHasher, HashChainVerifier};
use votechain_types::{BlockHash, ElectionId, Timestamp, VoteRecord, VoteSubmission, VoterHash};

use crate::block::Block;
use crate::config::{EmptyVoterHashPolicy, LedgerConfig};
use crate::error::LedgerError;
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory vote ledger.
///
/// Constructed once per process and shared by reference (or `Arc`) with the
/// vote store. The chain always holds at least the genesis block and is only
/// ever extended through [`LedgerWriter`]; readers receive clones.
pub struct VoteLedger {
    config: LedgerConfig,
    hasher: BlockHasher,
    inner: RwLock<LedgerState>,
}

struct LedgerState {
    chain: Vec<Block>,
    hash_index: HashMap<BlockHash, usize>,
}

impl LedgerState {
    fn tail(&self) -> &Block {
        // The chain is seeded with genesis and never shrinks.
        &self.chain[self.chain.len() - 1]
    }

    fn push(&mut self, block: Block) {
        self.hash_index.insert(block.hash, self.chain.len());
        self.chain.push(block);
    }
}

impl VoteLedger {
    /// Create a ledger with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create a ledger and seal its genesis block.
    pub fn with_config(config: LedgerConfig) -> Self {
        let hasher = BlockHasher::new(config.algorithm);
        let genesis = Block::seal(&hasher, 0, Timestamp::now(), VoteRecord::genesis(), None);
        info!(
            algorithm = ?config.algorithm,
            genesis = %genesis.hash,
            "vote ledger initialized"
        );

        let mut state = LedgerState {
            chain: Vec::new(),
            hash_index: HashMap::new(),
        };
        state.push(genesis);

        Self {
            config,
            hasher,
            inner: RwLock::new(state),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Check every block's hash and its link to the predecessor.
    ///
    /// Returns `true` only if the whole chain is intact. Corruption is
    /// reported as `false`, never as an error or panic.
    pub fn verify(&self) -> bool {
        match self.first_violation() {
            Ok(first) => first.is_none(),
            Err(e) => {
                warn!(error = %e, "chain verification could not read the ledger");
                false
            }
        }
    }

    /// Index of the first block failing hash or link verification.
    ///
    /// Fails only if the ledger lock is poisoned.
    pub fn first_violation(&self) -> Result<Option<u64>, LedgerError> {
        let state = self.read_state()?;
        match HashChainVerifier::verify_chain(&self.hasher, &state.chain) {
            Ok(()) => Ok(None),
            Err(e) => {
                warn!(error = %e, blocks = state.chain.len(), "vote ledger failed verification");
                Ok(Some(e.position() as u64))
            }
        }
    }

    fn resolve_voter_hash(&self, raw: Option<String>) -> Result<VoterHash, LedgerError> {
        match raw.filter(|s| !s.is_empty()) {
            Some(token) => VoterHash::new(token).map_err(|_| LedgerError::EmptyVoterHash),
            None => match self.config.empty_voter_hash {
                EmptyVoterHashPolicy::Reject => Err(LedgerError::EmptyVoterHash),
                EmptyVoterHashPolicy::Substitute => {
                    warn!("vote submitted without voter hash; substituting a random token");
                    Ok(VoterHash::random())
                }
            },
        }
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("write"))
    }
}

impl Default for VoteLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerWriter for VoteLedger {
    /// Seal `vote` onto the tail of the chain.
    ///
    /// Votes for election `0` are refused with
    /// [`LedgerError::ReservedElectionId`]; that id belongs to the genesis
    /// block. No other field of the vote is validated.
    fn append(&self, vote: VoteRecord) -> Result<Block, LedgerError> {
        if vote.election_id.is_genesis() {
            return Err(LedgerError::ReservedElectionId);
        }

        // Tail read, sealing and push happen under one write guard so two
        // appends can never build on the same tail.
        let mut state = self.write_state()?;
        let tail = state.tail();
        let index = tail
            .index
            .checked_add(1)
            .ok_or(LedgerError::IndexOverflow(tail.index))?;
        let timestamp = Timestamp::now_not_before(tail.timestamp);
        let block = Block::seal(&self.hasher, index, timestamp, vote, Some(tail.hash));

        state.push(block.clone());
        debug!(
            index = block.index,
            election = %block.vote.election_id,
            hash = %block.hash,
            "vote appended to ledger"
        );
        Ok(block)
    }

    fn append_submission(&self, submission: VoteSubmission) -> Result<Block, LedgerError> {
        let voter_hash = self.resolve_voter_hash(submission.voter_hash)?;
        self.append(VoteRecord::new(
            submission.candidate_id,
            submission.election_id,
            voter_hash,
        ))
    }
}

impl LedgerReader for VoteLedger {
    fn hasher(&self) -> BlockHasher {
        self.hasher
    }

    fn head(&self) -> Result<Block, LedgerError> {
        Ok(self.read_state()?.tail().clone())
    }

    fn block_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.chain.len() as u64)
    }

    fn blocks(&self) -> Result<Vec<Block>, LedgerError> {
        Ok(self.read_state()?.chain.clone())
    }

    fn block_at(&self, index: u64) -> Result<Option<Block>, LedgerError> {
        let state = self.read_state()?;
        Ok(usize::try_from(index)
            .ok()
            .and_then(|i| state.chain.get(i))
            .cloned())
    }

    fn block_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .hash_index
            .get(hash)
            .and_then(|&i| state.chain.get(i))
            .cloned())
    }

    fn blocks_for_election(&self, election: ElectionId) -> Result<Vec<Block>, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .chain
            .iter()
            .skip(1)
            .filter(|block| block.vote.election_id == election)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use votechain_crypto::DigestAlgorithm;
    use votechain_types::CandidateId;

    use super::*;

    fn vote(candidate: u64, election: u64, voter: &str) -> VoteRecord {
        VoteRecord::new(
            CandidateId(candidate),
            ElectionId(election),
            VoterHash::new(voter).unwrap(),
        )
    }

    fn tamper(ledger: &VoteLedger, f: impl FnOnce(&mut Vec<Block>)) {
        let mut guard = ledger.inner.write().unwrap();
        f(&mut guard.chain);
    }

    #[test]
    fn fresh_ledger_holds_verified_genesis() {
        let ledger = VoteLedger::new();
        assert_eq!(ledger.block_count().unwrap(), 1);
        assert!(ledger.verify());

        let genesis = ledger.head().unwrap();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, None);
        assert_eq!(genesis.previous_hash_hex(), "0");
        assert_eq!(genesis.vote.voter_hash.as_str(), "genesis");
        assert!(ledger.hasher().verify(&genesis.content(), &genesis.hash));
    }

    #[test]
    fn append_extends_chain_with_contiguous_links() {
        let ledger = VoteLedger::new();
        for i in 0..5 {
            ledger.append(vote(i, 1, &format!("voter-{i}"))).unwrap();
        }

        let chain = ledger.blocks().unwrap();
        assert_eq!(chain.len(), 6);
        for pair in chain.windows(2) {
            assert_eq!(pair[1].index, pair[0].index + 1);
            assert_eq!(pair[1].previous_hash, Some(pair[0].hash));
            assert!(pair[1].timestamp >= pair[0].timestamp);
        }
        assert!(ledger.verify());
    }

    #[test]
    fn voting_scenario() {
        let ledger = VoteLedger::new();
        assert!(ledger.verify());
        let genesis = ledger.head().unwrap();

        let first = ledger.append(vote(1, 10, "abc")).unwrap();
        assert_eq!(first.index, 1);
        assert_eq!(first.previous_hash, Some(genesis.hash));

        let second = ledger.append(vote(2, 10, "def")).unwrap();
        ledger.append(vote(1, 11, "ghi")).unwrap();

        let election = ledger.blocks_for_election(ElectionId(10)).unwrap();
        assert_eq!(election, vec![first, second]);

        tamper(&ledger, |chain| chain[1].vote.candidate_id = CandidateId(2));
        assert!(!ledger.verify());
        assert_eq!(ledger.first_violation().unwrap(), Some(1));
    }

    #[test]
    fn genesis_tampering_is_detected() {
        let ledger = VoteLedger::new();
        ledger.append(vote(1, 10, "abc")).unwrap();
        tamper(&ledger, |chain| chain[0].vote.voter_hash = VoterHash::new("forged").unwrap());
        assert_eq!(ledger.first_violation().unwrap(), Some(0));
    }

    #[test]
    fn relinking_a_rehashed_block_breaks_the_successor() {
        let ledger = VoteLedger::new();
        ledger.append(vote(1, 10, "a")).unwrap();
        ledger.append(vote(1, 10, "b")).unwrap();

        let hasher = ledger.hasher();
        tamper(&ledger, |chain| {
            chain[1].vote.candidate_id = CandidateId(9);
            chain[1].hash = hasher.hash(&chain[1].content());
        });
        assert_eq!(ledger.first_violation().unwrap(), Some(2));
    }

    #[test]
    fn returned_blocks_are_detached_copies() {
        let ledger = VoteLedger::new();
        let mut block = ledger.append(vote(1, 10, "abc")).unwrap();
        block.vote.candidate_id = CandidateId(99);
        assert!(ledger.verify());
        assert_eq!(ledger.block_at(1).unwrap().unwrap().vote.candidate_id, CandidateId(1));
    }

    #[test]
    fn election_filter_excludes_genesis() {
        let ledger = VoteLedger::new();
        ledger.append(vote(1, 10, "abc")).unwrap();
        assert!(ledger.blocks_for_election(ElectionId::GENESIS).unwrap().is_empty());
        assert!(ledger.blocks_for_election(ElectionId(99)).unwrap().is_empty());
    }

    #[test]
    fn reserved_election_id_is_rejected() {
        let ledger = VoteLedger::new();
        let err = ledger.append(vote(1, 0, "abc")).unwrap_err();
        assert_eq!(err, LedgerError::ReservedElectionId);
        assert_eq!(ledger.block_count().unwrap(), 1);
    }

    #[test]
    fn empty_voter_hash_rejected_in_strict_mode() {
        let ledger = VoteLedger::with_config(LedgerConfig::strict());
        for voter_hash in [None, Some(String::new())] {
            let err = ledger
                .append_submission(VoteSubmission {
                    candidate_id: CandidateId(1),
                    election_id: ElectionId(10),
                    voter_hash,
                })
                .unwrap_err();
            assert_eq!(err, LedgerError::EmptyVoterHash);
        }
        assert_eq!(ledger.block_count().unwrap(), 1);
    }

    #[test]
    fn empty_voter_hash_substituted_by_default() {
        let ledger = VoteLedger::new();
        let a = ledger
            .append_submission(VoteSubmission {
                candidate_id: CandidateId(1),
                election_id: ElectionId(10),
                voter_hash: None,
            })
            .unwrap();
        let b = ledger
            .append_submission(VoteSubmission {
                candidate_id: CandidateId(1),
                election_id: ElectionId(10),
                voter_hash: Some(String::new()),
            })
            .unwrap();
        assert!(!a.vote.voter_hash.as_str().is_empty());
        assert_ne!(a.vote.voter_hash, b.vote.voter_hash);
        assert_eq!(ledger.block_count().unwrap(), 3);
        assert!(ledger.verify());
    }

    #[test]
    fn submission_with_voter_hash_is_kept_verbatim() {
        let ledger = VoteLedger::with_config(LedgerConfig::strict());
        let voter = VoterHash::derive(7);
        let block = ledger
            .append_submission(VoteSubmission {
                candidate_id: CandidateId(3),
                election_id: ElectionId(4),
                voter_hash: Some(voter.to_string()),
            })
            .unwrap();
        assert_eq!(block.vote.voter_hash, voter);
    }

    #[test]
    fn poisoned_lock_is_reported_as_error() {
        let ledger = Arc::new(VoteLedger::new());
        let poisoner = Arc::clone(&ledger);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the ledger lock");
        })
        .join();

        assert_eq!(
            ledger.first_violation().unwrap_err(),
            LedgerError::LockPoisoned("read")
        );
        assert!(!ledger.verify());
    }

    #[test]
    fn block_by_hash_resolves_stored_digest() {
        let ledger = VoteLedger::new();
        let block = ledger.append(vote(1, 10, "abc")).unwrap();
        let stored = block.hash.to_hex();

        let digest: BlockHash = stored.parse().unwrap();
        assert_eq!(ledger.block_by_hash(&digest).unwrap(), Some(block));
        assert_eq!(
            ledger.block_by_hash(&BlockHash::from_bytes([0; 32])).unwrap(),
            None
        );
    }

    #[test]
    fn block_at_out_of_range_is_none() {
        let ledger = VoteLedger::new();
        assert!(ledger.block_at(0).unwrap().is_some());
        assert!(ledger.block_at(1).unwrap().is_none());
        assert!(ledger.block_at(u64::MAX).unwrap().is_none());
    }

    #[test]
    fn blake3_ledger_verifies() {
        let ledger =
            VoteLedger::with_config(LedgerConfig::default().with_algorithm(DigestAlgorithm::Blake3));
        ledger.append(vote(1, 10, "abc")).unwrap();
        assert!(ledger.verify());
        assert_eq!(ledger.hasher().algorithm(), DigestAlgorithm::Blake3);
    }

    #[test]
    fn separate_instances_are_isolated() {
        let a = VoteLedger::new();
        let b = VoteLedger::new();
        a.append(vote(1, 10, "abc")).unwrap();
        assert_eq!(a.block_count().unwrap(), 2);
        assert_eq!(b.block_count().unwrap(), 1);
    }

    #[test]
    fn concurrent_appends_never_share_a_tail() {
        let ledger = Arc::new(VoteLedger::new());
        std::thread::scope(|scope| {
            for t in 0..8u64 {
                let ledger = Arc::clone(&ledger);
                scope.spawn(move || {
                    for i in 0..50u64 {
                        ledger.append(vote(t, 1 + t, &format!("{t}-{i}"))).unwrap();
                    }
                });
            }
        });

        let chain = ledger.blocks().unwrap();
        assert_eq!(chain.len(), 401);
        for (position, block) in chain.iter().enumerate() {
            assert_eq!(block.index, position as u64);
        }
        assert!(ledger.verify());
    }

    #[derive(Debug, Clone, Copy)]
    enum Field {
        Index,
        Timestamp,
        Candidate,
        Election,
        Voter,
        Previous,
    }

    fn field() -> impl Strategy<Value = Field> {
        prop_oneof![
            Just(Field::Index),
            Just(Field::Timestamp),
            Just(Field::Candidate),
            Just(Field::Election),
            Just(Field::Voter),
            Just(Field::Previous),
        ]
    }

    proptest! {
        #[test]
        fn any_field_mutation_fails_verification(
            appends in 1usize..12,
            target in any::<prop::sample::Index>(),
            field in field(),
        ) {
            let ledger = VoteLedger::new();
            for i in 0..appends {
                ledger.append(vote(i as u64, 1 + (i as u64 % 3), &format!("v{i}"))).unwrap();
            }
            prop_assert!(ledger.verify());

            let at = target.index(appends + 1);
            tamper(&ledger, |chain| {
                let block = &mut chain[at];
                match field {
                    Field::Index => block.index += 1,
                    Field::Timestamp => {
                        block.timestamp = Timestamp::from_millis(block.timestamp.as_millis() + 1)
                    }
                    Field::Candidate => block.vote.candidate_id.0 += 1,
                    Field::Election => block.vote.election_id.0 += 1,
                    Field::Voter => {
                        block.vote.voter_hash =
                            VoterHash::new(format!("{}x", block.vote.voter_hash)).unwrap()
                    }
                    Field::Previous => {
                        block.previous_hash = match block.previous_hash {
                            Some(_) => None,
                            None => Some(BlockHash::from_bytes([1; 32])),
                        }
                    }
                }
            });
            prop_assert!(!ledger.verify());
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::voter::VoterHash;

/// Identifier of an election.
///
/// Id `0` is reserved for the genesis block; real elections start at 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectionId(pub u64);

impl ElectionId {
    /// The election id carried by the genesis block.
    pub const GENESIS: Self = Self(0);

    pub fn is_genesis(&self) -> bool {
        *self == Self::GENESIS
    }
}

impl fmt::Debug for ElectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElectionId({})", self.0)
    }
}

impl fmt::Display for ElectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a candidate within an election.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl fmt::Debug for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CandidateId({})", self.0)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The vote embedded in a ledger block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub candidate_id: CandidateId,
    pub election_id: ElectionId,
    pub voter_hash: VoterHash,
}

impl VoteRecord {
    pub fn new(candidate_id: CandidateId, election_id: ElectionId, voter_hash: VoterHash) -> Self {
        Self {
            candidate_id,
            election_id,
            voter_hash,
        }
    }

    /// The vote carried by the genesis block.
    pub fn genesis() -> Self {
        Self {
            candidate_id: CandidateId(0),
            election_id: ElectionId::GENESIS,
            voter_hash: VoterHash::genesis(),
        }
    }
}

/// A vote as handed over by the vote-casting collaborator.
///
/// The voter hash may be missing or empty; what happens then is a ledger
/// policy decision, so this type does not validate it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSubmission {
    pub candidate_id: CandidateId,
    pub election_id: ElectionId,
    #[serde(default)]
    pub voter_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_camel_case_keys() {
        let record = VoteRecord::new(CandidateId(1), ElectionId(10), VoterHash::new("abc").unwrap());
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"candidateId":1,"electionId":10,"voterHash":"abc"}"#
        );
    }

    #[test]
    fn genesis_vote_fields() {
        let genesis = VoteRecord::genesis();
        assert!(genesis.election_id.is_genesis());
        assert_eq!(genesis.candidate_id, CandidateId(0));
        assert_eq!(genesis.voter_hash.as_str(), "genesis");
    }

    #[test]
    fn submission_accepts_null_voter_hash() {
        let submission: VoteSubmission =
            serde_json::from_str(r#"{"candidateId":2,"electionId":3,"voterHash":null}"#).unwrap();
        assert_eq!(submission.voter_hash, None);
        assert_eq!(submission.election_id, ElectionId(3));
    }

    #[test]
    fn submission_accepts_missing_voter_hash() {
        let submission: VoteSubmission =
            serde_json::from_str(r#"{"candidateId":2,"electionId":3}"#).unwrap();
        assert_eq!(submission.voter_hash, None);
    }
}

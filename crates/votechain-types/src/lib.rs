//! Foundation types for the Votechain vote ledger.
//!
//! This crate provides the identifiers, digests, and vote records shared by
//! the hasher and the ledger. Every other Votechain crate depends on
//! `votechain-types`.
//!
//! # Key Types
//!
//! - [`ElectionId`] / [`CandidateId`] - Typed integer identifiers
//! - [`VoterHash`] - One-way token standing in for a voter's identity
//! - [`BlockHash`] - 256-bit block digest, rendered as lowercase hex
//! - [`Timestamp`] - Millisecond wall-clock instant
//! - [`VoteRecord`] - The vote embedded in every ledger block
//! - [`VoteSubmission`] - The caller's raw input, with an optional voter hash

pub mod digest;
pub mod error;
pub mod temporal;
pub mod vote;
pub mod voter;

pub use digest::BlockHash;
pub use error::TypeError;
pub use temporal::Timestamp;
pub use vote::{CandidateId, ElectionId, VoteRecord, VoteSubmission};
pub use voter::VoterHash;

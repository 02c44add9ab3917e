//! Append-only vote ledger for Votechain.
//!
//! Every cast vote becomes a block whose hash covers its content and the
//! previous block's hash, so any later edit to a stored vote is detectable.
//! This crate provides:
//! - The [`Block`] record and its JSON shape
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - [`VoteLedger`], the in-memory, lock-guarded implementation
//! - [`ChainAuditor`] for full-scan integrity reports
//! - Projection builders (election tally, audit index)

pub mod block;
pub mod config;
pub mod error;
pub mod memory;
pub mod projection;
pub mod traits;
pub mod validation;

pub use block::Block;
pub use config::{EmptyVoterHashPolicy, LedgerConfig};
pub use error::LedgerError;
pub use memory::VoteLedger;
pub use projection::{AuditIndexEntry, AuditIndexProjection, ElectionTally, ProjectionBuilder};
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{AuditReport, ChainAuditor, Violation, ViolationKind};

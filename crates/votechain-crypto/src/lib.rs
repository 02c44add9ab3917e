//! Cryptographic primitives for the Votechain vote ledger.
//!
//! Provides the block hasher (a pinned canonical encoding of block content
//! fed to SHA-256 or BLAKE3) and a generic hash-chain verifier.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod chain;
pub mod hasher;

pub use chain::{ChainError, ChainLink, HashChainVerifier};
pub use hasher::{BlockContent, BlockHasher, DigestAlgorithm};

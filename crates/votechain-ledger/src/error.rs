/// Errors produced by ledger operations.
///
/// Chain corruption is never reported through this type; `verify()` and the
/// auditor report it as data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("voter hash is missing or empty")]
    EmptyVoterHash,

    #[error("election id 0 is reserved for the genesis block")]
    ReservedElectionId,

    #[error("block index overflow after index {0}")]
    IndexOverflow(u64),

    #[error("ledger {0} lock poisoned")]
    LockPoisoned(&'static str),
}

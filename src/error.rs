use crate::address::AddressError;
use crate::codec::CodecError;
use crate::value::ValueError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("address not found on ledger: {0}")]
    AddressNotFound(String),
    #[error("ledger service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("ledger returned an unusable record: {0}")]
    InvalidRecord(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidOutputReason {
    #[error("invalid address {address:?}: {source}")]
    Address {
        address: String,
        source: AddressError,
    },
    #[error("amount must be positive")]
    ZeroAmount,
    #[error("amount {amount} is below the minimum output of {minimum}")]
    BelowMinimum { amount: u64, minimum: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid output for recipient #{index}: {reason}")]
    InvalidOutput {
        index: usize,
        reason: InvalidOutputReason,
    },
    #[error("no recipients provided")]
    NoRecipients,
    #[error("insufficient funds: available {available}, target {target}")]
    InsufficientFunds { available: u64, target: u64 },
    #[error("negative change: selected {selected}, spent {spent}, fee {fee}")]
    NegativeChange { selected: u64, spent: u64, fee: u64 },
    #[error("transaction does not conserve value: {0}")]
    ConservationViolated(String),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
    #[error("encoded transaction does not decode to the assembled one: {0}")]
    EncodingIntegrity(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

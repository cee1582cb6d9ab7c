use connectors::error::ChainError;
use thiserror::Error;

/// The collection could not be discovered.
///
/// Every cause (no contract at the address, missing `name()` or `Transfer`
/// interface, provider failure) reads the same to the user; the cause
/// is kept as the error source.
#[derive(Debug, Error)]
#[error("invalid contract address")]
pub struct ResolutionError {
    pub contract: String,
    #[source]
    pub source: ChainError,
}

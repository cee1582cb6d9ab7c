use thiserror::Error;

/// Failures talking to the chain provider.
#[derive(Debug, Error)]
pub enum ChainError {
    /// HTTP transport failure (DNS, TLS, timeout, non-JSON body).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// `eth_call` returned no data, i.e. the address holds no contract
    /// or the contract does not implement the called function.
    #[error("Call returned no data")]
    EmptyReturnData,
}

/// Failure of a single metadata refresh request.
#[derive(Debug, Error)]
pub enum RefreshRequestError {
    #[error("Indexer responded with status {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

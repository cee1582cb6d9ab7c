use engine_runtime::error::ResolutionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No chain endpoint configured: set RPC_URL or ALCHEMY_API_KEY, or pass --rpc-url")]
    MissingRpcEndpoint,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to resolve collection: {0}")]
    Resolution(#[from] ResolutionError),

    /// The event renderer has already shown this failure to the user.
    #[error("Refresh aborted: {0}")]
    RefreshAborted(#[source] ResolutionError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Event renderer task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

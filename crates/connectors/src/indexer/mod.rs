use crate::error::RefreshRequestError;
use async_trait::async_trait;
use model::core::token_id::TokenId;

pub mod opensea;

/// A marketplace indexer that can be asked to re-fetch token metadata.
#[async_trait]
pub trait MetadataIndexer: Send + Sync {
    /// Requests a metadata refresh for one token.
    /// `Ok` only when the indexer accepted the request.
    async fn refresh(&self, contract: &str, token_id: &TokenId) -> Result<(), RefreshRequestError>;
}

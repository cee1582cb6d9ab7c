use crate::error::ChainError;
use async_trait::async_trait;
use model::core::token_id::TokenId;

pub mod abi;
pub mod rpc;

/// Read access to an EVM chain, limited to what collection discovery needs.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Token ids of every `Transfer` from the zero address emitted by
    /// `contract`, over its whole history, in emission order.
    async fn mint_token_ids(&self, contract: &str) -> Result<Vec<TokenId>, ChainError>;

    /// Result of the contract's `name()` view.
    async fn contract_name(&self, contract: &str) -> Result<String, ChainError>;
}

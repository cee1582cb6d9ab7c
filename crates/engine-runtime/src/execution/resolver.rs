use crate::error::ResolutionError;
use connectors::{chain::ChainProvider, error::ChainError};
use model::collection::CollectionDescriptor;
use std::sync::Arc;
use tracing::{info, warn};

/// Discovers a collection's tokens from its mint history.
#[derive(Clone)]
pub struct CollectionResolver {
    provider: Arc<dyn ChainProvider>,
}

impl CollectionResolver {
    pub fn new(provider: Arc<dyn ChainProvider>) -> Self {
        CollectionResolver { provider }
    }

    /// Single attempt; the first failing chain query aborts resolution.
    pub async fn resolve(&self, contract: &str) -> Result<CollectionDescriptor, ResolutionError> {
        info!(contract, "Resolving collection from mint history");

        let token_ids = self
            .provider
            .mint_token_ids(contract)
            .await
            .map_err(|err| resolution_failed(contract, err))?;

        let name = self
            .provider
            .contract_name(contract)
            .await
            .map_err(|err| resolution_failed(contract, err))?;

        info!(
            contract,
            collection = %name,
            tokens = token_ids.len(),
            "Resolved collection"
        );
        Ok(CollectionDescriptor::new(name, token_ids))
    }
}

fn resolution_failed(contract: &str, source: ChainError) -> ResolutionError {
    warn!(contract, error = %source, "Failed to resolve collection");
    ResolutionError {
        contract: contract.to_string(),
        source,
    }
}

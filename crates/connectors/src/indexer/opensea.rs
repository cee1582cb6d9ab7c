use super::MetadataIndexer;
use crate::error::RefreshRequestError;
use async_trait::async_trait;
use model::core::token_id::TokenId;
use reqwest::StatusCode;
use tracing::debug;

pub const OPENSEA_API_URL: &str = "https://api.opensea.io";

/// OpenSea v1 asset endpoint with `force_update`.
pub struct OpenSeaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenSeaClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new(), OPENSEA_API_URL)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        OpenSeaClient {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn asset_url(&self, contract: &str, token_id: &TokenId) -> String {
        format!(
            "{}/api/v1/asset/{contract}/{token_id}/?force_update=true",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl Default for OpenSeaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataIndexer for OpenSeaClient {
    async fn refresh(&self, contract: &str, token_id: &TokenId) -> Result<(), RefreshRequestError> {
        let url = self.asset_url(contract, token_id);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        debug!(%token_id, status = status.as_u16(), "Indexer responded");

        // Any success other than a plain 200 still counts as a failed refresh.
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(RefreshRequestError::Status(status.as_u16()))
        }
    }
}

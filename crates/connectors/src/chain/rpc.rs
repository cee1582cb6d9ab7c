use super::{
    ChainProvider,
    abi::{self, NAME_SELECTOR, TRANSFER_TOPIC, ZERO_ADDRESS_TOPIC},
};
use crate::error::ChainError;
use async_trait::async_trait;
use model::core::token_id::TokenId;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Builds the Alchemy mainnet endpoint for an API key.
pub fn alchemy_mainnet_url(api_key: &str) -> String {
    format!("https://eth-mainnet.g.alchemy.com/v2/{api_key}")
}

/// Ethereum JSON-RPC 2.0 client over HTTP.
pub struct JsonRpcProvider {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    pub topics: Vec<String>,
    pub block_number: Option<String>,
    pub log_index: Option<String>,
}

impl JsonRpcProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        JsonRpcProvider {
            client,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "Sending JSON-RPC request");

        let response: RpcResponse<T> = self
            .client
            .post(&self.endpoint)
            .json(&request_body(id, method, params))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        into_result(response)
    }
}

#[async_trait]
impl ChainProvider for JsonRpcProvider {
    async fn mint_token_ids(&self, contract: &str) -> Result<Vec<TokenId>, ChainError> {
        let logs: Vec<RpcLog> = self.call("eth_getLogs", mint_logs_params(contract)).await?;
        debug!(contract, logs = logs.len(), "Fetched mint transfer logs");
        token_ids_in_emission_order(logs)
    }

    async fn contract_name(&self, contract: &str) -> Result<String, ChainError> {
        let params = json!([{ "to": contract, "data": NAME_SELECTOR }, "latest"]);
        let data: String = self.call("eth_call", params).await?;
        abi::decode_string(&abi::decode_hex(&data)?)
    }
}

fn request_body(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// `eth_getLogs` filter for transfers out of the zero address across all blocks.
fn mint_logs_params(contract: &str) -> Value {
    json!([{
        "address": contract,
        "fromBlock": "earliest",
        "toBlock": "latest",
        "topics": [TRANSFER_TOPIC, ZERO_ADDRESS_TOPIC],
    }])
}

fn into_result<T>(response: RpcResponse<T>) -> Result<T, ChainError> {
    if let Some(err) = response.error {
        return Err(ChainError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    response.result.ok_or_else(|| {
        ChainError::MalformedResponse("response has neither result nor error".into())
    })
}

/// Orders logs by `(blockNumber, logIndex)` and extracts their token ids.
/// Pending logs without a position sort last.
pub fn token_ids_in_emission_order(mut logs: Vec<RpcLog>) -> Result<Vec<TokenId>, ChainError> {
    logs.sort_by_key(|log| (quantity(&log.block_number), quantity(&log.log_index)));
    logs.iter()
        .map(|log| abi::token_id_from_topics(&log.topics))
        .collect()
}

fn quantity(value: &Option<String>) -> u64 {
    value
        .as_deref()
        .and_then(|v| u64::from_str_radix(v.trim_start_matches("0x"), 16).ok())
        .unwrap_or(u64::MAX)
}

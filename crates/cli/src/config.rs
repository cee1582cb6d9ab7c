use crate::{env::EnvManager, error::CliError};
use connectors::{chain::rpc::alchemy_mainnet_url, indexer::opensea::OPENSEA_API_URL};
use engine_core::pacing::DEFAULT_REFRESH_DELAY;
use std::time::Duration;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const MASK: &str = "****";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcEndpoint {
    Url(String),
    Alchemy { api_key: String },
}

impl RpcEndpoint {
    pub fn url(&self) -> String {
        match self {
            RpcEndpoint::Url(url) => url.clone(),
            RpcEndpoint::Alchemy { api_key } => alchemy_mainnet_url(api_key),
        }
    }

    /// Endpoint with the parts where providers put API keys masked:
    /// credentials, path and query.
    pub fn redacted(&self) -> String {
        match self {
            RpcEndpoint::Alchemy { .. } => alchemy_mainnet_url(MASK),
            RpcEndpoint::Url(raw) => {
                let Ok(mut url) = reqwest::Url::parse(raw) else {
                    return MASK.to_string();
                };
                if !url.username().is_empty() {
                    let _ = url.set_username(MASK);
                }
                if url.password().is_some() {
                    let _ = url.set_password(Some(MASK));
                }
                if url.path() != "/" {
                    url.set_path(MASK);
                }
                if url.query().is_some() {
                    url.set_query(Some(MASK));
                }
                url.to_string()
            }
        }
    }
}

/// Values passed on the command line; they win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub rpc_url: Option<String>,
    pub indexer_url: Option<String>,
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RefresherConfig {
    pub rpc: Option<RpcEndpoint>,
    pub indexer_base_url: String,
    pub refresh_delay: Duration,
    pub http_timeout: Duration,
}

impl RefresherConfig {
    pub fn from_env(env: &EnvManager, overrides: &ConfigOverrides) -> Result<Self, CliError> {
        let rpc = match (&overrides.rpc_url, env.get("RPC_URL"), env.get("ALCHEMY_API_KEY")) {
            (Some(url), _, _) => Some(RpcEndpoint::Url(url.clone())),
            (None, Some(url), _) => Some(RpcEndpoint::Url(url.to_string())),
            (None, None, Some(api_key)) => Some(RpcEndpoint::Alchemy {
                api_key: api_key.to_string(),
            }),
            (None, None, None) => None,
        };

        let indexer_base_url = overrides
            .indexer_url
            .clone()
            .or_else(|| env.get("INDEXER_BASE_URL").map(String::from))
            .unwrap_or_else(|| OPENSEA_API_URL.to_string());

        let refresh_delay = match overrides.delay_ms {
            Some(ms) => Duration::from_millis(ms),
            None => parse_duration(env, "REFRESH_DELAY_MS", Duration::from_millis)?
                .unwrap_or(DEFAULT_REFRESH_DELAY),
        };

        let http_timeout = parse_duration(env, "HTTP_TIMEOUT_SECS", Duration::from_secs)?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);
        if http_timeout.is_zero() {
            return Err(CliError::Config(
                "HTTP_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }

        Ok(RefresherConfig {
            rpc,
            indexer_base_url,
            refresh_delay,
            http_timeout,
        })
    }

    pub fn rpc_url(&self) -> Result<String, CliError> {
        self.rpc
            .as_ref()
            .map(RpcEndpoint::url)
            .ok_or(CliError::MissingRpcEndpoint)
    }

    /// `(setting, value)` pairs safe to print.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "RPC endpoint",
                self.rpc
                    .as_ref()
                    .map(RpcEndpoint::redacted)
                    .unwrap_or_else(|| "(not set)".to_string()),
            ),
            ("Indexer", self.indexer_base_url.clone()),
            (
                "Request delay",
                format!("{} ms", self.refresh_delay.as_millis()),
            ),
            ("HTTP timeout", format!("{} s", self.http_timeout.as_secs())),
        ]
    }
}

fn parse_duration(
    env: &EnvManager,
    key: &str,
    unit: fn(u64) -> Duration,
) -> Result<Option<Duration>, CliError> {
    env.get(key)
        .map(|raw| {
            raw.trim().parse::<u64>().map(unit).map_err(|_| {
                CliError::Config(format!(
                    "Invalid value for {key}: {}",
                    env.display_value(key, raw)
                ))
            })
        })
        .transpose()
}

use crate::core::token_id::TokenId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of a completed refresh run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub contract_address: String,
    pub collection: String,
    pub offset: u64,
    pub total: u64,
    pub refreshed: u64,
    pub retried: u64,
    pub skipped: Vec<TokenId>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl RunReport {
    /// The terminal signal of a run is success even when tokens were skipped;
    /// this tells the two apart.
    pub fn all_refreshed(&self) -> bool {
        self.skipped.is_empty()
    }
}

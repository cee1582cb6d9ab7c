use chrono::Utc;
use connectors::{error::RefreshRequestError, indexer::MetadataIndexer};
use engine_core::{
    event_bus::EventBus,
    metrics::RunMetrics,
    pacing::Pacer,
    retry::{RetryOutcome, attempt_with_one_retry},
};
use model::{
    collection::CollectionDescriptor, core::token_id::TokenId, events::RefreshEvent,
    report::RunReport, state::RefreshState,
};
use std::sync::Arc;
use tokio::{sync::watch, time::Instant};
use tracing::{debug, info, warn};

pub const FINISHED_MESSAGE: &str = "Finished refreshing metadata on OpenSea.";

/// Drives one metadata refresh per token, strictly one request at a time.
pub struct RefreshDriver {
    indexer: Arc<dyn MetadataIndexer>,
    pacer: Pacer,
    events: EventBus<RefreshEvent>,
    state: watch::Sender<RefreshState>,
}

impl RefreshDriver {
    pub fn new(
        indexer: Arc<dyn MetadataIndexer>,
        pacer: Pacer,
        events: EventBus<RefreshEvent>,
    ) -> Self {
        let (state, _) = watch::channel(RefreshState::default());
        RefreshDriver {
            indexer,
            pacer,
            events,
            state,
        }
    }

    pub fn events(&self) -> &EventBus<RefreshEvent> {
        &self.events
    }

    /// Live view of the current run's state.
    pub fn state(&self) -> watch::Receiver<RefreshState> {
        self.state.subscribe()
    }

    /// Refreshes every token of `descriptor` whose id is at least `offset`.
    ///
    /// Tokens whose request fails twice are skipped; the run still ends
    /// with a successful `Finished` event. The report lists what was skipped.
    pub async fn run(
        &self,
        descriptor: &CollectionDescriptor,
        contract: &str,
        offset: u64,
    ) -> RunReport {
        let started_at = Utc::now();
        let clock = Instant::now();

        let tokens = descriptor.tokens_from(TokenId::from(offset));
        let total = tokens.len() as u64;
        let metrics = RunMetrics::new();
        let mut skipped = Vec::new();

        self.state.send_modify(|state| {
            *state = RefreshState::new(contract, offset);
            state.start(total);
        });

        info!(
            contract,
            collection = descriptor.name(),
            discovered = descriptor.total_supply(),
            total,
            offset,
            "Started refreshing metadata"
        );
        self.events
            .publish(RefreshEvent::Started {
                collection: descriptor.name().to_string(),
                total,
            })
            .await;

        let requests = &metrics;
        for token_id in &tokens {
            let outcome = attempt_with_one_retry(move |attempt| {
                requests.increment_requests(1);
                self.refresh_token(contract, token_id, attempt)
            })
            .await;

            if outcome.attempts() > 1 {
                metrics.increment_retries(1);
            }

            match outcome {
                RetryOutcome::Success { .. } => {
                    metrics.increment_refreshed(1);
                    self.record_progress().await;
                }
                RetryOutcome::Skipped { last, .. } => {
                    metrics.increment_skipped(1);
                    warn!(%token_id, error = %last, "Refresh failed after retry, skipping token");
                    skipped.push(*token_id);
                }
            }

            self.pacer.pause().await;
        }

        self.state.send_modify(RefreshState::finish);
        self.events
            .publish(RefreshEvent::Finished {
                ok: true,
                message: FINISHED_MESSAGE.to_string(),
            })
            .await;

        let snapshot = metrics.snapshot();
        info!(
            refreshed = snapshot.tokens_refreshed,
            retried = snapshot.retry_count,
            skipped = snapshot.tokens_skipped,
            requests = snapshot.requests_sent,
            "Finished refreshing metadata"
        );

        self.state.send_modify(RefreshState::reset);

        RunReport {
            contract_address: contract.to_string(),
            collection: descriptor.name().to_string(),
            offset,
            total,
            refreshed: snapshot.tokens_refreshed,
            retried: snapshot.retry_count,
            skipped,
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: clock.elapsed().as_millis() as u64,
        }
    }

    async fn refresh_token(
        &self,
        contract: &str,
        token_id: &TokenId,
        attempt: u8,
    ) -> Result<(), RefreshRequestError> {
        debug!(%token_id, attempt, "Requesting metadata refresh");
        let result = self.indexer.refresh(contract, token_id).await;
        if let Err(err) = &result {
            debug!(%token_id, attempt, error = %err, "Metadata refresh failed");
        }
        result
    }

    async fn record_progress(&self) {
        let mut progress = None;
        self.state.send_modify(|state| {
            let processed = state.record_success();
            progress = Some((processed, state.total_supply(), state.percentage()));
        });

        if let Some((processed, total, percentage)) = progress {
            self.events
                .publish(RefreshEvent::Progress {
                    processed,
                    total,
                    percentage,
                })
                .await;
        }
    }
}

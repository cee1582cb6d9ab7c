use super::{driver::RefreshDriver, resolver::CollectionResolver};
use crate::error::ResolutionError;
use model::{events::RefreshEvent, report::RunReport};
use tracing::info;

/// Resolves `contract` and refreshes its tokens from `offset` onwards.
///
/// When resolution fails the driver never starts: the only event
/// published is a failed `Finished`.
pub async fn run(
    resolver: &CollectionResolver,
    driver: &RefreshDriver,
    contract: &str,
    offset: u64,
) -> Result<RunReport, ResolutionError> {
    let descriptor = match resolver.resolve(contract).await {
        Ok(descriptor) => descriptor,
        Err(err) => {
            driver
                .events()
                .publish(RefreshEvent::Finished {
                    ok: false,
                    message: err.to_string(),
                })
                .await;
            return Err(err);
        }
    };

    let report = driver.run(&descriptor, contract, offset).await;
    info!(
        contract,
        collection = %report.collection,
        refreshed = report.refreshed,
        total = report.total,
        elapsed_ms = report.elapsed_ms,
        "Refresh run complete"
    );
    Ok(report)
}

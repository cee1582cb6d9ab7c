use super::mocks::{MockIndexer, drain, ids, progress_of};
use crate::execution::driver::{FINISHED_MESSAGE, RefreshDriver};
use engine_core::{
    event_bus::EventBus,
    pacing::{DEFAULT_REFRESH_DELAY, Pacer},
};
use model::{collection::CollectionDescriptor, events::RefreshEvent};
use std::{sync::Arc, time::Duration};
use tracing_test::traced_test;

const CONTRACT: &str = "0x1a92f7381b9f03921564a437210bb9396471050c";

fn folks(raw: &[u64]) -> CollectionDescriptor {
    CollectionDescriptor::new("Folks", ids(raw))
}

async fn driver_with(
    indexer: Arc<MockIndexer>,
    pacer: Pacer,
) -> (
    RefreshDriver,
    tokio::sync::mpsc::Receiver<Arc<RefreshEvent>>,
) {
    let bus = EventBus::new();
    let (_subscription, rx) = bus.subscribe(256).await;
    (RefreshDriver::new(indexer, pacer, bus), rx)
}

fn finished_ok() -> RefreshEvent {
    RefreshEvent::Finished {
        ok: true,
        message: FINISHED_MESSAGE.to_string(),
    }
}

// Mint order [3, 1, 2], no offset, every request answered with 200.
#[tokio::test(start_paused = true)]
async fn refreshes_in_mint_order_with_pacing() {
    let indexer = MockIndexer::new();
    let (driver, mut rx) = driver_with(indexer.clone(), Pacer::default()).await;

    let report = driver.run(&folks(&[3, 1, 2]), CONTRACT, 0).await;

    assert_eq!(indexer.requested_tokens(), ids(&[3, 1, 2]));
    let times = indexer.request_times();
    for pair in times.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= DEFAULT_REFRESH_DELAY, "gap {gap:?} shorter than pacing delay");
        assert!(gap < DEFAULT_REFRESH_DELAY + Duration::from_millis(5));
    }

    let events = drain(&mut rx);
    assert_eq!(
        events.first(),
        Some(&RefreshEvent::Started {
            collection: "Folks".into(),
            total: 3
        })
    );
    assert_eq!(progress_of(&events), vec![(1, 3, 33), (2, 3, 67), (3, 3, 100)]);
    assert_eq!(events.last(), Some(&finished_ok()));

    assert_eq!(report.total, 3);
    assert_eq!(report.refreshed, 3);
    assert!(report.all_refreshed());
}

#[tokio::test]
async fn offset_filters_tokens_and_total() {
    let indexer = MockIndexer::new();
    let (driver, mut rx) = driver_with(indexer.clone(), Pacer::new(Duration::ZERO)).await;

    let report = driver.run(&folks(&[3, 1, 2]), CONTRACT, 2).await;

    assert_eq!(indexer.requested_tokens(), ids(&[3, 2]));
    assert_eq!(report.total, 2);
    assert_eq!(report.offset, 2);

    let events = drain(&mut rx);
    assert_eq!(
        events.first(),
        Some(&RefreshEvent::Started {
            collection: "Folks".into(),
            total: 2
        })
    );
    // (processed + offset) / total is past 100% from the first token and is clamped.
    assert_eq!(progress_of(&events), vec![(1, 2, 100), (2, 2, 100)]);
}

#[tokio::test]
async fn offset_counts_towards_percentage() {
    let indexer = MockIndexer::new();
    let (driver, mut rx) = driver_with(indexer.clone(), Pacer::new(Duration::ZERO)).await;

    driver.run(&folks(&[10, 11, 12, 13]), CONTRACT, 1).await;

    assert_eq!(indexer.requested_tokens(), ids(&[10, 11, 12, 13]));
    assert_eq!(
        progress_of(&drain(&mut rx)),
        vec![(1, 4, 50), (2, 4, 75), (3, 4, 100), (4, 4, 100)]
    );
}

#[tokio::test]
async fn stalled_subscriber_does_not_block_the_run() {
    let indexer = MockIndexer::new();
    let bus = EventBus::new();
    let (_subscription, _never_read) = bus.subscribe(1).await;
    let driver = RefreshDriver::new(indexer.clone(), Pacer::new(Duration::ZERO), bus);

    let report = tokio::time::timeout(
        Duration::from_secs(2),
        driver.run(&folks(&[1, 2, 3]), CONTRACT, 0),
    )
    .await
    .expect("run finished despite a full subscriber channel");

    assert_eq!(indexer.requested_tokens(), ids(&[1, 2, 3]));
    assert_eq!(report.refreshed, 3);
}

#[traced_test]
#[tokio::test]
async fn token_failing_twice_is_skipped_and_run_continues() {
    let indexer = MockIndexer::new().script(1, &[500, 500]);
    let (driver, mut rx) = driver_with(indexer.clone(), Pacer::new(Duration::ZERO)).await;

    let report = driver.run(&folks(&[3, 1, 2]), CONTRACT, 0).await;

    assert_eq!(indexer.requested_tokens(), ids(&[3, 1, 1, 2]));
    assert_eq!(report.skipped, ids(&[1]));
    assert_eq!(report.refreshed, 2);
    assert_eq!(report.retried, 1);
    assert!(!report.all_refreshed());

    let events = drain(&mut rx);
    assert_eq!(progress_of(&events), vec![(1, 3, 33), (2, 3, 67)]);
    assert_eq!(events.last(), Some(&finished_ok()));
    assert!(logs_contain("skipping token"));
}

#[tokio::test]
async fn successful_retry_counts_as_refreshed() {
    let indexer = MockIndexer::new().script(1, &[500, 200]);
    let (driver, mut rx) = driver_with(indexer.clone(), Pacer::new(Duration::ZERO)).await;

    let report = driver.run(&folks(&[3, 1, 2]), CONTRACT, 0).await;

    assert_eq!(indexer.requested_tokens(), ids(&[3, 1, 1, 2]));
    assert_eq!(report.refreshed, 3);
    assert_eq!(report.retried, 1);
    assert!(report.all_refreshed());
    assert_eq!(progress_of(&drain(&mut rx)).last(), Some(&(3, 3, 100)));
}

#[tokio::test]
async fn run_reports_success_even_when_every_token_fails() {
    let indexer = MockIndexer::new()
        .script(1, &[500, 500])
        .script(2, &[404, 429])
        .script(3, &[503, 503]);
    let (driver, mut rx) = driver_with(indexer.clone(), Pacer::new(Duration::ZERO)).await;

    let report = driver.run(&folks(&[3, 1, 2]), CONTRACT, 0).await;

    assert_eq!(indexer.requested_tokens().len(), 6);
    assert_eq!(report.refreshed, 0);
    assert_eq!(report.skipped, ids(&[3, 1, 2]));

    let events = drain(&mut rx);
    assert!(progress_of(&events).is_empty());
    assert_eq!(events.last(), Some(&finished_ok()));
}

#[tokio::test]
async fn empty_token_set_finishes_without_requests() {
    let indexer = MockIndexer::new();
    let (driver, mut rx) = driver_with(indexer.clone(), Pacer::default()).await;
    let state = driver.state();

    let report = driver.run(&folks(&[3, 1, 2]), CONTRACT, 10).await;

    assert!(indexer.requested_tokens().is_empty());
    assert_eq!(report.total, 0);
    assert_eq!(state.borrow().percentage(), 0);
    assert_eq!(
        drain(&mut rx),
        vec![
            RefreshEvent::Started {
                collection: "Folks".into(),
                total: 0
            },
            finished_ok(),
        ]
    );
}

#[tokio::test]
async fn attempts_one_request_per_minted_token() {
    let minted: Vec<u64> = (0..25).collect();
    let indexer = MockIndexer::new();
    let (driver, _rx) = driver_with(indexer.clone(), Pacer::new(Duration::ZERO)).await;

    let report = driver.run(&folks(&minted), CONTRACT, 0).await;

    assert_eq!(report.total, 25);
    assert_eq!(indexer.requested_tokens(), ids(&minted));
    assert!(
        indexer
            .requested_contracts()
            .iter()
            .all(|contract| contract == CONTRACT)
    );
}

#[tokio::test]
async fn reruns_issue_the_same_requests() {
    let indexer = MockIndexer::new().script(1, &[500, 500]);
    let (driver, _rx) = driver_with(indexer.clone(), Pacer::new(Duration::ZERO)).await;
    let descriptor = folks(&[3, 1, 2, 7]);

    driver.run(&descriptor, CONTRACT, 2).await;
    let first = indexer.requested_tokens();
    driver.run(&descriptor, CONTRACT, 2).await;
    let all = indexer.requested_tokens();

    assert_eq!(first, ids(&[3, 2, 7]));
    assert_eq!(&all[first.len()..], first.as_slice());
}

#[tokio::test]
async fn state_is_reset_after_run() {
    let indexer = MockIndexer::new();
    let (driver, _rx) = driver_with(indexer, Pacer::new(Duration::ZERO)).await;
    let state = driver.state();

    driver.run(&folks(&[1, 2]), CONTRACT, 0).await;

    let state = state.borrow();
    assert!(!state.is_running());
    assert_eq!(state.processed_count(), 0);
    assert_eq!(state.contract_address(), "");
    assert_eq!(state.total_supply(), 2);
}

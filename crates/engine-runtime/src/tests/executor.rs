use super::mocks::{MockChain, MockIndexer, drain, ids};
use crate::execution::{
    driver::RefreshDriver, executor, resolver::CollectionResolver,
};
use connectors::error::ChainError;
use engine_core::{event_bus::EventBus, pacing::Pacer};
use model::events::RefreshEvent;
use std::{error::Error, sync::atomic::Ordering, time::Duration};
use tracing_test::traced_test;

const CONTRACT: &str = "0x1a92f7381b9f03921564a437210bb9396471050c";

#[tokio::test]
async fn resolves_then_refreshes() {
    let chain = MockChain::with_mints("Rare Folk", &[3, 1, 2]);
    let indexer = MockIndexer::new();
    let bus = EventBus::new();
    let (_subscription, mut rx) = bus.subscribe(64).await;
    let resolver = CollectionResolver::new(chain);
    let driver = RefreshDriver::new(indexer.clone(), Pacer::new(Duration::ZERO), bus);

    let report = executor::run(&resolver, &driver, CONTRACT, 0).await.unwrap();

    assert_eq!(report.collection, "Rare Folk");
    assert_eq!(report.contract_address, CONTRACT);
    assert_eq!(report.total, 3);
    assert_eq!(indexer.requested_tokens(), ids(&[3, 1, 2]));

    let events = drain(&mut rx);
    assert!(matches!(events.first(), Some(RefreshEvent::Started { .. })));
    assert!(matches!(
        events.last(),
        Some(RefreshEvent::Finished { ok: true, .. })
    ));
}

#[traced_test]
#[tokio::test]
async fn resolution_failure_never_starts_the_driver() {
    let chain = MockChain::no_contract();
    let indexer = MockIndexer::new();
    let bus = EventBus::new();
    let (_subscription, mut rx) = bus.subscribe(64).await;
    let resolver = CollectionResolver::new(chain.clone());
    let driver = RefreshDriver::new(indexer.clone(), Pacer::new(Duration::ZERO), bus);

    let err = executor::run(&resolver, &driver, CONTRACT, 0)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "invalid contract address");
    assert_eq!(err.contract, CONTRACT);
    assert!(indexer.requested_tokens().is_empty());
    // The first failing query aborts resolution.
    assert_eq!(chain.queries.load(Ordering::SeqCst), 1);

    assert_eq!(
        drain(&mut rx),
        vec![RefreshEvent::Finished {
            ok: false,
            message: "invalid contract address".into(),
        }]
    );
    assert!(!driver.state().borrow().is_running());
    assert!(logs_contain("Failed to resolve collection"));
}

#[tokio::test]
async fn resolution_error_keeps_the_cause() {
    let resolver = CollectionResolver::new(MockChain::no_contract());

    let err = resolver.resolve(CONTRACT).await.unwrap_err();

    let source = err.source().expect("chain error as source");
    assert!(source.downcast_ref::<ChainError>().is_some());
}

#[tokio::test]
async fn descriptor_preserves_mint_order() {
    let resolver = CollectionResolver::new(MockChain::with_mints("Folks", &[9, 4, 6]));

    let descriptor = resolver.resolve(CONTRACT).await.unwrap();

    assert_eq!(descriptor.name(), "Folks");
    assert_eq!(descriptor.token_ids(), ids(&[9, 4, 6]).as_slice());
    assert_eq!(descriptor.total_supply(), 3);
}

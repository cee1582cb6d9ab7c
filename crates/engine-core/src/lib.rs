pub mod event_bus;
pub mod metrics;
pub mod pacing;
pub mod retry;

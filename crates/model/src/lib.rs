pub mod collection;
pub mod core;
pub mod events;
pub mod report;
pub mod state;

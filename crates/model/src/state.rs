use serde::Serialize;

/// Display percentage for a run.
///
/// `0` when nothing is to be refreshed, otherwise
/// `round(100 * (processed + offset) / total)` clamped to `[0, 100]`.
/// Halves round up.
pub fn progress_percentage(processed: u64, offset: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }

    let done = processed as u128 + offset as u128;
    let total = total as u128;
    let rounded = (done * 200 + total) / (total * 2);
    rounded.min(100) as u8
}

/// Mutable state of a single refresh run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshState {
    contract_address: String,
    offset: u64,
    processed_count: u64,
    total_supply: u64,
    running: bool,
}

impl RefreshState {
    pub fn new(contract_address: impl Into<String>, offset: u64) -> Self {
        RefreshState {
            contract_address: contract_address.into(),
            offset,
            ..Default::default()
        }
    }

    /// Enters the running state for `total_supply` tokens (offset already applied).
    pub fn start(&mut self, total_supply: u64) {
        self.total_supply = total_supply;
        self.processed_count = 0;
        self.running = true;
    }

    /// Counts one refreshed token and returns the new count.
    pub fn record_success(&mut self) -> u64 {
        if self.processed_count < self.total_supply {
            self.processed_count += 1;
        }
        self.processed_count
    }

    pub fn finish(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.processed_count = 0;
        self.contract_address.clear();
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    pub fn processed_count(&self) -> u64 {
        self.processed_count
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn percentage(&self) -> u8 {
        progress_percentage(self.processed_count, self.offset, self.total_supply)
    }
}

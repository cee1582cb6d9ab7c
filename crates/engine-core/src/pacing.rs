use std::time::Duration;
use tokio::time;

/// Delay between two consecutive refresh requests.
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(350);

/// Fixed cooperative delay between requests.
///
/// Not a rate limiter: it ignores any throttling signalled by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Pacer { delay }
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            time::sleep(self.delay).await;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Pacer::new(DEFAULT_REFRESH_DELAY)
    }
}

use std::future::Future;

/// Attempts made for a request before its token is given up on.
pub const MAX_ATTEMPTS: u8 = 2;

/// Result of running an operation under the one-retry policy.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    /// One of the attempts succeeded.
    Success { value: T, attempts: u8 },
    /// Both attempts failed; the caller moves on.
    Skipped { first: E, last: E },
}

impl<T, E> RetryOutcome<T, E> {
    pub fn attempts(&self) -> u8 {
        match self {
            RetryOutcome::Success { attempts, .. } => *attempts,
            RetryOutcome::Skipped { .. } => MAX_ATTEMPTS,
        }
    }
}

/// Runs `op` once and, if it fails, exactly once more.
///
/// `op` receives the 1-based attempt number. No delay is inserted
/// between the two attempts.
pub async fn attempt_with_one_retry<F, Fut, T, E>(mut op: F) -> RetryOutcome<T, E>
where
    F: FnMut(u8) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let first = match op(1).await {
        Ok(value) => return RetryOutcome::Success { value, attempts: 1 },
        Err(err) => err,
    };

    match op(MAX_ATTEMPTS).await {
        Ok(value) => RetryOutcome::Success {
            value,
            attempts: MAX_ATTEMPTS,
        },
        Err(last) => RetryOutcome::Skipped { first, last },
    }
}

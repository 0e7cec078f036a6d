//! Retry with backoff
//!
//! Drives one loader through a [`RetryPolicy`]. Only transient failures are
//! retried; a definitive miss returns immediately without sleeping.

use std::time::Duration;

use fontres_text::{BoxFuture, FontLoader, LoadOutcome, LoadParams};

use crate::RetryPolicy;

/// Suspends the current task between attempts
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Sleeps on the async runtime's timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TimerSleeper;

impl Sleeper for TimerSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            smol::Timer::after(duration).await;
        })
    }
}

/// Load from a single source, retrying transient failures.
///
/// Returns `Transient` with the last failure message once attempts run out.
pub async fn load_with_retry(
    loader: &dyn FontLoader,
    params: &LoadParams,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
) -> LoadOutcome {
    let max_attempts = policy.max_attempts.max(1);
    let mut failed = 0;

    loop {
        match loader.load(params).await {
            LoadOutcome::Loaded(data) => return LoadOutcome::Loaded(data),
            LoadOutcome::NotFound => {
                tracing::debug!("{}: {} {} not found", loader.name(), params.family, params.weight);
                return LoadOutcome::NotFound;
            }
            LoadOutcome::Transient(message) => {
                failed += 1;
                if failed >= max_attempts {
                    tracing::warn!(
                        "{}: giving up on {} {} after {} attempts: {}",
                        loader.name(),
                        params.family,
                        params.weight,
                        failed,
                        message
                    );
                    return LoadOutcome::Transient(message);
                }

                let delay = policy.delay(failed);
                tracing::warn!(
                    "{}: attempt {} for {} failed ({}), retrying in {:?}",
                    loader.name(),
                    failed,
                    params.family,
                    message,
                    delay
                );
                sleeper.sleep(delay).await;
            }
        }
    }
}

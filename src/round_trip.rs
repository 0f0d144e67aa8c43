/// Bounded waiting for round-trip messages
use std::future::Future;
use std::pin::pin;

use futures::future::{Either, select};
use thiserror::Error;

/// How long an overlay waits for the coordinator's image reply
pub const ROUND_TRIP_TIMEOUT_MS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No response from the background worker")]
pub struct TimedOut;

/// Resolve `work`, or fail with `TimedOut` if `deadline` fires first.
pub async fn with_deadline<T>(
    work: impl Future<Output = T>,
    deadline: impl Future<Output = ()>,
) -> Result<T, TimedOut> {
    let work = pin!(work);
    let deadline = pin!(deadline);

    match select(work, deadline).await {
        Either::Left((value, _)) => Ok(value),
        Either::Right(_) => Err(TimedOut),
    }
}

//! Deadline-bounded polling for eventual-consistency assertions.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep_until;
use tokio::time::Instant;

/// Repeatedly evaluate `predicate` until it returns true or the next attempt
/// would land past `deadline`.
///
/// The predicate is evaluated immediately; a deadline already in the past
/// therefore still gets exactly one evaluation. Between attempts the calling
/// task sleeps until the next attempt time (`now + interval`); the last
/// attempt is the one whose scheduled time still fits within the deadline.
///
/// Returns whether the predicate ever held. A false result is not an
/// error; assertion and reporting stay with the caller.
///
/// # Panics
/// A zero `interval` is a programmer error and is rejected by assertion;
/// busy-polling is never the intended reading of "retry every `interval`".
pub async fn poll_until<F, Fut>(deadline: Instant, interval: Duration, mut predicate: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    assert!(interval > Duration::ZERO, "poll interval must be positive");

    loop {
        if predicate().await {
            return true;
        }

        let next_attempt = Instant::now() + interval;
        if next_attempt > deadline {
            return false;
        }
        sleep_until(next_attempt).await;
    }
}

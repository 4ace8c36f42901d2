use crate::errors::{Result, SuiteError};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Repeatedly evaluates a condition against live browser state until it
/// holds or a fixed budget runs out. The continuation is blocked the whole
/// time; there is exactly one logical thread of control in the suite.
///
/// Predicates must be free of side effects on the polled state: they may
/// re-query it on every evaluation but must not cause the change they are
/// waiting for.
pub struct Poller {
    timeout: Duration,
    interval: Duration,
}

impl Poller {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Evaluates `check` until it returns `Ok(true)`, sleeping one interval
    /// between evaluations. Returns as soon as the condition first holds;
    /// the predicate is never re-evaluated after that. If the budget
    /// elapses first, fails with `TimeoutExceeded` naming `what`.
    ///
    /// A predicate error aborts the wait immediately.
    pub async fn wait_until<F, Fut>(&self, what: &str, mut check: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let started = Instant::now();
        loop {
            if check().await? {
                debug!(what, elapsed_ms = started.elapsed().as_millis() as u64, "condition met");
                return Ok(());
            }
            if started.elapsed() >= self.timeout {
                return Err(SuiteError::TimeoutExceeded {
                    what: what.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio_test::{assert_err, assert_ok};

    fn poller() -> Poller {
        Poller::new(Duration::from_secs(1), Duration::from_millis(250))
    }

    #[tokio::test(start_paused = true)]
    async fn returns_on_first_true_without_re_evaluating() {
        let calls = Cell::new(0u32);
        let calls = &calls;
        assert_ok!(
            poller()
                .wait_until("immediate condition", || async move {
                    calls.set(calls.get() + 1);
                    Ok(true)
                })
                .await
        );
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_condition_holds() {
        let calls = Cell::new(0u32);
        let calls = &calls;
        let started = Instant::now();
        assert_ok!(
            poller()
                .wait_until("third evaluation", || async move {
                    calls.set(calls.get() + 1);
                    Ok(calls.get() >= 3)
                })
                .await
        );
        assert_eq!(calls.get(), 3);
        // two sleeps of one interval each under the paused clock
        assert_eq!(started.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn fails_with_timeout_when_condition_never_holds() {
        let poller = poller();
        let started = Instant::now();
        let err = assert_err!(
            poller
                .wait_until("a condition that never holds", || async { Ok(false) })
                .await
        );
        match err {
            SuiteError::TimeoutExceeded { what, timeout_ms } => {
                assert_eq!(what, "a condition that never holds");
                assert_eq!(timeout_ms, poller.timeout().as_millis() as u64);
            }
            other => panic!("unexpected error: {other}"),
        }
        // never overshoots the budget by more than one interval
        assert!(started.elapsed() <= poller.timeout() + Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn predicate_errors_abort_the_wait() {
        let calls = Cell::new(0u32);
        let calls = &calls;
        let err = poller()
            .wait_until("a failing probe", || async move {
                calls.set(calls.get() + 1);
                Err(SuiteError::JavaScriptFailed("boom".to_string()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SuiteError::JavaScriptFailed(_)));
        assert_eq!(calls.get(), 1);
    }
}

//! Per-session deadline.
//!
//! Arming spawns a timer task that, on expiry, raises a one-shot `fired` flag
//! and then cancels a token. Every suspension point of the session is raced
//! against the token; any error observed after the flag is up is reported as
//! `Timeout` instead of whatever the aborted operation produced.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error_handling::SessionError;

#[derive(Debug)]
pub(crate) struct Deadline {
    duration: Duration,
    token: CancellationToken,
    fired: Arc<AtomicBool>,
    timer: Option<JoinHandle<()>>,
}

impl Deadline {
    /// Starts the timer. A zero duration disables the deadline.
    pub(crate) fn arm(duration: Duration) -> Self {
        let token = CancellationToken::new();
        let fired = Arc::new(AtomicBool::new(false));
        let timer = (!duration.is_zero()).then(|| {
            let token = token.clone();
            let fired = Arc::clone(&fired);
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                debug!("Deadline of {duration:?} expired, cancelling session");
                fired.store(true, Ordering::SeqCst);
                token.cancel();
            })
        });
        Self {
            duration,
            token,
            fired,
            timer,
        }
    }

    pub(crate) fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Runs one suspension point under the deadline.
    pub(crate) async fn guard<T, F>(&self, operation: F) -> Result<T, SessionError>
    where
        F: Future<Output = Result<T, SessionError>>,
    {
        let result = tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(SessionError::Timeout(self.duration)),
            result = operation => result,
        };
        match result {
            Err(e) if self.has_fired() && !e.is_timeout() => {
                debug!("Suppressing `{e}` raised after the deadline fired");
                Err(SessionError::Timeout(self.duration))
            }
            other => other,
        }
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Instant;

    #[tokio::test]
    async fn test_disabled_deadline_never_fires() {
        let deadline = Deadline::arm(Duration::ZERO);
        let value = deadline
            .guard(async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<_, SessionError>(7)
            })
            .await
            .expect("no deadline");
        assert_eq!(value, 7);
        assert!(!deadline.has_fired());
    }

    #[tokio::test]
    async fn test_expiry_cancels_pending_operation() {
        let deadline = Deadline::arm(Duration::from_millis(50));
        let started = Instant::now();
        let result = deadline
            .guard(std::future::pending::<Result<(), SessionError>>())
            .await;
        assert!(matches!(result, Err(SessionError::Timeout(d)) if d == Duration::from_millis(50)));
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(deadline.has_fired());
    }

    #[tokio::test]
    async fn test_errors_after_expiry_become_timeout() {
        let deadline = Deadline::arm(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        let result: Result<(), SessionError> = deadline
            .guard(async {
                Err(SessionError::ReadError(io::Error::new(
                    io::ErrorKind::ConnectionAborted,
                    "aborted",
                )))
            })
            .await;
        assert!(matches!(result, Err(SessionError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_completed_operation_wins_before_expiry() {
        let deadline = Deadline::arm(Duration::from_secs(5));
        let result = deadline.guard(async { Ok::<_, SessionError>("done") }).await;
        assert_eq!(result.expect("completes"), "done");
    }
}

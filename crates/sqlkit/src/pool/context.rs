//! Caller-supplied deadline for connection checkout and liveness checks.

use crate::error::{DbError, DbResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Deadline scope passed to [`ConnectionManager::acquire`](super::ConnectionManager::acquire).
///
/// The manager applies the deadline to each checkout and ping, not to the
/// retry loop as a whole: a caller that wants a hard ceiling should pick a
/// deadline that covers every attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    /// No deadline; operations run until they finish.
    pub fn background() -> Self {
        Self::default()
    }

    /// Expire at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// Expire `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Run `fut`, failing with [`DbError::DeadlineExceeded`] if the deadline
    /// passes first.
    pub(crate) async fn run<F: Future>(&self, fut: F) -> DbResult<F::Output> {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| DbError::DeadlineExceeded),
            None => Ok(fut.await),
        }
    }
}

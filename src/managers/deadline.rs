//! Single-slot cancellable timer.
//!
//! A `Deadline<T>` holds at most one pending value. Scheduling again replaces
//! (and so cancels) the previous one; dropping the deadline cancels it too.

use std::future::pending;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep, Sleep};

#[derive(Debug)]
pub struct Deadline<T> {
    pending: Option<(Pin<Box<Sleep>>, T)>,
}

impl<T> Default for Deadline<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Deadline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer to yield `value` after `delay`, replacing any pending value.
    pub fn schedule(&mut self, value: T, delay: Duration) {
        self.pending = Some((Box::pin(sleep(delay)), value));
    }

    /// Drops the pending value, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, value)| value)
    }

    /// Resolves with the pending value once its delay has elapsed.
    ///
    /// Never resolves while nothing is scheduled, so it can sit in a `select!`.
    /// Cancel-safe: dropping the future before it resolves keeps the value armed.
    pub async fn fired(&mut self) -> T {
        let Some((timer, _)) = self.pending.as_mut() else {
            return pending().await;
        };
        timer.as_mut().await;
        match self.pending.take() {
            Some((_, value)) => value,
            None => pending().await,
        }
    }
}

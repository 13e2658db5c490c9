//! Polling loop for asynchronous dialog queries.
//!
//! A [`PollSession`] owns one background thread that waits an interval, asks the
//! backend for the query status, and only then waits again. Ticks never overlap.
//! The session carries its own cancellation channel; dropping the session cancels it.

use crate::api::Backend;
use crate::error::ClientError;
use serde_json::Value;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

/// Default time between status requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Completed,
    Failed,
    Cancelled,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Completed | PollState::Failed | PollState::Cancelled
        )
    }
}

/// Terminal outcome reported by the polling thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Completed(Option<Value>),
    Failed(ClientError),
}

pub struct PollSession {
    query_id: String,
    state: PollState,
    cancel_tx: Option<Sender<()>>,
    events: Receiver<PollEvent>,
}

impl PollSession {
    /// Arm a polling loop for `query_id`. The first status request goes out after one
    /// `interval`.
    pub fn start(backend: Arc<dyn Backend>, query_id: String, interval: Duration) -> Self {
        let (cancel_tx, cancel_rx) = mpsc::channel();
        let (event_tx, events) = mpsc::channel();

        tracing::info!(query_id = %query_id, ?interval, "Polling started");
        let thread_query_id = query_id.clone();
        std::thread::spawn(move || {
            run_loop(backend.as_ref(), &thread_query_id, interval, cancel_rx, event_tx);
        });

        Self {
            query_id,
            state: PollState::Polling,
            cancel_tx: Some(cancel_tx),
            events,
        }
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Stop the loop. Idempotent; a finished session keeps its terminal state.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
        if self.state == PollState::Polling {
            tracing::info!(query_id = %self.query_id, "Polling cancelled");
            self.state = PollState::Cancelled;
        }
    }

    /// Non-blocking check for the loop's outcome.
    pub fn try_next(&mut self) -> Option<PollEvent> {
        self.next_event(None)
    }

    fn next_event(&mut self, wait: Option<Duration>) -> Option<PollEvent> {
        if self.state != PollState::Polling {
            return None;
        }
        let received = match wait {
            None => match self.events.try_recv() {
                Ok(event) => Some(event),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    self.state = PollState::Failed;
                    return Some(PollEvent::Failed(ClientError::Network(
                        "Polling stopped unexpectedly".to_string(),
                    )));
                }
            },
            Some(timeout) => self.events.recv_timeout(timeout).ok(),
        };

        if let Some(ref event) = received {
            self.state = match event {
                PollEvent::Completed(_) => PollState::Completed,
                PollEvent::Failed(_) => PollState::Failed,
            };
            self.cancel_tx = None;
        }
        received
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn cancelled(cancel_rx: &Receiver<()>) -> bool {
    !matches!(cancel_rx.try_recv(), Err(TryRecvError::Empty))
}

fn run_loop(
    backend: &dyn Backend,
    query_id: &str,
    interval: Duration,
    cancel_rx: Receiver<()>,
    events: Sender<PollEvent>,
) {
    let mut tick = 0u32;
    loop {
        match cancel_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        tick += 1;
        tracing::debug!(query_id, tick, "Fetching query status");
        let outcome = match backend.query_status(query_id) {
            Ok(status) if status.is_completed() => PollEvent::Completed(status.response),
            Ok(status) if status.is_error() => PollEvent::Failed(ClientError::Backend(
                status.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
            Ok(status) => {
                tracing::debug!(query_id, status = %status.status, "Query not finished");
                continue;
            }
            Err(e) => PollEvent::Failed(e),
        };

        if cancelled(&cancel_rx) {
            return;
        }
        if let PollEvent::Completed(_) = outcome {
            tracing::info!(query_id, tick, "Query completed");
        }
        let _ = events.send(outcome);
        return;
    }
}

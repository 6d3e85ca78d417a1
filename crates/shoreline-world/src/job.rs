//! One-shot background work with cooperative cancellation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use shoreline_terrain::{CancelToken, Cancelled};

use crate::error::GenerationError;

/// Work running on its own named thread.
///
/// The worker publishes its complete result once through a single-slot
/// channel; [`poll`](Self::poll) never blocks. Dropping the job trips its
/// cancel token.
pub struct BackgroundJob<T> {
    name: &'static str,
    cancel: CancelToken,
    receiver: Option<Receiver<Result<T, GenerationError>>>,
    started: Instant,
}

impl<T: Send + 'static> BackgroundJob<T> {
    /// Start `work` on a thread called `name`.
    ///
    /// A panic inside `work` is reported as [`GenerationError::WorkerPanicked`].
    pub fn spawn<F>(name: &'static str, work: F) -> Self
    where
        F: FnOnce(&CancelToken) -> Result<T, Cancelled> + Send + 'static,
    {
        let cancel = CancelToken::new();
        let (sender, receiver) = bounded(1);
        let token = cancel.clone();

        std::thread::Builder::new()
            .name(name.into())
            .spawn(move || {
                let outcome = match panic::catch_unwind(AssertUnwindSafe(|| work(&token))) {
                    Ok(result) => result.map_err(GenerationError::from),
                    Err(payload) => Err(GenerationError::WorkerPanicked {
                        worker: name,
                        message: panic_message(payload.as_ref()),
                    }),
                };
                // The receiver is gone if the job was dropped; nobody wants the result.
                let _ = sender.send(outcome);
            })
            .expect("Failed to spawn world generation worker thread");

        tracing::debug!(worker = name, "background job started");
        Self {
            name,
            cancel,
            receiver: Some(receiver),
            started: Instant::now(),
        }
    }
}

impl<T> BackgroundJob<T> {
    /// `Some` exactly once, when the worker has published its outcome.
    pub fn poll(&mut self) -> Option<Result<T, GenerationError>> {
        let receiver = self.receiver.as_ref()?;
        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(GenerationError::WorkerPanicked {
                worker: self.name,
                message: "worker exited without a result".to_string(),
            }),
        };
        self.receiver = None;
        tracing::debug!(
            worker = self.name,
            elapsed_ms = self.elapsed().as_millis() as u64,
            ok = outcome.is_ok(),
            "background job finished"
        );
        Some(outcome)
    }

    /// Ask the worker to stop at its next check.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the outcome has already been taken.
    pub fn is_consumed(&self) -> bool {
        self.receiver.is_none()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl<T> Drop for BackgroundJob<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

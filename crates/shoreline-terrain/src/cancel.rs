//! Cooperative cancellation shared between the frame loop and a background worker.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The distinguished outcome of a generation step that noticed a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("generation cancelled")]
pub struct Cancelled;

/// A flag any thread may trip and long loops poll.
///
/// Clones share the same flag. Tripping is one-way.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Workers notice at their next check.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once cancellation has been requested.
    #[inline]
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const RUNNING: u8 = 0;
const STOPPING: u8 = 1;
const CLOSED: u8 = 2;

/// Where a tier is in its `Running -> Stopping -> Closed` lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierState {
    Running,
    Stopping,
    Closed,
}

impl TierState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            RUNNING => TierState::Running,
            STOPPING => TierState::Stopping,
            _ => TierState::Closed,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("listener already closed")]
    AlreadyClosed,
}

/// Shared handle over the single listener a tier owns.
///
/// Clones observe the same state. The listener is released exactly once, by
/// whichever of a stop command or a termination signal gets there first.
#[derive(Debug, Clone)]
pub struct ListenerHandle {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: AtomicU8,
    token: CancellationToken,
}

impl ListenerHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: AtomicU8::new(RUNNING),
                token: CancellationToken::new(),
            }),
        }
    }

    pub fn state(&self) -> TierState {
        TierState::from_raw(self.inner.state.load(Ordering::Acquire))
    }

    /// `Running -> Stopping`. Returns `false` when a stop is already underway
    /// or the listener is gone.
    pub fn begin_stop(&self) -> bool {
        self.inner
            .state
            .compare_exchange(RUNNING, STOPPING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the listener. Any later call fails with [`LifecycleError::AlreadyClosed`].
    pub fn close(&self) -> Result<(), LifecycleError> {
        if self.inner.state.swap(CLOSED, Ordering::AcqRel) == CLOSED {
            return Err(LifecycleError::AlreadyClosed);
        }
        self.inner.token.cancel();
        Ok(())
    }

    /// [`close`](Self::close) for callers nobody is waiting on: a double close is logged, not returned.
    pub fn close_or_warn(&self, trigger: &'static str) {
        match self.close() {
            Ok(()) => info!(trigger, "listener closed"),
            Err(e) => warn!(trigger, error = %e, "listener close ignored"),
        }
    }

    /// Resolves once [`close`](Self::close) has been called.
    pub async fn closed(&self) {
        self.inner.token.cancelled().await
    }

    pub fn is_closed(&self) -> bool {
        self.inner.token.is_cancelled()
    }
}

impl Default for ListenerHandle {
    fn default() -> Self {
        Self::new()
    }
}

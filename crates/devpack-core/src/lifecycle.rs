//! One-shot `Pending -> Initialized -> Online` lifecycle for the development driver.

use crate::error::DevpackError;
use log::debug;
use std::sync::Arc;
use tokio::sync::watch;

/// Development driver state. Only ever moves forward, one step at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    /// Waiting for the host to mount the middleware.
    #[default]
    Pending,
    /// Middleware attached and compiler created; no build finished yet.
    Initialized,
    /// First build finished; stats are available.
    Online,
}

impl LifecycleState {
    fn next(self) -> Option<Self> {
        match self {
            LifecycleState::Pending => Some(LifecycleState::Initialized),
            LifecycleState::Initialized => Some(LifecycleState::Online),
            LifecycleState::Online => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct LifecycleStatus {
    state: LifecycleState,
    failure: Option<String>,
}

/// Watchable lifecycle shared between the driver and its watcher task.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    sender: Arc<watch::Sender<LifecycleStatus>>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            sender: Arc::new(watch::Sender::new(LifecycleStatus::default())),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.sender.borrow().state
    }

    /// Cause recorded by `fail`, if any.
    pub fn failure(&self) -> Option<String> {
        self.sender.borrow().failure.clone()
    }

    /// Move to `to`, which must be the direct successor of the current state.
    pub fn advance(&self, to: LifecycleState) -> Result<(), DevpackError> {
        let mut result = Ok(());
        self.sender.send_if_modified(|status| {
            if let Some(failure) = &status.failure {
                result = Err(DevpackError::LifecycleFailed(failure.clone()));
                return false;
            }
            if status.state.next() != Some(to) {
                result = Err(DevpackError::InvalidTransition {
                    from: status.state,
                    to,
                });
                return false;
            }
            debug!("lifecycle transition {:?} -> {:?}", status.state, to);
            status.state = to;
            true
        });
        result
    }

    /// Record a fatal error; every current and future waiter receives it.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.sender.send_if_modified(|status| {
            if status.failure.is_some() {
                return false;
            }
            status.failure = Some(message);
            true
        });
    }

    /// Wait until the lifecycle reaches `target` or fails.
    pub async fn wait_for(&self, target: LifecycleState) -> Result<(), DevpackError> {
        let mut receiver = self.sender.subscribe();
        let status = receiver
            .wait_for(|status| status.state >= target || status.failure.is_some())
            .await
            .map_err(|_| DevpackError::LifecycleClosed)?;
        if status.state >= target {
            return Ok(());
        }
        Err(DevpackError::LifecycleFailed(
            status.failure.clone().unwrap_or_default(),
        ))
    }
}

//! Error types for assembly and the bundler drivers.

use crate::lifecycle::LifecycleState;
use devpack_config::ConfigError;
use thiserror::Error;

/// Errors returned by assembly, drivers, and collaborators.
#[derive(Debug, Error)]
pub enum DevpackError {
    /// Loading, validating, or enhancing the config failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Development mode needs `options.server` to report a reachable URL.
    #[error("A server config is required")]
    MissingServerConfig,
    /// The compiler could not be created or a build failed to run.
    #[error("compiler error: {0}")]
    Compiler(String),
    /// The host rejected a middleware attachment.
    #[error("middleware error: {0}")]
    Middleware(String),
    /// The lifecycle only moves forward one step at a time.
    #[error("invalid lifecycle transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
    /// Initialization failed earlier; waiters observe the recorded cause.
    #[error("lifecycle failed: {0}")]
    LifecycleFailed(String),
    /// The driver was dropped while a caller was waiting on it.
    #[error("lifecycle closed")]
    LifecycleClosed,
}

//! Middleware host collaborator.

use crate::compiler::{BuildStats, Compiler};
use crate::error::DevpackError;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Values the development driver shares with the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevLocals {
    /// Stats of the most recent build.
    pub stats: Option<BuildStats>,
    /// Number of completed builds.
    pub builds: u64,
}

/// Shared, lock-protected locals.
pub type SharedLocals = Arc<RwLock<DevLocals>>;

/// Mount notification from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEvent {
    /// Path prefix the embedded middleware was mounted at, e.g. `/` or `/assets/`.
    pub mount_path: String,
}

impl MountEvent {
    pub fn new(mount_path: impl Into<String>) -> Self {
        Self {
            mount_path: mount_path.into(),
        }
    }
}

/// Middleware attached to the host, in attachment order.
#[derive(Clone)]
pub enum Middleware {
    /// Serves compiled bundles from the compiler's output.
    BundleServing {
        compiler: Arc<dyn Compiler>,
        /// Suppress per-request build info.
        quiet: bool,
    },
    /// Streams hot-update events to connected clients.
    HotUpdates { compiler: Arc<dyn Compiler> },
}

impl Middleware {
    pub fn name(&self) -> &'static str {
        match self {
            Middleware::BundleServing { .. } => "bundle-serving",
            Middleware::HotUpdates { .. } => "hot-updates",
        }
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Middleware::BundleServing { quiet, .. } => f
                .debug_struct("BundleServing")
                .field("quiet", quiet)
                .finish_non_exhaustive(),
            Middleware::HotUpdates { .. } => f.debug_struct("HotUpdates").finish_non_exhaustive(),
        }
    }
}

/// Embeddable request-handling unit owned by the host application.
pub trait MiddlewareHost: Send + Sync {
    /// Attach one middleware behind the ones already attached. Attachments
    /// are never rolled back; a failed later attach leaves earlier ones in place.
    fn attach(&self, middleware: Middleware) -> Result<(), DevpackError>;

    /// Publish the driver's locals to the parent application.
    fn expose_locals(&self, _locals: SharedLocals) {}
}

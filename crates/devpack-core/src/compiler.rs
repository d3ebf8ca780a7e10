//! Compiler collaborator traits.

use crate::error::DevpackError;
use async_trait::async_trait;
use devpack_config::BundlerConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Summary of one completed build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Build hash reported by the compiler.
    pub hash: String,
    /// Wall-clock build time in milliseconds.
    pub duration_ms: u64,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl BuildStats {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A compiler instance built from a finished config.
pub trait Compiler: Send + Sync {
    /// Subscribe to build-completed notifications. Watching compilers send
    /// one message per rebuild.
    fn subscribe(&self) -> broadcast::Receiver<BuildStats>;

    /// Run a single build to completion.
    fn run(&self) -> Result<BuildStats, DevpackError>;
}

/// Creates compilers; the drivers hand it the config once assembly is done.
#[async_trait]
pub trait CompilerFactory: Send + Sync {
    async fn create(&self, config: BundlerConfig) -> Result<Arc<dyn Compiler>, DevpackError>;
}

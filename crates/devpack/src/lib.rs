//! Bundler configuration enhancement for development and production hosts.
//!
//! `devpack` loads a project's per-environment bundler config, applies the
//! standard presets, and drives compiler creation. In development the driver
//! waits for the host to mount its middleware before creating the compiler
//! and reports readiness once the first build has finished.
//!
//! ```no_run
//! use devpack::{HostOptions, ProductionDriver};
//! # async fn build(factory: &dyn devpack::CompilerFactory) -> Result<(), devpack::DevpackError> {
//! let driver = ProductionDriver::new("/srv/site", &HostOptions::default(), None, factory).await?;
//! driver.run()?;
//! # Ok(())
//! # }
//! ```

pub use devpack_config as config;
pub use devpack_core as core;

pub use devpack_config::{BundlerConfig, ConfigError, HostOptions, ServerOptions, enhance};
pub use devpack_core::{
    BuildStats, Compiler, CompilerFactory, ConfigAssembler, DevelopmentDriver, DevpackError,
    LifecycleState, Middleware, MiddlewareHost, Mode, MountEvent, ProductionDriver, SharedLocals,
};

/// Wire `log` output to env_logger when the `logging` feature is enabled.
///
/// Without the feature this does nothing. Safe to call more than once.
#[inline]
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

//! Production driver: assemble once, create the compiler once.

use crate::assembler::{ConfigAssembler, Mode};
use crate::compiler::{BuildStats, Compiler, CompilerFactory};
use crate::error::DevpackError;
use devpack_config::{BundlerConfig, HostOptions};
use log::info;
use std::path::Path;
use std::sync::Arc;

pub struct ProductionDriver {
    config: BundlerConfig,
    compiler: Arc<dyn Compiler>,
}

impl ProductionDriver {
    /// Assemble the production config for `root_dir` and create its compiler.
    pub async fn new(
        root_dir: impl AsRef<Path>,
        options: &HostOptions,
        explicit: Option<BundlerConfig>,
        factory: &dyn CompilerFactory,
    ) -> Result<Self, DevpackError> {
        Self::with_assembler(ConfigAssembler::new(root_dir), options, explicit, factory).await
    }

    pub async fn with_assembler(
        assembler: ConfigAssembler,
        options: &HostOptions,
        explicit: Option<BundlerConfig>,
        factory: &dyn CompilerFactory,
    ) -> Result<Self, DevpackError> {
        let config = assembler.assemble(options, Mode::Production, explicit)?;
        let compiler = factory.create(config.clone()).await?;
        Ok(Self { config, compiler })
    }

    /// The config the compiler was created from.
    pub fn config(&self) -> &BundlerConfig {
        &self.config
    }

    pub fn compiler(&self) -> Arc<dyn Compiler> {
        self.compiler.clone()
    }

    /// Run one production build.
    pub fn run(&self) -> Result<BuildStats, DevpackError> {
        let stats = self.compiler.run()?;
        info!(
            "production build {} finished in {}ms",
            stats.hash, stats.duration_ms
        );
        Ok(stats)
    }
}

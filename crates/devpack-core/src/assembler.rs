//! Config assembly: load or accept a config, validate it, apply base presets.

use crate::error::DevpackError;
use devpack_config::{BundlerConfig, HostOptions, enhance};
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

/// Config directory relative to the project root.
pub const DEFAULT_CONFIG_SUBDIR: &str = "project/webpack";

/// Build mode a config is assembled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    /// Variant tag of the config file serving this mode.
    pub fn tag(self) -> &'static str {
        match self {
            Mode::Development => "dev",
            Mode::Production => "prod",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Development => f.write_str("development"),
            Mode::Production => f.write_str("production"),
        }
    }
}

/// Produces base-enhanced configs for a project root.
#[derive(Debug, Clone)]
pub struct ConfigAssembler {
    root_dir: PathBuf,
    config_dir: PathBuf,
}

impl ConfigAssembler {
    /// Assembler reading configs from `<root_dir>/project/webpack`.
    ///
    /// A relative `root_dir` is resolved against the current directory, so
    /// the context, alias and fallback paths written by the presets are
    /// always absolute.
    pub fn new(root_dir: impl AsRef<Path>) -> Self {
        let root_dir = root_dir.as_ref();
        let root_dir = std::path::absolute(root_dir).unwrap_or_else(|err| {
            warn!(
                "cannot resolve project root {} ({err}); using it as given",
                root_dir.display()
            );
            root_dir.to_path_buf()
        });
        let config_dir = root_dir.join(DEFAULT_CONFIG_SUBDIR);
        Self {
            root_dir,
            config_dir,
        }
    }

    /// Read config files from a different directory.
    pub fn with_config_dir(mut self, config_dir: impl AsRef<Path>) -> Self {
        self.config_dir = config_dir.as_ref().to_path_buf();
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Assemble the config for `mode`.
    ///
    /// `explicit` replaces the on-disk config when given. Development mode
    /// checks `options.server` before anything else is touched.
    pub fn assemble(
        &self,
        options: &HostOptions,
        mode: Mode,
        explicit: Option<BundlerConfig>,
    ) -> Result<BundlerConfig, DevpackError> {
        if mode == Mode::Development && options.server.is_none() {
            return Err(DevpackError::MissingServerConfig);
        }

        let mut config = match explicit {
            Some(config) => {
                debug!("using caller-supplied config ({mode})");
                config
            }
            None => devpack_config::load(&self.config_dir, mode.tag())?,
        };

        config.validate()?;
        enhance::add_base_presets(&mut config, &self.root_dir)?;
        info!(
            "assembled {} config (root={})",
            mode,
            self.root_dir.display()
        );
        Ok(config)
    }
}

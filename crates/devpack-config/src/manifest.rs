//! Package manifest access.

use crate::ConfigError;
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file name expected in a project or module root.
pub const MANIFEST_FILE: &str = "package.json";

/// The subset of a package manifest devpack cares about.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PackageManifest {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageManifest {
    /// Read and parse `package.json` from `module_dir`.
    pub fn read(module_dir: &Path) -> Result<Self, ConfigError> {
        let path = module_dir.join(MANIFEST_FILE);
        debug!("reading package manifest (path={})", path.display());
        let contents = fs::read_to_string(&path).map_err(|err| manifest_error(&path, err))?;
        let manifest: PackageManifest =
            serde_json::from_str(&contents).map_err(|err| manifest_error(&path, err))?;
        if manifest.name.trim().is_empty() {
            return Err(ConfigError::ManifestRead {
                path,
                message: "package name is empty".to_string(),
            });
        }
        Ok(manifest)
    }
}

fn manifest_error(path: &Path, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::ManifestRead {
        path: PathBuf::from(path),
        message: err.to_string(),
    }
}

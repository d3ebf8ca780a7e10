//! Config variant lookup and loading.
//!
//! A config directory holds `config.<ext>` plus any number of
//! `config.<variant>.<ext>` files. Files are parsed as JSON5, schema-checked,
//! and decoded into a `BundlerConfig`.

mod schema;

#[cfg(test)]
mod tests;

use crate::{BundlerConfig, ConfigError};
use log::{debug, info, warn};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `config.js`, `config.dev.js`, ... The optional middle segment is the variant tag.
static CONFIG_FILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^config\.(?:([^.]+)\.)?[^.]+$").expect("valid config pattern"));

/// A config file found on disk and the variant tag it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigVariant {
    /// Variant tag, empty for the default `config.<ext>` file.
    pub tag: String,
    /// Absolute path of the file.
    pub path: PathBuf,
}

impl BundlerConfig {
    /// Load a single config from a path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading bundler config from path: {}", path.display());
        let contents = fs::read_to_string(path)?;
        let value: Value = json5::from_str(&contents)?;
        config_from_value(value, &path.display().to_string())
    }

    /// Load a single config from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading bundler config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }
}

/// List every config variant in `directory`, sorted by tag.
///
/// File names are visited in ascending order; when two files serve the same
/// tag (`config.dev.js` and `config.dev.json5`) the later name wins.
pub fn discover(directory: &Path) -> Result<Vec<ConfigVariant>, ConfigError> {
    Ok(variant_table(directory)?
        .into_iter()
        .map(|(tag, path)| ConfigVariant { tag, path })
        .collect())
}

/// Find the config file serving `variant` in `directory`.
///
/// Returns `Ok(None)` when nothing matches, including when the directory
/// does not exist.
pub fn locate(directory: &Path, variant: &str) -> Result<Option<PathBuf>, ConfigError> {
    let mut table = variant_table(directory)?;
    Ok(table.remove(variant))
}

/// Locate and load the config for `variant` in `directory`.
///
/// A missing file is `ConfigError::NotFound`; a present file that fails to
/// parse surfaces the parser error as-is.
pub fn load(directory: &Path, variant: &str) -> Result<BundlerConfig, ConfigError> {
    let Some(path) = locate(directory, variant)? else {
        return Err(ConfigError::NotFound {
            variant: variant.to_string(),
            directory: directory.to_path_buf(),
        });
    };
    BundlerConfig::load_from_path(path)
}

fn variant_table(directory: &Path) -> Result<BTreeMap<String, PathBuf>, ConfigError> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("config directory missing: {}", directory.display());
            return Ok(BTreeMap::new());
        }
        Err(err) => return Err(ConfigError::Read(err)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        // Symlinked configs count; dangling links are skipped.
        let is_file = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata.is_file(),
            Err(err) if err.kind() == ErrorKind::NotFound => false,
            Err(err) => return Err(ConfigError::Read(err)),
        };
        if !is_file {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();

    let mut table = BTreeMap::new();
    for name in names {
        let Some(captures) = CONFIG_FILE_PATTERN.captures(&name) else {
            continue;
        };
        let tag = captures
            .get(1)
            .map(|tag| tag.as_str().to_string())
            .unwrap_or_default();
        let path = directory.join(&name);
        if let Some(shadowed) = table.insert(tag.clone(), path) {
            warn!(
                "config variant \"{}\" defined more than once; {} is shadowed by {}",
                tag,
                shadowed.display(),
                name
            );
        }
    }
    debug!(
        "discovered config variants (dir={}, tags={:?})",
        directory.display(),
        table.keys().collect::<Vec<_>>()
    );
    Ok(table)
}

fn config_from_value(value: Value, label: &str) -> Result<BundlerConfig, ConfigError> {
    schema::validate_config_schema(&value, label)?;
    let config: BundlerConfig = serde_json::from_value(value)?;
    Ok(config)
}

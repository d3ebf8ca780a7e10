//! Bundler configuration models, file-based variant lookup, and the
//! enhancement presets applied before a config reaches the compiler.
//!
//! This crate owns the config schema, validation, and the in-place
//! enhancer functions used by the development and production drivers.

pub mod enhance;
mod error;
mod locator;
mod manifest;
mod model;

/// Public error type returned by config loading, validation, and enhancement.
pub use error::ConfigError;
/// Config file discovery and loading.
pub use locator::{ConfigVariant, discover, load, locate};
/// Package manifest access used for self-reference aliases.
pub use manifest::{MANIFEST_FILE, PackageManifest};
/// Configuration schema models.
pub use model::*;

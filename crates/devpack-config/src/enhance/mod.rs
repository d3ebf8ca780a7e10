//! In-place enhancements applied to a `BundlerConfig` before compilation.
//!
//! Every function mutates the config it is given and hands the same
//! reference back so calls can be chained. Callers that need the original
//! untouched must clone first.
//!
//! `add_context`, `add_self_reference` and `add_node_modules_fallback` never
//! overwrite or duplicate existing values. `add_sourcemaps` and
//! `add_hot_module_replacement` append their plugin descriptors on every
//! call, so running a preset twice on the same config appends twice.

#[cfg(test)]
mod tests;

use crate::{BundlerConfig, ConfigError, PackageManifest, PluginDescriptor};
use log::debug;
use std::path::Path;

/// Source-map strategy used when the config does not pick one.
pub const DEFAULT_DEVTOOL: &str = "cheap-module-eval-source-map";
/// Plugin emitting source maps for CSS.
pub const CSS_SOURCEMAP_PLUGIN: &str = "CssSourcemapPlugin";
/// Plugin enabling hot module replacement in the bundle runtime.
pub const HOT_MODULE_REPLACEMENT_PLUGIN: &str = "HotModuleReplacementPlugin";
/// Client module that connects a bundle to the hot-update event stream.
pub const HOT_CLIENT_MODULE: &str = "webpack-hot-middleware/client";
/// Event stream path below the mount path.
pub const HOT_EVENT_PATH: &str = "__webpack_hmr";
/// Directory appended to module resolution fallbacks.
pub const NODE_MODULES_DIR: &str = "node_modules";

/// Set `context` to `context_dir` unless it is already set.
pub fn add_context<'a>(config: &'a mut BundlerConfig, context_dir: &Path) -> &'a mut BundlerConfig {
    if config.context.is_none() {
        debug!("setting config context to {}", context_dir.display());
        config.context = Some(context_dir.to_path_buf());
    }
    config
}

/// Alias the package found in `module_dir` to `module_dir` itself so the
/// project can import itself by name. An existing alias is kept.
pub fn add_self_reference<'a>(
    config: &'a mut BundlerConfig,
    module_dir: &Path,
) -> Result<&'a mut BundlerConfig, ConfigError> {
    let manifest = PackageManifest::read(module_dir)?;
    config
        .resolve
        .alias
        .entry(manifest.name)
        .or_insert_with(|| module_dir.to_path_buf());
    Ok(config)
}

/// Append `module_dir/node_modules` to `resolve.fallback` once.
pub fn add_node_modules_fallback<'a>(
    config: &'a mut BundlerConfig,
    module_dir: &Path,
) -> &'a mut BundlerConfig {
    let node_modules = module_dir.join(NODE_MODULES_DIR);
    if !config.resolve.fallback.contains(&node_modules) {
        debug!("adding resolve fallback {}", node_modules.display());
        config.resolve.fallback.push(node_modules);
    }
    config
}

/// Default `devtool` and append the CSS source-map plugin.
pub fn add_sourcemaps(config: &mut BundlerConfig) -> &mut BundlerConfig {
    if config.devtool.is_none() {
        config.devtool = Some(DEFAULT_DEVTOOL.to_string());
    }
    config.plugins.push(PluginDescriptor::new(CSS_SOURCEMAP_PLUGIN));
    config
}

/// Append the hot-module-replacement plugin and prepend the hot client to
/// every entry point.
pub fn add_hot_module_replacement<'a>(
    config: &'a mut BundlerConfig,
    mount_path: &str,
) -> &'a mut BundlerConfig {
    config
        .plugins
        .push(PluginDescriptor::new(HOT_MODULE_REPLACEMENT_PLUGIN));
    let reference = hot_client_reference(mount_path);
    if let Some(entry) = config.entry.as_mut() {
        entry.prepend(&reference);
    }
    config
}

/// Set `output.publicPath` to `<base_url><mount>/` unless already set.
///
/// Source maps for CSS only resolve against an absolute public path.
pub fn add_public_path<'a>(
    config: &'a mut BundlerConfig,
    base_url: &str,
    mount_path: &str,
) -> &'a mut BundlerConfig {
    if config.output.public_path.is_none() {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
        config.output.public_path = Some(format!("{base_url}{}/", normalize_mount_path(mount_path)));
    }
    config
}

/// Context, self reference, and node_modules fallback for `root_dir`.
pub fn add_base_presets<'a>(
    config: &'a mut BundlerConfig,
    root_dir: &Path,
) -> Result<&'a mut BundlerConfig, ConfigError> {
    add_context(config, root_dir);
    add_self_reference(config, root_dir)?;
    Ok(add_node_modules_fallback(config, root_dir))
}

/// Source maps and hot module replacement for the given mount path.
pub fn add_dev_presets<'a>(config: &'a mut BundlerConfig, mount_path: &str) -> &'a mut BundlerConfig {
    add_sourcemaps(config);
    add_hot_module_replacement(config, mount_path)
}

/// Entry reference that boots the hot client against `mount_path`.
pub fn hot_client_reference(mount_path: &str) -> String {
    let mount_path = normalize_mount_path(mount_path);
    format!(
        "{HOT_CLIENT_MODULE}?path={mount_path}/{HOT_EVENT_PATH}&timeout=20000&noInfo=true&reload=false"
    )
}

/// Strip one trailing slash, so `/` becomes the empty prefix.
pub fn normalize_mount_path(mount_path: &str) -> &str {
    mount_path.strip_suffix('/').unwrap_or(mount_path)
}

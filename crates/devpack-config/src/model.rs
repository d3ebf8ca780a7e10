//! Configuration schema for bundler configs and host options.

use crate::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Bundler configuration handed to the compiler.
///
/// Known keys are typed; everything else is kept in `extra` and written back
/// untouched when the config is serialized.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    /// Base directory for resolving relative references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Entry>,
    /// Source-map strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devtool: Option<String>,
    #[serde(default)]
    pub resolve: ResolveConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub plugins: Vec<PluginDescriptor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BundlerConfig {
    /// Start building a config programmatically.
    pub fn builder() -> BundlerConfigBuilder {
        BundlerConfigBuilder::new()
    }

    /// Validate invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(context) = &self.context
            && !context.is_absolute()
        {
            return Err(ConfigError::InvalidField {
                path: "context".to_string(),
                message: format!("must be an absolute path, got {}", context.display()),
            });
        }

        match &self.entry {
            Some(Entry::Single(point)) => validate_entry_point(point, "entry")?,
            Some(Entry::Named(points)) => {
                if points.is_empty() {
                    return Err(ConfigError::InvalidField {
                        path: "entry".to_string(),
                        message: "named entry map must not be empty".to_string(),
                    });
                }
                for (name, point) in points {
                    if name.trim().is_empty() {
                        return Err(ConfigError::InvalidField {
                            path: "entry".to_string(),
                            message: "entry names must not be empty".to_string(),
                        });
                    }
                    validate_entry_point(point, &format!("entry.{name}"))?;
                }
            }
            None => {}
        }

        if self.resolve.alias.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::InvalidField {
                path: "resolve.alias".to_string(),
                message: "alias names must not be empty".to_string(),
            });
        }

        for (idx, plugin) in self.plugins.iter().enumerate() {
            if plugin.name.trim().is_empty() {
                return Err(ConfigError::InvalidField {
                    path: format!("plugins[{idx}].name"),
                    message: "plugin name must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn validate_entry_point(point: &EntryPoint, path: &str) -> Result<(), ConfigError> {
    let references = point.references();
    if references.is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_string(),
            message: "entry point must reference at least one module".to_string(),
        });
    }
    if references.iter().any(|reference| reference.trim().is_empty()) {
        return Err(ConfigError::InvalidField {
            path: path.to_string(),
            message: "entry references must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Builder for assembling a `BundlerConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct BundlerConfigBuilder {
    config: BundlerConfig,
}

impl BundlerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(mut self, context: impl Into<PathBuf>) -> Self {
        self.config.context = Some(context.into());
        self
    }

    pub fn entry(mut self, entry: Entry) -> Self {
        self.config.entry = Some(entry);
        self
    }

    pub fn devtool(mut self, devtool: impl Into<String>) -> Self {
        self.config.devtool = Some(devtool.into());
        self
    }

    pub fn alias(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.config.resolve.alias.insert(name.into(), path.into());
        self
    }

    pub fn fallback(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.resolve.fallback.push(path.into());
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.path = Some(path.into());
        self
    }

    pub fn plugin(mut self, plugin: PluginDescriptor) -> Self {
        self.config.plugins.push(plugin);
        self
    }

    /// Finalize and return the built `BundlerConfig`.
    pub fn build(self) -> BundlerConfig {
        self.config
    }
}

/// Either one entry point or a map of bundle name to entry point. Named
/// entries keep the order they were declared in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Entry {
    Single(EntryPoint),
    Named(IndexMap<String, EntryPoint>),
}

impl Entry {
    /// Entry with a single module reference.
    pub fn single(reference: impl Into<String>) -> Self {
        Entry::Single(EntryPoint::Path(reference.into()))
    }

    /// Entry map built from `(bundle name, module reference)` pairs.
    pub fn named<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Entry::Named(
            entries
                .into_iter()
                .map(|(name, reference)| (name.into(), EntryPoint::Path(reference.into())))
                .collect(),
        )
    }

    /// Prepend `reference` to every entry point, whatever the entry shape.
    pub fn prepend(&mut self, reference: &str) {
        match self {
            Entry::Single(point) => point.prepend(reference),
            Entry::Named(points) => {
                for point in points.values_mut() {
                    point.prepend(reference);
                }
            }
        }
    }
}

/// One entry point: a module reference or an ordered chain of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EntryPoint {
    Path(String),
    Chain(Vec<String>),
}

impl EntryPoint {
    /// All module references in load order.
    pub fn references(&self) -> Vec<&str> {
        match self {
            EntryPoint::Path(reference) => vec![reference.as_str()],
            EntryPoint::Chain(references) => references.iter().map(String::as_str).collect(),
        }
    }

    /// Turn the entry point into a chain starting with `reference`.
    pub fn prepend(&mut self, reference: &str) {
        let mut chain = vec![reference.to_string()];
        match std::mem::replace(self, EntryPoint::Chain(Vec::new())) {
            EntryPoint::Path(existing) => chain.push(existing),
            EntryPoint::Chain(existing) => chain.extend(existing),
        }
        *self = EntryPoint::Chain(chain);
    }
}

/// Module resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResolveConfig {
    /// Module name to absolute path.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alias: BTreeMap<String, PathBuf>,
    /// Directories searched after primary resolution; a single string is
    /// accepted on input and normalized into a sequence.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub fallback: Vec<PathBuf>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(PathBuf),
        Many(Vec<PathBuf>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(path) => vec![path],
        OneOrMany::Many(paths) => paths,
    })
}

/// Bundle output settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// URL prefix the bundles are served from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Named plugin plus free-form options, instantiated by the compiler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PluginDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// Options supplied by the host application.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HostOptions {
    /// Required for development mode.
    #[serde(default)]
    pub server: Option<ServerOptions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HostOptions {
    pub fn with_server(port: u16) -> Self {
        Self {
            server: Some(ServerOptions {
                port,
                address: None,
            }),
            extra: Map::new(),
        }
    }
}

/// Where the host's HTTP server listens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerOptions {
    pub port: u16,
    #[serde(default)]
    pub address: Option<String>,
}

impl ServerOptions {
    /// Reachable base URL, without a trailing slash.
    pub fn url(&self) -> String {
        let address = self
            .address
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .unwrap_or("localhost");
        format!("http://{address}:{}", self.port)
    }
}

//! Shape checks for raw bundler configs before they are decoded.
//!
//! Unknown keys are allowed anywhere; only the keys the enhancer reads or
//! writes are checked.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Location of a value inside one config source, used to label errors.
#[derive(Debug, Clone)]
struct FieldPath<'a> {
    source: &'a str,
    segments: String,
}

impl<'a> FieldPath<'a> {
    fn root(source: &'a str) -> Self {
        Self {
            source,
            segments: String::new(),
        }
    }

    fn key(&self, key: &str) -> Self {
        let segments = if self.segments.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.segments)
        };
        Self {
            source: self.source,
            segments,
        }
    }

    fn index(&self, idx: usize) -> Self {
        Self {
            source: self.source,
            segments: format!("{}[{idx}]", self.segments),
        }
    }

    fn reject(&self, message: &str) -> ConfigError {
        let at = if self.segments.is_empty() {
            "root"
        } else {
            self.segments.as_str()
        };
        ConfigError::InvalidField {
            path: format!("{}:{at}", self.source),
            message: message.to_string(),
        }
    }

    fn object<'v>(&self, value: &'v Value) -> Result<&'v Map<String, Value>, ConfigError> {
        value.as_object().ok_or_else(|| self.reject("expected object"))
    }

    fn string(&self, value: &Value) -> Result<(), ConfigError> {
        value
            .as_str()
            .map(|_| ())
            .ok_or_else(|| self.reject("expected string"))
    }

    /// A single string or an array of strings, the shape shared by entry
    /// points and resolve fallbacks.
    fn string_or_strings(&self, value: &Value) -> Result<(), ConfigError> {
        match value {
            Value::String(_) => Ok(()),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(idx, item)| self.index(idx).string(item)),
            _ => Err(self.reject("expected string or array of strings")),
        }
    }
}

/// Validate a raw config value loaded from `source`.
pub(super) fn validate_config_schema(value: &Value, source: &str) -> Result<(), ConfigError> {
    let root = FieldPath::root(source);
    let map = root.object(value)?;

    for key in ["context", "devtool"] {
        if let Some(value) = map.get(key) {
            root.key(key).string(value)?;
        }
    }
    if let Some(value) = map.get("entry") {
        check_entry(value, &root.key("entry"))?;
    }
    if let Some(value) = map.get("resolve") {
        check_resolve(value, &root.key("resolve"))?;
    }
    if let Some(value) = map.get("output") {
        let at = root.key("output");
        let output = at.object(value)?;
        for key in ["path", "publicPath"] {
            if let Some(value) = output.get(key) {
                at.key(key).string(value)?;
            }
        }
    }
    if let Some(value) = map.get("plugins") {
        check_plugins(value, &root.key("plugins"))?;
    }
    Ok(())
}

/// `entry` is one entry point or an object of named entry points.
fn check_entry(value: &Value, at: &FieldPath<'_>) -> Result<(), ConfigError> {
    match value.as_object() {
        Some(named) => named
            .iter()
            .try_for_each(|(name, point)| at.key(name).string_or_strings(point)),
        None => at.string_or_strings(value),
    }
}

fn check_resolve(value: &Value, at: &FieldPath<'_>) -> Result<(), ConfigError> {
    let resolve = at.object(value)?;
    if let Some(alias) = resolve.get("alias") {
        let alias_at = at.key("alias");
        for (name, target) in alias_at.object(alias)? {
            alias_at.key(name).string(target)?;
        }
    }
    if let Some(fallback) = resolve.get("fallback") {
        at.key("fallback").string_or_strings(fallback)?;
    }
    Ok(())
}

/// Every plugin is an object carrying a string `name`.
fn check_plugins(value: &Value, at: &FieldPath<'_>) -> Result<(), ConfigError> {
    let plugins = value
        .as_array()
        .ok_or_else(|| at.reject("expected array"))?;
    for (idx, plugin) in plugins.iter().enumerate() {
        let plugin_at = at.index(idx);
        let name_at = plugin_at.key("name");
        match plugin_at.object(plugin)?.get("name") {
            Some(name) => name_at.string(name)?,
            None => return Err(name_at.reject("missing required field")),
        }
    }
    Ok(())
}

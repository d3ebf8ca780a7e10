//! Tests for config enhancement primitives and presets.

use super::*;
use crate::{Entry, EntryPoint, MANIFEST_FILE};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const HOT_OPTIONS: &str = "path=/__webpack_hmr&timeout=20000&noInfo=true&reload=false";

/// Create a module directory with a package manifest named `name`.
fn module_dir(name: &str) -> TempDir {
    let temp = TempDir::new().expect("tmp");
    fs::write(
        temp.path().join(MANIFEST_FILE),
        format!(r#"{{ "name": "{name}", "version": "1.0.0" }}"#),
    )
    .expect("manifest");
    temp
}

#[test]
fn add_context_sets_missing_context() {
    let mut config = BundlerConfig::default();
    add_context(&mut config, Path::new("/srv/app"));
    assert_eq!(config.context, Some(PathBuf::from("/srv/app")));
}

#[test]
fn add_context_keeps_existing_context() {
    let mut config = BundlerConfig::builder().context("/srv/original").build();
    add_context(&mut config, Path::new("/srv/app"));
    assert_eq!(config.context, Some(PathBuf::from("/srv/original")));
}

#[test]
fn add_self_reference_aliases_package_name() {
    let module = module_dir("demo-package");
    let mut config = BundlerConfig::default();
    add_self_reference(&mut config, module.path()).expect("self reference");
    assert_eq!(
        config.resolve.alias.get("demo-package"),
        Some(&module.path().to_path_buf())
    );
}

#[test]
fn add_self_reference_keeps_existing_alias() {
    let module = module_dir("demo-package");
    let mut config = BundlerConfig::builder()
        .alias("demo-package", "/elsewhere")
        .build();
    add_self_reference(&mut config, module.path()).expect("self reference");
    assert_eq!(
        config.resolve.alias.get("demo-package"),
        Some(&PathBuf::from("/elsewhere"))
    );
}

#[test]
fn add_self_reference_fails_without_manifest() {
    let temp = TempDir::new().expect("tmp");
    let mut config = BundlerConfig::default();
    let err = add_self_reference(&mut config, temp.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ManifestRead { .. }));
    assert!(config.resolve.alias.is_empty());
}

#[test]
fn add_self_reference_fails_on_invalid_manifest() {
    let temp = TempDir::new().expect("tmp");
    fs::write(temp.path().join(MANIFEST_FILE), "{ name: ").expect("manifest");
    let mut config = BundlerConfig::default();
    let err = add_self_reference(&mut config, temp.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ManifestRead { .. }));
}

#[test]
fn add_node_modules_fallback_on_empty_config() {
    let mut config = BundlerConfig::default();
    add_node_modules_fallback(&mut config, Path::new("/srv/app"));
    assert_eq!(
        config.resolve.fallback,
        vec![PathBuf::from("/srv/app/node_modules")]
    );
}

#[test]
fn add_node_modules_fallback_keeps_scalar_fallback() {
    let mut config =
        BundlerConfig::load_from_str(r#"{ resolve: { fallback: "demo" } }"#).expect("config");
    add_node_modules_fallback(&mut config, Path::new("/srv/app"));
    assert_eq!(
        config.resolve.fallback,
        vec![
            PathBuf::from("demo"),
            PathBuf::from("/srv/app/node_modules")
        ]
    );
}

#[test]
fn add_node_modules_fallback_does_not_duplicate() {
    let mut config = BundlerConfig::default();
    add_node_modules_fallback(&mut config, Path::new("/srv/app"));
    add_node_modules_fallback(&mut config, Path::new("/srv/app"));
    assert_eq!(config.resolve.fallback.len(), 1);
}

#[test]
fn add_sourcemaps_defaults_devtool_and_appends_plugin() {
    let mut config = BundlerConfig::default();
    add_sourcemaps(&mut config);
    assert_eq!(config.devtool.as_deref(), Some(DEFAULT_DEVTOOL));
    assert_eq!(config.plugins, vec![PluginDescriptor::new(CSS_SOURCEMAP_PLUGIN)]);
}

/// Plugins are appended on every call, even when devtool is already set.
#[test]
fn add_sourcemaps_keeps_devtool_but_still_appends() {
    let mut config = BundlerConfig::builder().devtool("eval").build();
    add_sourcemaps(&mut config);
    assert_eq!(config.devtool.as_deref(), Some("eval"));
    assert_eq!(config.plugins.len(), 1);

    add_sourcemaps(&mut config);
    assert_eq!(config.plugins.len(), 2);
}

#[test]
fn hot_module_replacement_prepends_to_single_entry() {
    let mut config = BundlerConfig::builder()
        .entry(Entry::single("./demo.js"))
        .build();
    add_hot_module_replacement(&mut config, "/");

    let Some(Entry::Single(EntryPoint::Chain(chain))) = &config.entry else {
        panic!("expected a chained single entry");
    };
    assert_eq!(chain.len(), 2);
    assert!(chain[0].contains(HOT_OPTIONS));
    assert_eq!(chain[1], "./demo.js");
    assert_eq!(
        config.plugins,
        vec![PluginDescriptor::new(HOT_MODULE_REPLACEMENT_PLUGIN)]
    );
}

#[test]
fn hot_module_replacement_prepends_to_named_entries() {
    let mut config = BundlerConfig::builder()
        .entry(Entry::named([("demo", "./demo.js"), ("admin", "./admin.js")]))
        .build();
    add_hot_module_replacement(&mut config, "/");

    let Some(Entry::Named(points)) = &config.entry else {
        panic!("expected named entries");
    };
    for (name, expected) in [("demo", "./demo.js"), ("admin", "./admin.js")] {
        let EntryPoint::Chain(chain) = &points[name] else {
            panic!("expected chain for {name}");
        };
        assert_eq!(chain.len(), 2);
        assert!(chain[0].contains(HOT_OPTIONS));
        assert_eq!(chain[1], expected);
    }
}

#[test]
fn hot_module_replacement_keeps_existing_chain_order() {
    let mut config = BundlerConfig::builder()
        .entry(Entry::Single(EntryPoint::Chain(vec![
            "./polyfills.js".to_string(),
            "./main.js".to_string(),
        ])))
        .build();
    add_hot_module_replacement(&mut config, "/app/");

    let Some(Entry::Single(point)) = &config.entry else {
        panic!("expected single entry");
    };
    assert_eq!(
        point.references(),
        vec![
            "webpack-hot-middleware/client?path=/app/__webpack_hmr&timeout=20000&noInfo=true&reload=false",
            "./polyfills.js",
            "./main.js",
        ]
    );
}

#[test]
fn hot_module_replacement_without_entry_only_adds_plugin() {
    let mut config = BundlerConfig::default();
    add_hot_module_replacement(&mut config, "/");
    assert_eq!(config.entry, None);
    assert_eq!(config.plugins.len(), 1);
}

#[test]
fn public_path_defaults_to_url_and_mount() {
    let mut config = BundlerConfig::default();
    add_public_path(&mut config, "http://localhost:8080", "/assets/");
    assert_eq!(
        config.output.public_path.as_deref(),
        Some("http://localhost:8080/assets/")
    );

    add_public_path(&mut config, "http://other:1", "/");
    assert_eq!(
        config.output.public_path.as_deref(),
        Some("http://localhost:8080/assets/")
    );
}

#[test]
fn base_presets_apply_context_alias_and_fallback() {
    let module = module_dir("site");
    let root = module.path();
    let mut config = BundlerConfig::builder()
        .entry(Entry::single("./entry.js"))
        .build();
    add_base_presets(&mut config, root).expect("base presets");

    assert_eq!(config.context, Some(root.to_path_buf()));
    assert_eq!(config.resolve.alias.get("site"), Some(&root.to_path_buf()));
    assert_eq!(config.resolve.fallback, vec![root.join("node_modules")]);
    assert_eq!(config.entry, Some(Entry::single("./entry.js")));
    assert!(config.plugins.is_empty());
}

#[test]
fn dev_presets_apply_sourcemaps_then_hot_reload() {
    let mut config = BundlerConfig::builder()
        .entry(Entry::single("./entry.js"))
        .build();
    add_dev_presets(&mut config, "/");

    let names: Vec<&str> = config.plugins.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![CSS_SOURCEMAP_PLUGIN, HOT_MODULE_REPLACEMENT_PLUGIN]
    );
    assert_eq!(config.devtool.as_deref(), Some(DEFAULT_DEVTOOL));
}

#[test]
fn mount_path_strips_one_trailing_slash() {
    assert_eq!(normalize_mount_path("/"), "");
    assert_eq!(normalize_mount_path("/app/"), "/app");
    assert_eq!(normalize_mount_path("/app"), "/app");
}

//! Tests for config variant lookup and loading.

use super::*;
use crate::{Entry, EntryPoint};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write contents to a path, creating parent directories if needed.
fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

#[test]
fn locates_default_and_tagged_variants() {
    let temp = TempDir::new().expect("tmp");
    let dir = temp.path();
    write_file(&dir.join("config.js"), "{}");
    write_file(&dir.join("config.dev.js"), "{}");
    write_file(&dir.join("config.prod.json5"), "{}");

    assert_eq!(locate(dir, "").expect("locate"), Some(dir.join("config.js")));
    assert_eq!(
        locate(dir, "dev").expect("locate"),
        Some(dir.join("config.dev.js"))
    );
    assert_eq!(
        locate(dir, "prod").expect("locate"),
        Some(dir.join("config.prod.json5"))
    );
    assert_eq!(locate(dir, "test").expect("locate"), None);
}

#[test]
fn ignores_names_outside_the_pattern() {
    let temp = TempDir::new().expect("tmp");
    let dir = temp.path();
    write_file(&dir.join("config.a.b.js"), "{}");
    write_file(&dir.join("webpack.config.js"), "{}");
    write_file(&dir.join("other.dev.js"), "{}");
    fs::create_dir_all(dir.join("config.dir.js")).expect("dir");

    let variants = discover(dir).expect("discover");
    assert_eq!(variants, Vec::new());
}

/// Duplicate tags resolve to the lexicographically last file name.
#[test]
fn duplicate_tags_resolve_last_wins() {
    let temp = TempDir::new().expect("tmp");
    let dir = temp.path();
    write_file(&dir.join("config.dev.js"), "{ devtool: \"eval\" }");
    write_file(&dir.join("config.dev.json5"), "{ devtool: \"source-map\" }");

    assert_eq!(
        locate(dir, "dev").expect("locate"),
        Some(dir.join("config.dev.json5"))
    );
    let config = load(dir, "dev").expect("load");
    assert_eq!(config.devtool.as_deref(), Some("source-map"));
}

#[test]
fn discover_lists_variants_sorted_by_tag() {
    let temp = TempDir::new().expect("tmp");
    let dir = temp.path();
    write_file(&dir.join("config.prod.js"), "{}");
    write_file(&dir.join("config.js"), "{}");
    write_file(&dir.join("config.dev.js"), "{}");

    let tags: Vec<String> = discover(dir)
        .expect("discover")
        .into_iter()
        .map(|variant| variant.tag)
        .collect();
    assert_eq!(tags, vec!["", "dev", "prod"]);
}

#[test]
fn missing_directory_is_not_found() {
    let temp = TempDir::new().expect("tmp");
    let dir = temp.path().join("absent");

    assert_eq!(locate(&dir, "dev").expect("locate"), None);
    let err = load(&dir, "dev").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn not_found_message_names_variant_and_directory() {
    let temp = TempDir::new().expect("tmp");
    let dir = temp.path();
    write_file(&dir.join("config.prod.js"), "{}");

    let err = load(dir, "dev").unwrap_err();
    assert!(err.is_not_found());
    let msg = err.to_string();
    assert!(msg.contains("\"dev\""));
    assert!(msg.contains(&dir.display().to_string()));
}

#[test]
fn invalid_syntax_is_a_parse_error_not_not_found() {
    let temp = TempDir::new().expect("tmp");
    let dir = temp.path();
    write_file(&dir.join("config.dev.js"), "{ entry: ");

    let err = load(dir, "dev").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn loads_json5_with_both_entry_shapes() {
    let single = BundlerConfig::load_from_str(
        r#"{
            // comments are allowed
            entry: './entry.js',
            output: { path: '/tmp/dist', publicPath: '/assets/' },
        }"#,
    )
    .expect("single");
    assert_eq!(single.entry, Some(Entry::single("./entry.js")));
    assert_eq!(single.output.public_path.as_deref(), Some("/assets/"));

    let named = BundlerConfig::load_from_str(
        r#"{ entry: { app: './app.js', vendor: ['./a.js', './b.js'] } }"#,
    )
    .expect("named");
    let Some(Entry::Named(points)) = named.entry else {
        panic!("expected named entry");
    };
    assert_eq!(points["app"], EntryPoint::Path("./app.js".to_string()));
    assert_eq!(
        points["vendor"],
        EntryPoint::Chain(vec!["./a.js".to_string(), "./b.js".to_string()])
    );
}

#[test]
fn scalar_fallback_is_normalized_on_load() {
    let config = BundlerConfig::load_from_str(r#"{ resolve: { fallback: 'demo' } }"#)
        .expect("config");
    assert_eq!(config.resolve.fallback, vec![std::path::PathBuf::from("demo")]);
}

#[test]
fn unknown_keys_round_trip() {
    let config = BundlerConfig::load_from_str(
        r#"{ target: 'web', module: { rules: [] }, resolve: { extensions: ['.js'] } }"#,
    )
    .expect("config");
    assert_eq!(config.extra["target"], serde_json::json!("web"));
    assert_eq!(
        config.resolve.extra["extensions"],
        serde_json::json!([".js"])
    );

    let value = serde_json::to_value(&config).expect("serialize");
    assert_eq!(value["module"], serde_json::json!({ "rules": [] }));
}

#[test]
fn rejects_wrongly_typed_known_keys() {
    let err = BundlerConfig::load_from_str(r#"{ resolve: { alias: { demo: 3 } } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("resolve.alias.demo"));

    let err = BundlerConfig::load_from_str(r#"{ plugins: [{ options: {} }] }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("plugins[0].name"));

    let err = BundlerConfig::load_from_str(r#"[]"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("root"));
}

#[test]
fn load_from_path_labels_errors_with_the_file() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("config.js");
    write_file(&path, "{ entry: 42 }");

    let err = BundlerConfig::load_from_path(&path).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains(&path.display().to_string()));
    assert!(msg.contains("entry"));
}

#[cfg(unix)]
#[test]
fn symlinked_config_files_are_located() {
    let temp = TempDir::new().expect("tmp");
    let dir = temp.path();
    let shared = dir.join("shared").join("base.json5");
    write_file(&shared, "{ devtool: 'source-map' }");
    std::os::unix::fs::symlink(&shared, dir.join("config.dev.js")).expect("symlink");
    std::os::unix::fs::symlink(dir.join("missing.js"), dir.join("config.prod.js"))
        .expect("dangling symlink");

    assert_eq!(
        locate(dir, "dev").expect("locate"),
        Some(dir.join("config.dev.js"))
    );
    assert_eq!(locate(dir, "prod").expect("locate"), None);
    let config = load(dir, "dev").expect("load");
    assert_eq!(config.devtool.as_deref(), Some("source-map"));
}

#[test]
fn named_entries_keep_declaration_order() {
    let config = BundlerConfig::load_from_str(
        r#"{ entry: { zeta: './z.js', alpha: './a.js', mid: './m.js' } }"#,
    )
    .expect("config");
    let Some(Entry::Named(points)) = &config.entry else {
        panic!("expected named entry");
    };
    let names: Vec<&str> = points.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);

    let value = serde_json::to_value(&config).expect("serialize");
    let serialized: Vec<&str> = value["entry"]
        .as_object()
        .expect("entry object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(serialized, vec!["zeta", "alpha", "mid"]);
}

use devpack_core::DEFAULT_CONFIG_SUBDIR;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary project root with a package manifest and config directory.
#[derive(Debug)]
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Project whose `package.json` is named `package_name`.
    pub fn new(package_name: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let manifest = serde_json::json!({ "name": package_name, "version": "1.0.0" });
        fs::write(
            dir.path().join("package.json"),
            serde_json::to_string_pretty(&manifest).expect("manifest json"),
        )
        .expect("write manifest");
        fs::create_dir_all(dir.path().join(DEFAULT_CONFIG_SUBDIR)).expect("config dir");
        Self { dir }
    }

    /// Project without a package manifest.
    pub fn without_manifest() -> Self {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join(DEFAULT_CONFIG_SUBDIR)).expect("config dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join(DEFAULT_CONFIG_SUBDIR)
    }

    /// Write `config.<file_suffix>` into the config directory.
    pub fn write_config(&self, file_suffix: &str, contents: &str) -> PathBuf {
        let path = self.config_dir().join(format!("config.{file_suffix}"));
        fs::write(&path, contents).expect("write config");
        path
    }
}

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::suite::Module;

/// Configuration for a self-check run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Modules whose cases run. Empty means all of them.
    pub modules: Vec<Module>,
    /// Stop at the first failing case.
    pub fail_fast: bool,
    /// Directory the config was loaded from.
    pub root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            fail_fast: false,
            root: PathBuf::from("."),
        }
    }
}

/// Config as stored in utilkit.toml or Cargo.toml metadata.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    modules: Option<Vec<String>>,
    fail_fast: Option<bool>,
}

/// Cargo.toml metadata section.
#[derive(Debug, Deserialize)]
struct CargoMetadata {
    #[serde(default)]
    package: Option<CargoPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    #[serde(default)]
    metadata: Option<CargoPackageMetadata>,
}

#[derive(Debug, Deserialize)]
struct CargoPackageMetadata {
    #[serde(default)]
    utilkit: Option<FileConfig>,
}

impl Config {
    /// Load config with the following precedence:
    /// 1. CLI overrides (applied by the caller after this method)
    /// 2. utilkit.toml in the root
    /// 3. [package.metadata.utilkit] in Cargo.toml
    /// 4. Defaults
    ///
    /// A Cargo.toml that fails to parse is skipped; a malformed utilkit.toml
    /// is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let mut config = Config {
            root: root.to_path_buf(),
            ..Default::default()
        };

        let cargo_toml = root.join("Cargo.toml");
        if cargo_toml.exists()
            && let Ok(content) = std::fs::read_to_string(&cargo_toml)
            && let Ok(cargo) = toml::from_str::<CargoMetadata>(&content)
            && let Some(pkg) = cargo.package
            && let Some(meta) = pkg.metadata
            && let Some(utilkit) = meta.utilkit
        {
            config.apply_file_config(&utilkit, &cargo_toml)?;
        }

        let utilkit_toml = root.join("utilkit.toml");
        if utilkit_toml.exists() {
            let content = std::fs::read_to_string(&utilkit_toml)?;
            let file_config =
                toml::from_str::<FileConfig>(&content).map_err(|e| Error::ConfigParse {
                    path: utilkit_toml.clone(),
                    message: e.to_string(),
                })?;
            config.apply_file_config(&file_config, &utilkit_toml)?;
        }

        Ok(config)
    }

    fn apply_file_config(&mut self, fc: &FileConfig, path: &Path) -> Result<()> {
        if let Some(ref names) = fc.modules {
            self.modules = parse_modules(names).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        if let Some(v) = fc.fail_fast {
            self.fail_fast = v;
        }
        Ok(())
    }

    /// Whether cases of `module` are selected.
    pub fn includes(&self, module: Module) -> bool {
        self.modules.is_empty() || self.modules.contains(&module)
    }
}

/// Parse module names, keeping order and dropping repeats.
pub fn parse_modules<S: AsRef<str>>(names: &[S]) -> Result<Vec<Module>> {
    let mut modules = Vec::new();
    for name in names {
        let module: Module = name.as_ref().parse()?;
        if !modules.contains(&module) {
            modules.push(module);
        }
    }
    Ok(modules)
}

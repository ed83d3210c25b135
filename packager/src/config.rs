//! Packager configuration.
//!
//! Settings come from an optional `packager.toml` in the project directory,
//! with command-line flags taking precedence. Every key is optional; an absent
//! file yields the defaults below.
//!
//! ```toml
//! package_name = "pdb-handler-wasm"
//! build_name = "pdb_handler_wasm"
//! out_dir = "pkg"
//! build_manifest = "Cargo.toml"
//! readme = "README.md"
//! target = "web"
//! ```

use crate::cli::Cli;
use crate::compiler::BuildTarget;
use crate::error::{PackagerError, Result};
use crate::fs::FileSystem;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// File name looked up in the project directory when no explicit
/// configuration path is given.
pub const CONFIG_FILE_NAME: &str = "packager.toml";

/// Resolved packager settings. Paths are relative to the project directory
/// unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackagerConfig {
    /// Public package name written to the manifest.
    pub package_name: String,
    /// Internal build name the compiler names its artefacts after.
    pub build_name: String,
    /// Output directory for the compiled package.
    pub out_dir: Utf8PathBuf,
    /// Build manifest declaring the package version.
    pub build_manifest: Utf8PathBuf,
    /// Documentation file shipped with the package.
    pub readme: Utf8PathBuf,
    /// Binding flavour requested from the compiler.
    pub target: BuildTarget,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            package_name: "pdb-handler-wasm".to_owned(),
            build_name: "pdb_handler_wasm".to_owned(),
            out_dir: Utf8PathBuf::from("pkg"),
            build_manifest: Utf8PathBuf::from("Cargo.toml"),
            readme: Utf8PathBuf::from("README.md"),
            target: BuildTarget::Web,
        }
    }
}

impl PackagerConfig {
    /// Parse configuration text read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidConfig`] if the text is not valid TOML
    /// or contains unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use wasm_packager::config::PackagerConfig;
    ///
    /// let config = PackagerConfig::parse(Utf8Path::new("packager.toml"), "out_dir = \"dist\"")?;
    /// assert_eq!(config.out_dir, "dist");
    /// assert_eq!(config.package_name, "pdb-handler-wasm");
    /// # Ok::<(), wasm_packager::error::PackagerError>(())
    /// ```
    pub fn parse(path: &Utf8Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PackagerError::InvalidConfig {
            path: path.to_owned(),
            reason: e.message().to_owned(),
        })
    }

    /// Load configuration for `project_dir`.
    ///
    /// An explicit path must exist. Without one, `packager.toml` in the
    /// project directory is used when present and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ConfigUnreadable`] if the file cannot be read,
    /// or [`PackagerError::InvalidConfig`] if it cannot be parsed.
    pub fn load(
        fs: &dyn FileSystem,
        project_dir: &Utf8Path,
        explicit: Option<&Utf8Path>,
    ) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_owned(),
            None => {
                let path = project_dir.join(CONFIG_FILE_NAME);
                if !fs.exists(&path) {
                    log::debug!("no {CONFIG_FILE_NAME} in {project_dir}; using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = fs
            .read_to_string(&path)
            .map_err(|source| PackagerError::ConfigUnreadable {
                path: path.clone(),
                source,
            })?;
        log::debug!("loaded configuration from {path}");
        Self::parse(&path, &contents)
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(name) = &cli.name {
            self.package_name.clone_from(name);
        }
        if let Some(build_name) = &cli.build_name {
            self.build_name.clone_from(build_name);
        }
        if let Some(out_dir) = &cli.out_dir {
            self.out_dir.clone_from(out_dir);
        }
        if let Some(readme) = &cli.readme {
            self.readme.clone_from(readme);
        }
        if let Some(target) = cli.target {
            self.target = target;
        }
        self
    }
}

//! Package manifest construction and persistence.
//!
//! The manifest is the terminal artefact of a pipeline run. It is assembled
//! completely in memory and then written with a single atomic replace, so a
//! reader never observes a partially written `package.json`.
//!
//! ```json
//! {
//!   "name": "pkg-name",
//!   "version": "0.3.1",
//!   "module": "pkg_name.js",
//!   "types": "pkg_name.d.ts",
//!   "type": "module",
//!   "files": ["pkg_name_bg.wasm", "pkg_name.js", "pkg_name.d.ts", "README.md"],
//!   "sideEffects": false
//! }
//! ```

use crate::error::{PackagerError, Result};
use crate::fs::FileSystem;
use crate::package_name::PackageName;
use crate::renamer::ArtifactKind;
use crate::version::PackageVersion;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// File name of the package manifest inside the output directory.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Module format of the emitted bindings.
const MODULE_TYPE: &str = "module";

/// The package manifest written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    name: String,
    version: PackageVersion,
    module: String,
    types: String,
    #[serde(rename = "type")]
    module_type: String,
    files: Vec<String>,
    side_effects: bool,
}

impl PackageManifest {
    /// Build the manifest for `package` at `version` listing `files`.
    ///
    /// Entry points are derived from the package's module stem. The
    /// side-effects flag is always `false`: importing the package performs
    /// no side effects.
    ///
    /// # Examples
    ///
    /// ```
    /// use wasm_packager::manifest::PackageManifest;
    /// use wasm_packager::package_name::PackageName;
    /// use wasm_packager::version::PackageVersion;
    ///
    /// let manifest = PackageManifest::new(
    ///     &PackageName::try_from("pkg-name")?,
    ///     PackageVersion::try_from("0.3.1")?,
    ///     vec!["pkg_name.js".to_owned()],
    /// );
    /// assert_eq!(manifest.module(), "pkg_name.js");
    /// assert_eq!(manifest.types(), "pkg_name.d.ts");
    /// assert!(!manifest.side_effects());
    /// # Ok::<(), wasm_packager::error::PackagerError>(())
    /// ```
    #[must_use]
    pub fn new(package: &PackageName, version: PackageVersion, files: Vec<String>) -> Self {
        Self {
            name: package.as_str().to_owned(),
            version,
            module: package.module_file(),
            types: package.types_file(),
            module_type: MODULE_TYPE.to_owned(),
            files,
            side_effects: false,
        }
    }

    /// Return the package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the package version.
    #[must_use]
    pub fn version(&self) -> &PackageVersion {
        &self.version
    }

    /// Return the module entry path.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Return the type-declaration entry path.
    #[must_use]
    pub fn types(&self) -> &str {
        &self.types
    }

    /// Return the published file list.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Return whether importing the package has side effects.
    #[must_use]
    pub fn side_effects(&self) -> bool {
        self.side_effects
    }

    /// Serialize to pretty-printed JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ManifestSerialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|source| PackagerError::ManifestSerialization { source })?;
        json.push('\n');
        Ok(json)
    }
}

/// Select the publishable files from an output directory listing.
///
/// Compiled artefacts come first, grouped by kind (WebAssembly, JavaScript,
/// declarations) and sorted by name within a group. The bundled
/// documentation file, when present, is appended last. Anything else in the
/// directory (toolchain leftovers, the manifest itself) is not published.
///
/// # Examples
///
/// ```
/// use wasm_packager::manifest::publishable_files;
///
/// let listing = [".gitignore", "README.md", "pkg.d.ts", "pkg.js", "pkg_bg.wasm"]
///     .map(String::from);
/// assert_eq!(
///     publishable_files(&listing, Some("README.md")),
///     ["pkg_bg.wasm", "pkg.js", "pkg.d.ts", "README.md"]
/// );
/// ```
#[must_use]
pub fn publishable_files(listing: &[String], documentation: Option<&str>) -> Vec<String> {
    let mut artefacts: Vec<(ArtifactKind, &String)> = listing
        .iter()
        .filter_map(|name| ArtifactKind::from_file_name(name).map(|kind| (kind, name)))
        .collect();
    artefacts.sort();
    artefacts.dedup();

    let mut files: Vec<String> = artefacts.into_iter().map(|(_, name)| name.clone()).collect();
    if let Some(doc) = documentation {
        if !files.iter().any(|name| name == doc) {
            files.push(doc.to_owned());
        }
    }
    files
}

/// Write `manifest` to `out_dir`, replacing any previous manifest.
///
/// # Errors
///
/// Returns [`PackagerError::ManifestSerialization`] if serialization fails or
/// [`PackagerError::WriteFailure`] if the file cannot be persisted.
pub fn write_manifest(
    fs: &dyn FileSystem,
    out_dir: &Utf8Path,
    manifest: &PackageManifest,
) -> Result<Utf8PathBuf> {
    let json = manifest.to_json()?;
    let path = out_dir.join(MANIFEST_FILE_NAME);
    fs.write_atomic(&path, json.as_bytes())
        .map_err(|source| PackagerError::WriteFailure {
            path: path.clone(),
            source,
        })?;
    log::debug!("wrote package manifest {path}");
    Ok(path)
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;

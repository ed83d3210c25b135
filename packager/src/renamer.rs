//! Artefact renaming from the internal build name to the public name.
//!
//! The compiler names its outputs after the internal build name (for example
//! `pdb_handler_wasm_bg.wasm`). Publishing requires those artefacts to carry
//! the public package's module stem instead (`pkg_name_bg.wasm`). Renames are
//! performed one file at a time with an atomic rename, and re-running the
//! renamer on an already-normalised directory changes nothing.

use crate::error::{PackagerError, Result};
use crate::fs::FileSystem;
use crate::package_name::PackageName;
use camino::Utf8Path;

/// Kinds of compiled artefacts subject to renaming and publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArtifactKind {
    /// A WebAssembly binary.
    Wasm,
    /// A JavaScript binding module.
    JavaScript,
    /// A TypeScript declaration file.
    TypeDeclaration,
}

impl ArtifactKind {
    /// Classify a file name by extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use wasm_packager::renamer::ArtifactKind;
    ///
    /// assert_eq!(ArtifactKind::from_file_name("x_bg.wasm"), Some(ArtifactKind::Wasm));
    /// assert_eq!(ArtifactKind::from_file_name("x.d.ts"), Some(ArtifactKind::TypeDeclaration));
    /// assert_eq!(ArtifactKind::from_file_name("README.md"), None);
    /// ```
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".d.ts") {
            Some(Self::TypeDeclaration)
        } else if name.ends_with(".wasm") {
            Some(Self::Wasm)
        } else if name.ends_with(".js") {
            Some(Self::JavaScript)
        } else {
            None
        }
    }
}

/// Renames compiler outputs in an output directory.
#[derive(Debug, Clone)]
pub struct ArtifactRenamer<'a> {
    build_name: &'a str,
    package: &'a PackageName,
}

impl<'a> ArtifactRenamer<'a> {
    /// Create a renamer mapping `build_name` to the module stem of `package`.
    #[must_use]
    pub fn new(build_name: &'a str, package: &'a PackageName) -> Self {
        Self {
            build_name,
            package,
        }
    }

    /// Compute the public name for `file_name`, or `None` if the file is not
    /// a compiler artefact that still carries the internal build name.
    ///
    /// # Examples
    ///
    /// ```
    /// use wasm_packager::package_name::PackageName;
    /// use wasm_packager::renamer::ArtifactRenamer;
    ///
    /// let package = PackageName::try_from("pkg-name")?;
    /// let renamer = ArtifactRenamer::new("internalname", &package);
    /// assert_eq!(
    ///     renamer.renamed("internalname_foo.wasm").as_deref(),
    ///     Some("pkg_name_foo.wasm")
    /// );
    /// assert_eq!(renamer.renamed("README.md"), None);
    /// # Ok::<(), wasm_packager::error::PackagerError>(())
    /// ```
    #[must_use]
    pub fn renamed(&self, file_name: &str) -> Option<String> {
        ArtifactKind::from_file_name(file_name)?;
        let stem = self.package.module_stem();
        // A public stem that extends the build name would otherwise match
        // again on a second run.
        if stem.starts_with(self.build_name) && file_name.starts_with(&stem) {
            return None;
        }
        let suffix = file_name.strip_prefix(self.build_name)?;
        let new_name = format!("{stem}{suffix}");
        (new_name != file_name).then_some(new_name)
    }

    /// Rename every matching artefact in `out_dir` and return the final file
    /// names, including files that needed no rename.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::OutputDirectoryMissing`] if `out_dir` does not
    /// exist, [`PackagerError::OutputDirectoryUnreadable`] if it cannot be
    /// listed, or [`PackagerError::RenameFailed`] if a rename fails. Renames
    /// completed before a failure are kept.
    pub fn rename_all(&self, fs: &dyn FileSystem, out_dir: &Utf8Path) -> Result<Vec<String>> {
        if !fs.is_dir(out_dir) {
            return Err(PackagerError::OutputDirectoryMissing {
                path: out_dir.to_owned(),
            });
        }

        let entries = fs
            .list_dir(out_dir)
            .map_err(|source| PackagerError::OutputDirectoryUnreadable {
                path: out_dir.to_owned(),
                source,
            })?;

        let mut final_names = Vec::with_capacity(entries.len());
        for name in entries {
            match self.renamed(&name) {
                Some(new_name) => {
                    let from = out_dir.join(&name);
                    let to = out_dir.join(&new_name);
                    fs.rename(&from, &to)
                        .map_err(|source| PackagerError::RenameFailed {
                            from: from.clone(),
                            to: to.clone(),
                            source,
                        })?;
                    log::trace!("renamed {from} -> {to}");
                    final_names.push(new_name);
                }
                None => final_names.push(name),
            }
        }

        final_names.sort();
        final_names.dedup();
        Ok(final_names)
    }
}

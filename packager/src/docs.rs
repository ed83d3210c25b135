//! Documentation bundling.
//!
//! Copies the project's human-readable documentation into the output
//! directory so it ships with the package. A missing documentation file is a
//! soft condition: it is logged and the pipeline carries on.

use crate::error::{PackagerError, Result};
use crate::fs::FileSystem;
use camino::{Utf8Path, Utf8PathBuf};

/// What the bundler did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentationOutcome {
    /// The file was copied; holds its name inside the output directory.
    Bundled(String),
    /// No documentation file was found at the given path.
    Skipped {
        /// Path that was checked.
        missing: Utf8PathBuf,
    },
}

impl DocumentationOutcome {
    /// Return the bundled file name, if any.
    #[must_use]
    pub fn bundled_file(&self) -> Option<&str> {
        match self {
            Self::Bundled(name) => Some(name),
            Self::Skipped { .. } => None,
        }
    }
}

/// Copy `source` into `out_dir`, overwriting any previous copy.
///
/// # Errors
///
/// Returns [`PackagerError::DocumentationCopyFailed`] if the file exists but
/// cannot be copied.
pub fn bundle_documentation(
    fs: &dyn FileSystem,
    source: &Utf8Path,
    out_dir: &Utf8Path,
) -> Result<DocumentationOutcome> {
    let Some(file_name) = source.file_name() else {
        log::warn!("documentation path {source} has no file name; skipping");
        return Ok(DocumentationOutcome::Skipped {
            missing: source.to_owned(),
        });
    };

    if !fs.exists(source) {
        log::warn!("documentation file {source} not found; skipping");
        return Ok(DocumentationOutcome::Skipped {
            missing: source.to_owned(),
        });
    }

    let destination = out_dir.join(file_name);
    fs.copy(source, &destination)
        .map_err(|err| PackagerError::DocumentationCopyFailed {
            from: source.to_owned(),
            to: destination.clone(),
            source: err,
        })?;
    log::debug!("copied {source} to {destination}");
    Ok(DocumentationOutcome::Bundled(file_name.to_owned()))
}

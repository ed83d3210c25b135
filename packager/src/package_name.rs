//! Public package name newtype.
//!
//! The public name is what consumers install from the registry. It is
//! distinct from the internal build name the compiler uses when naming its
//! output files, and it also determines the module-facing file stem
//! (hyphens mapped to underscores).

use crate::error::{PackagerError, Result};
use std::fmt;

/// Longest name the npm registry accepts.
const MAX_LEN: usize = 214;

/// Extension of the module entry point.
const MODULE_EXTENSION: &str = ".js";

/// Extension of the type-declaration entry point.
const TYPES_EXTENSION: &str = ".d.ts";

/// A validated public package name.
///
/// # Examples
///
/// ```
/// use wasm_packager::package_name::PackageName;
///
/// let name = PackageName::try_from("pdb-handler-wasm")?;
/// assert_eq!(name.module_stem(), "pdb_handler_wasm");
/// assert_eq!(name.module_file(), "pdb_handler_wasm.js");
/// assert_eq!(name.types_file(), "pdb_handler_wasm.d.ts");
/// # Ok::<(), wasm_packager::error::PackagerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the file stem used for compiled artefacts.
    #[must_use]
    pub fn module_stem(&self) -> String {
        self.0.replace('-', "_")
    }

    /// Return the module entry file name.
    #[must_use]
    pub fn module_file(&self) -> String {
        format!("{}{MODULE_EXTENSION}", self.module_stem())
    }

    /// Return the type-declaration entry file name.
    #[must_use]
    pub fn types_file(&self) -> String {
        format!("{}{TYPES_EXTENSION}", self.module_stem())
    }
}

impl TryFrom<&str> for PackageName {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        validate_package_name(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for PackageName {
    type Error = PackagerError;

    fn try_from(value: String) -> Result<Self> {
        validate_package_name(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn invalid(value: &str, reason: impl Into<String>) -> PackagerError {
    PackagerError::InvalidPackageName {
        value: value.to_owned(),
        reason: reason.into(),
    }
}

/// Validate `value` against the unscoped npm naming rules.
fn validate_package_name(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(value, "name must not be empty"));
    }
    if value.len() > MAX_LEN {
        return Err(invalid(
            value,
            format!("name must be at most {MAX_LEN} characters, got {}", value.len()),
        ));
    }
    if value.starts_with('.') || value.starts_with('_') {
        return Err(invalid(value, "name must not start with '.' or '_'"));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(value, format!("unsupported character '{bad}'")));
    }
    Ok(())
}

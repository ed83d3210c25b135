//! Package version resolution from the build manifest.
//!
//! The published package version always mirrors the version declared in the
//! source project's build manifest. The manifest must contain exactly one
//! whole line of the form `version = "<value>"` and the value must be a
//! semantic version. No fallback version is ever substituted.

use crate::error::{PackagerError, Result};
use crate::fs::FileSystem;
use camino::Utf8Path;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic version grammar: `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`.
static SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[0-9]+\.[0-9]+\.[0-9]+",
        r"(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?",
        r"(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$",
    ))
    .expect("semantic version pattern is valid")
});

/// A validated semantic version string.
///
/// # Examples
///
/// ```
/// use wasm_packager::version::PackageVersion;
///
/// let version = PackageVersion::try_from("0.3.1-beta.2+build.7")?;
/// assert_eq!(version.as_str(), "0.3.1-beta.2+build.7");
/// assert!(PackageVersion::try_from("1.2").is_err());
/// # Ok::<(), wasm_packager::error::PackagerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageVersion(String);

impl PackageVersion {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PackageVersion {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        validate_version(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for PackageVersion {
    type Error = PackagerError;

    fn try_from(value: String) -> Result<Self> {
        validate_version(&value)?;
        Ok(Self(value))
    }
}

impl From<PackageVersion> for String {
    fn from(version: PackageVersion) -> Self {
        version.0
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_version(value: &str) -> Result<()> {
    if SEMVER.is_match(value) {
        Ok(())
    } else {
        Err(PackagerError::InvalidVersionFormat {
            value: value.to_owned(),
        })
    }
}

/// Read the build manifest at `manifest_path` and return its version.
///
/// # Errors
///
/// - [`PackagerError::ManifestMissing`] if the manifest does not exist.
/// - [`PackagerError::ManifestUnreadable`] if it cannot be read.
/// - [`PackagerError::VersionFieldMissing`] if no line declares a version.
/// - [`PackagerError::AmbiguousVersionField`] if several lines do.
/// - [`PackagerError::InvalidVersionFormat`] if the value is not semver.
pub fn resolve_version(fs: &dyn FileSystem, manifest_path: &Utf8Path) -> Result<PackageVersion> {
    if !fs.exists(manifest_path) {
        return Err(PackagerError::ManifestMissing {
            path: manifest_path.to_owned(),
        });
    }

    let contents =
        fs.read_to_string(manifest_path)
            .map_err(|source| PackagerError::ManifestUnreadable {
                path: manifest_path.to_owned(),
                source,
            })?;

    let value = find_version_value(manifest_path, &contents)?;
    log::debug!("{manifest_path} declares version \"{value}\"");
    PackageVersion::try_from(value)
}

/// Locate the single `version = "<value>"` line and return `<value>`.
fn find_version_value<'a>(manifest_path: &Utf8Path, contents: &'a str) -> Result<&'a str> {
    let matches: Vec<(usize, &str)> = contents
        .lines()
        .enumerate()
        .filter_map(|(index, line)| version_line_value(line).map(|value| (index + 1, value)))
        .collect();

    match matches.as_slice() {
        [] => Err(PackagerError::VersionFieldMissing {
            path: manifest_path.to_owned(),
        }),
        [(_, value)] => Ok(*value),
        _ => Err(PackagerError::AmbiguousVersionField {
            path: manifest_path.to_owned(),
            lines: matches.iter().map(|(line, _)| *line).collect(),
        }),
    }
}

/// Return the quoted value when `line` is exactly `version = "<value>"`,
/// ignoring surrounding whitespace.
fn version_line_value(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("version")?;
    let rest = rest.trim_start().strip_prefix('=')?;
    let quoted = rest.trim_start();
    let value = quoted.strip_prefix('"')?.strip_suffix('"')?;
    if value.contains('"') {
        return None;
    }
    Some(value)
}

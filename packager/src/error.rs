//! Error types for the WebAssembly packaging pipeline.
//!
//! Every fatal condition the pipeline can hit has its own variant so that the
//! orchestrator can propagate the specific failure kind to its caller. Each
//! message names the offending path or value, which is enough to diagnose the
//! failure without inspecting internals.

use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while packaging a compiled module.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The build manifest does not exist at the expected path.
    #[error("build manifest not found at {path}")]
    ManifestMissing {
        /// Path where the manifest was expected.
        path: Utf8PathBuf,
    },

    /// The build manifest exists but could not be read.
    #[error("failed to read build manifest {path}: {source}")]
    ManifestUnreadable {
        /// Path to the unreadable manifest.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No line of the build manifest declares `version = "..."`.
    #[error("no `version = \"...\"` line found in {path}")]
    VersionFieldMissing {
        /// Path to the inspected manifest.
        path: Utf8PathBuf,
    },

    /// More than one line of the build manifest declares a version.
    #[error("{path} declares a version on {} lines ({}); expected exactly one", .lines.len(), join_lines(.lines))]
    AmbiguousVersionField {
        /// Path to the inspected manifest.
        path: Utf8PathBuf,
        /// One-based line numbers of every matching line.
        lines: Vec<usize>,
    },

    /// The declared version is not a semantic version.
    #[error("invalid version \"{value}\": expected MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]")]
    InvalidVersionFormat {
        /// The rejected version string.
        value: String,
    },

    /// The public package name is not a valid registry name.
    #[error("invalid package name \"{value}\": {reason}")]
    InvalidPackageName {
        /// The rejected name.
        value: String,
        /// Description of the violated rule.
        reason: String,
    },

    /// The output directory does not exist; the compile step has not run.
    #[error("output directory {path} does not exist; run the compile step first")]
    OutputDirectoryMissing {
        /// Path to the missing directory.
        path: Utf8PathBuf,
    },

    /// The output directory exists but its entries cannot be listed.
    #[error("failed to list output directory {path}: {source}")]
    OutputDirectoryUnreadable {
        /// Path to the directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The external compiler could not be started.
    #[error("failed to launch {tool}: {source}; is it installed and on PATH?")]
    CompilerLaunch {
        /// Name of the compiler executable.
        tool: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The external compiler exited unsuccessfully.
    #[error("{tool} build failed: {reason}")]
    CompileFailed {
        /// Name of the compiler executable.
        tool: String,
        /// Captured diagnostic output of the compiler.
        reason: String,
    },

    /// Renaming a compiled artefact failed.
    #[error("failed to rename {from} to {to}: {source}")]
    RenameFailed {
        /// Original artefact path.
        from: Utf8PathBuf,
        /// Intended new path.
        to: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the synthesized type declaration failed.
    #[error("failed to write type declaration {path}: {source}")]
    DeclarationWriteFailed {
        /// Destination of the declaration.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Copying the documentation file into the output directory failed.
    #[error("failed to copy documentation {from} to {to}: {source}")]
    DocumentationCopyFailed {
        /// Source documentation path.
        from: Utf8PathBuf,
        /// Destination path.
        to: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The package manifest could not be serialized.
    #[error("failed to serialize package manifest: {source}")]
    ManifestSerialization {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The package manifest could not be persisted.
    #[error("failed to write package manifest {path}: {source}")]
    WriteFailure {
        /// Destination of the manifest.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The packager configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    ConfigUnreadable {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The packager configuration file is malformed.
    #[error("invalid configuration {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Broad failure classes used when reporting an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A required input is absent; nothing has been mutated.
    Precondition,
    /// An input was present but failed validation; nothing has been mutated.
    Validation,
    /// The external compiler failed.
    Toolchain,
    /// A file-system operation failed mid-run; the output directory may be
    /// partially updated and needs a clean rebuild.
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Precondition => "precondition",
            Self::Validation => "validation",
            Self::Toolchain => "toolchain",
            Self::Io => "I/O",
        };
        f.write_str(label)
    }
}

impl PackagerError {
    /// Classify the error according to the pipeline's failure taxonomy.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ManifestMissing { .. }
            | Self::ManifestUnreadable { .. }
            | Self::OutputDirectoryMissing { .. }
            | Self::OutputDirectoryUnreadable { .. }
            | Self::ConfigUnreadable { .. } => ErrorCategory::Precondition,
            Self::VersionFieldMissing { .. }
            | Self::AmbiguousVersionField { .. }
            | Self::InvalidVersionFormat { .. }
            | Self::InvalidPackageName { .. }
            | Self::InvalidConfig { .. } => ErrorCategory::Validation,
            Self::CompilerLaunch { .. } | Self::CompileFailed { .. } => ErrorCategory::Toolchain,
            Self::RenameFailed { .. }
            | Self::DeclarationWriteFailed { .. }
            | Self::DocumentationCopyFailed { .. }
            | Self::ManifestSerialization { .. }
            | Self::WriteFailure { .. } => ErrorCategory::Io,
            #[cfg(any(test, feature = "test-support"))]
            Self::StubMismatch { .. } => ErrorCategory::Toolchain,
        }
    }

    /// Return true when the output directory may have been partially updated.
    #[must_use]
    pub fn may_leave_partial_output(&self) -> bool {
        self.category() == ErrorCategory::Io
    }
}

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn manifest_missing_names_the_path() {
        let err = PackagerError::ManifestMissing {
            path: Utf8PathBuf::from("wasm/Cargo.toml"),
        };
        assert!(err.to_string().contains("wasm/Cargo.toml"));
    }

    #[test]
    fn ambiguous_version_lists_line_numbers() {
        let err = PackagerError::AmbiguousVersionField {
            path: Utf8PathBuf::from("Cargo.toml"),
            lines: vec![3, 17],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 lines"));
        assert!(msg.contains("3, 17"));
    }

    #[test]
    fn invalid_version_includes_value_and_grammar() {
        let err = PackagerError::InvalidVersionFormat {
            value: "1.2".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"1.2\""));
        assert!(msg.contains("MAJOR.MINOR.PATCH"));
    }

    #[test]
    fn compile_failed_includes_tool_and_reason() {
        let err = PackagerError::CompileFailed {
            tool: "wasm-pack".to_owned(),
            reason: "error[E0425]: cannot find value".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("wasm-pack"));
        assert!(msg.contains("E0425"));
    }

    #[test]
    fn write_failure_preserves_source() {
        let err = PackagerError::WriteFailure {
            path: Utf8PathBuf::from("pkg/package.json"),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.to_string().contains("disk full"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[rstest]
    #[case::missing_manifest(
        PackagerError::ManifestMissing { path: Utf8PathBuf::from("Cargo.toml") },
        ErrorCategory::Precondition
    )]
    #[case::missing_output(
        PackagerError::OutputDirectoryMissing { path: Utf8PathBuf::from("pkg") },
        ErrorCategory::Precondition
    )]
    #[case::unreadable_output(
        PackagerError::OutputDirectoryUnreadable {
            path: Utf8PathBuf::from("pkg"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        },
        ErrorCategory::Precondition
    )]
    #[case::bad_version(
        PackagerError::InvalidVersionFormat { value: "abc".to_owned() },
        ErrorCategory::Validation
    )]
    #[case::no_version(
        PackagerError::VersionFieldMissing { path: Utf8PathBuf::from("Cargo.toml") },
        ErrorCategory::Validation
    )]
    #[case::compile(
        PackagerError::CompileFailed { tool: "wasm-pack".to_owned(), reason: String::new() },
        ErrorCategory::Toolchain
    )]
    #[case::write(
        PackagerError::WriteFailure {
            path: Utf8PathBuf::from("pkg/package.json"),
            source: std::io::Error::other("denied"),
        },
        ErrorCategory::Io
    )]
    fn errors_are_categorised(#[case] err: PackagerError, #[case] expected: ErrorCategory) {
        assert_eq!(err.category(), expected);
        assert_eq!(
            err.may_leave_partial_output(),
            expected == ErrorCategory::Io
        );
    }
}

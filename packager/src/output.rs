//! Output formatting for the packager CLI.
//!
//! Human-readable progress, the success summary and dry-run information are
//! all written to a caller-supplied writer (stderr in the binary). Writes are
//! best effort: a closed stderr never turns a successful run into a failure.

use camino::Utf8Path;
use std::io::Write;

/// Write `message` and a newline to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a success message after packaging.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use wasm_packager::output::success_message;
///
/// let message = success_message("pkg-name", "0.3.1", Utf8Path::new("wasm/pkg"));
/// assert_eq!(message, "Packaged pkg-name@0.3.1 in wasm/pkg");
/// ```
#[must_use]
pub fn success_message(name: &str, version: &str, out_dir: &Utf8Path) -> String {
    format!("Packaged {name}@{version} in {out_dir}")
}

/// Format the next-step hint for publishing the package.
#[must_use]
pub fn publish_hint(out_dir: &Utf8Path) -> String {
    format!(concat!("To publish, run:\n\n", "  cd {}\n", "  npm publish"), out_dir)
}

/// Configuration information for dry-run output.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use wasm_packager::output::DryRunInfo;
///
/// let info = DryRunInfo {
///     project_dir: Utf8Path::new("wasm"),
///     build_manifest: Utf8Path::new("wasm/Cargo.toml"),
///     out_dir: Utf8Path::new("wasm/pkg"),
///     package_name: "pdb-handler-wasm",
///     build_name: "pdb_handler_wasm",
///     version: "0.3.1",
///     target: "web",
///     readme: Utf8Path::new("wasm/README.md"),
///     skip_build: false,
///     verbosity: 0,
/// };
///
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("wasm-pack build"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Directory containing the build manifest.
    pub project_dir: &'a Utf8Path,
    /// Build manifest the version was read from.
    pub build_manifest: &'a Utf8Path,
    /// Output directory for the package.
    pub out_dir: &'a Utf8Path,
    /// Public package name.
    pub package_name: &'a str,
    /// Internal build name.
    pub build_name: &'a str,
    /// Resolved package version.
    pub version: &'a str,
    /// Binding flavour requested from the compiler.
    pub target: &'a str,
    /// Documentation file to bundle.
    pub readme: &'a Utf8Path,
    /// Whether the compile step is skipped.
    pub skip_build: bool,
    /// Verbosity level (0 = normal, 1+ = verbose).
    pub verbosity: u8,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut lines = vec![
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Project directory: {}", self.project_dir),
            format!("Build manifest: {}", self.build_manifest),
            format!("Output directory: {}", self.out_dir),
            format!("Package: {}@{}", self.package_name, self.version),
            format!("Build name: {}", self.build_name),
            format!("Documentation: {}", self.readme),
            format!("Verbosity level: {}", self.verbosity),
            String::new(),
        ];

        if self.skip_build {
            lines.push("Compile step: skipped".to_owned());
        } else {
            lines.push(format!(
                "Compile step: wasm-pack build {} --target {} --out-dir {} --out-name {}",
                self.project_dir, self.target, self.out_dir, self.build_name
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn info() -> DryRunInfo<'static> {
        DryRunInfo {
            project_dir: Utf8Path::new("wasm"),
            build_manifest: Utf8Path::new("wasm/Cargo.toml"),
            out_dir: Utf8Path::new("wasm/pkg"),
            package_name: "pkg-name",
            build_name: "internalname",
            version: "0.3.1",
            target: "web",
            readme: Utf8Path::new("wasm/README.md"),
            skip_build: false,
            verbosity: 1,
        }
    }

    #[rstest]
    fn dry_run_lists_resolved_settings(info: DryRunInfo<'static>) {
        let text = info.display_text();
        assert!(text.starts_with("Dry run - no files will be modified"));
        assert!(text.contains("Package: pkg-name@0.3.1"));
        assert!(text.contains("Output directory: wasm/pkg"));
        assert!(text.contains("Verbosity level: 1"));
        assert!(text.contains(
            "wasm-pack build wasm --target web --out-dir wasm/pkg --out-name internalname"
        ));
    }

    #[rstest]
    fn dry_run_reports_skipped_compile(info: DryRunInfo<'static>) {
        let text = DryRunInfo {
            skip_build: true,
            ..info
        }
        .display_text();
        assert!(text.contains("Compile step: skipped"));
        assert!(!text.contains("wasm-pack build"));
    }

    #[test]
    fn publish_hint_changes_into_output_directory() {
        let hint = publish_hint(Utf8Path::new("wasm/pkg"));
        assert!(hint.contains("cd wasm/pkg\n"));
        assert!(hint.ends_with("npm publish"));
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buffer = Vec::new();
        write_stderr_line(&mut buffer, "hello");
        assert_eq!(buffer, b"hello\n");
    }

    #[test]
    fn write_stderr_line_ignores_write_errors() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        write_stderr_line(&mut Closed, "ignored");
    }
}

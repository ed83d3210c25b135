//! CLI argument definitions for the WebAssembly packager.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::compiler::BuildTarget;
use camino::Utf8PathBuf;
use clap::Parser;

/// Package a compiled WebAssembly module for npm.
#[derive(Parser, Debug, Clone)]
#[command(name = "wasm-packager")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package a compiled WebAssembly module for npm.\n\n",
    "Reads the version from the project's build manifest, runs `wasm-pack build`, ",
    "renames the emitted artefacts to the public package name, adds a type ",
    "declaration and the project README when missing, and writes package.json.\n\n",
    "Settings are read from packager.toml in the project directory when present; ",
    "command-line flags take precedence.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build and package the project in the current directory:\n",
    "    $ wasm-packager\n\n",
    "  Package an already-built output directory:\n",
    "    $ wasm-packager --skip-build\n\n",
    "  Publish under a different name:\n",
    "    $ wasm-packager --name my-wasm-lib\n\n",
    "  Preview without building:\n",
    "    $ wasm-packager --dry-run",
))]
pub struct Cli {
    /// Directory containing the build manifest.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub project_dir: Utf8PathBuf,

    /// Configuration file [default: <project-dir>/packager.toml].
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Public package name.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Internal build name the compiler names its artefacts after.
    #[arg(long, value_name = "NAME")]
    pub build_name: Option<String>,

    /// Output directory, relative to the project directory.
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<Utf8PathBuf>,

    /// JavaScript binding flavour.
    #[arg(short, long, value_enum, value_name = "TARGET")]
    pub target: Option<BuildTarget>,

    /// Documentation file to ship with the package.
    #[arg(long, value_name = "FILE")]
    pub readme: Option<Utf8PathBuf>,

    /// Package the existing output directory without running the compiler.
    #[arg(long)]
    pub skip_build: bool,

    /// Show the plan and exit without building or writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase output verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Default for Cli {
    /// Creates a `Cli` with no overrides and every switch off.
    ///
    /// # Examples
    ///
    /// ```
    /// use wasm_packager::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert_eq!(cli.project_dir, ".");
    /// assert!(cli.name.is_none());
    /// assert!(!cli.dry_run);
    /// ```
    fn default() -> Self {
        Self {
            project_dir: Utf8PathBuf::from("."),
            config: None,
            name: None,
            build_name: None,
            out_dir: None,
            target: None,
            readme: None,
            skip_build: false,
            dry_run: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

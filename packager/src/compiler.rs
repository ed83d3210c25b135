//! External compiler invocation.
//!
//! The packager never compiles anything itself. It shells out to `wasm-pack`
//! through the [`CommandExecutor`] seam, which lets tests substitute a stub
//! that records invocations instead of spawning processes.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use serde::Deserialize;
use std::fmt;
use std::process::{Command, Output};

/// Executable that compiles the project to WebAssembly.
pub const WASM_PACK: &str = "wasm-pack";

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CompilerLaunch`] if the command cannot be
    /// spawned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wasm_packager::compiler::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("wasm-pack", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), wasm_packager::error::PackagerError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(|source| PackagerError::CompilerLaunch {
                tool: cmd.to_owned(),
                source,
            })
    }
}

/// JavaScript binding flavour requested from the compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BuildTarget {
    /// ES modules loaded directly by a browser.
    #[default]
    Web,
    /// ES modules for a bundler such as webpack.
    Bundler,
    /// CommonJS modules for Node.js.
    Nodejs,
    /// A global script without a module system.
    NoModules,
}

impl BuildTarget {
    /// Return the value passed to `wasm-pack --target`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Bundler => "bundler",
            Self::Nodejs => "nodejs",
            Self::NoModules => "no-modules",
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invocation of `wasm-pack build` for one project.
#[derive(Debug, Clone)]
pub struct WasmCompiler<'a> {
    /// Directory containing the build manifest.
    pub project_dir: &'a Utf8Path,
    /// Directory the compiler writes its artefacts into, relative to
    /// `project_dir` unless absolute.
    pub out_dir: &'a Utf8Path,
    /// Internal build name the artefacts are named after.
    pub build_name: &'a str,
    /// Requested binding flavour.
    pub target: BuildTarget,
    /// Whether to ask the compiler for verbose output.
    pub verbose: bool,
}

impl<'a> WasmCompiler<'a> {
    /// Return the argument list passed to `wasm-pack`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use wasm_packager::compiler::{BuildTarget, WasmCompiler};
    ///
    /// let compiler = WasmCompiler {
    ///     project_dir: Utf8Path::new("wasm"),
    ///     out_dir: Utf8Path::new("pkg"),
    ///     build_name: "pdb_handler_wasm",
    ///     target: BuildTarget::Web,
    ///     verbose: false,
    /// };
    /// assert_eq!(
    ///     compiler.args(),
    ///     [
    ///         "build", "wasm", "--target", "web", "--out-dir", "pkg",
    ///         "--out-name", "pdb_handler_wasm",
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn args(&self) -> Vec<&'a str> {
        let mut args = vec![
            "build",
            self.project_dir.as_str(),
            "--target",
            self.target.as_str(),
            "--out-dir",
            self.out_dir.as_str(),
            "--out-name",
            self.build_name,
        ];
        if self.verbose {
            args.push("--verbose");
        }
        args
    }

    /// Run the compiler.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CompilerLaunch`] if `wasm-pack` cannot be
    /// started, or [`PackagerError::CompileFailed`] if it exits unsuccessfully.
    pub fn compile(&self, executor: &dyn CommandExecutor) -> Result<()> {
        let args = self.args();
        log::debug!("running {WASM_PACK} {}", args.join(" "));
        let output = executor.run(WASM_PACK, &args)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(PackagerError::CompileFailed {
                tool: WASM_PACK.to_owned(),
                reason: failure_reason(&stderr, &stdout),
            });
        }
        for line in stderr.lines().chain(stdout.lines()) {
            log::debug!("{WASM_PACK}: {line}");
        }
        Ok(())
    }
}

/// Combine the compiler's diagnostics, stderr first.
fn failure_reason(stderr: &str, stdout: &str) -> String {
    [stderr.trim(), stdout.trim()]
        .into_iter()
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

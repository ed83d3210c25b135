//! Packaging pipeline orchestration.
//!
//! Sequences the packaging steps over one output directory. Inputs are
//! validated before anything is mutated: the package name when the context is
//! built, and the version before the compiler runs. A bad input therefore
//! leaves the output directory exactly as it was. Failures after that point
//! abort the run without rolling back renames already performed.

use crate::capability::{CapabilitySurface, PDB_HANDLER_SURFACE};
use crate::compiler::{BuildTarget, CommandExecutor, WasmCompiler};
use crate::config::PackagerConfig;
use crate::declarations::{DeclarationOutcome, ensure_declaration};
use crate::docs::{DocumentationOutcome, bundle_documentation};
use crate::error::{PackagerError, Result};
use crate::fs::FileSystem;
use crate::manifest::{PackageManifest, publishable_files, write_manifest};
use crate::output::{DryRunInfo, publish_hint, success_message, write_stderr_line};
use crate::package_name::PackageName;
use crate::renamer::ArtifactRenamer;
use crate::version::{PackageVersion, resolve_version};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::io::Write;

/// Steps of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    /// Nothing has happened yet.
    Start,
    /// The build manifest declared a valid version.
    VersionResolved,
    /// The compiler ran and exited successfully.
    CompileInvoked,
    /// Artefacts carry the public package name.
    Renamed,
    /// Declaration and documentation are in place.
    AuxFilesPopulated,
    /// The package manifest was persisted.
    ManifestWritten,
    /// The run completed.
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Start => "start",
            Self::VersionResolved => "version resolved",
            Self::CompileInvoked => "compile invoked",
            Self::Renamed => "renamed",
            Self::AuxFilesPopulated => "auxiliary files populated",
            Self::ManifestWritten => "manifest written",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}

/// Resolved inputs for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Directory containing the build manifest.
    pub project_dir: Utf8PathBuf,
    /// Validated public package name.
    pub package: PackageName,
    /// Internal build name the compiler names its artefacts after.
    pub build_name: String,
    /// Output directory.
    pub out_dir: Utf8PathBuf,
    /// Output directory as given to the compiler, which resolves it against
    /// `project_dir`.
    pub compiler_out_dir: Utf8PathBuf,
    /// Build manifest declaring the version.
    pub build_manifest: Utf8PathBuf,
    /// Documentation file to bundle.
    pub readme: Utf8PathBuf,
    /// Binding flavour requested from the compiler.
    pub target: BuildTarget,
    /// Capability surface described by synthesized declarations.
    pub surface: &'static CapabilitySurface,
    /// Package the existing output directory without compiling.
    pub skip_build: bool,
    /// Verbosity level.
    pub verbosity: u8,
    /// Suppress progress output.
    pub quiet: bool,
}

impl PipelineContext {
    /// Build a context for `project_dir` from resolved configuration.
    ///
    /// Relative paths in `config` are taken relative to `project_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidPackageName`] if the public name is
    /// not a valid registry name or the build name is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use wasm_packager::config::PackagerConfig;
    /// use wasm_packager::pipeline::PipelineContext;
    ///
    /// let context = PipelineContext::from_config(Utf8Path::new("wasm"), &PackagerConfig::default())?;
    /// assert_eq!(context.out_dir, "wasm/pkg");
    /// assert_eq!(context.compiler_out_dir, "pkg");
    /// assert_eq!(context.build_manifest, "wasm/Cargo.toml");
    /// # Ok::<(), wasm_packager::error::PackagerError>(())
    /// ```
    pub fn from_config(project_dir: &Utf8Path, config: &PackagerConfig) -> Result<Self> {
        let package = PackageName::try_from(config.package_name.as_str())?;
        if config.build_name.trim().is_empty() {
            return Err(PackagerError::InvalidPackageName {
                value: config.build_name.clone(),
                reason: "build name must not be empty".to_owned(),
            });
        }

        Ok(Self {
            project_dir: project_dir.to_owned(),
            package,
            build_name: config.build_name.clone(),
            out_dir: project_dir.join(&config.out_dir),
            compiler_out_dir: config.out_dir.clone(),
            build_manifest: project_dir.join(&config.build_manifest),
            readme: project_dir.join(&config.readme),
            target: config.target,
            surface: &PDB_HANDLER_SURFACE,
            skip_build: false,
            verbosity: 0,
            quiet: false,
        })
    }

    fn compiler(&self) -> WasmCompiler<'_> {
        WasmCompiler {
            project_dir: &self.project_dir,
            out_dir: &self.compiler_out_dir,
            build_name: &self.build_name,
            target: self.target,
            verbose: self.verbosity > 0,
        }
    }
}

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Output directory that was packaged.
    pub out_dir: Utf8PathBuf,
    /// Path of the written manifest.
    pub manifest_path: Utf8PathBuf,
    /// The manifest as written.
    pub manifest: PackageManifest,
    /// What the declaration step did.
    pub declaration: DeclarationOutcome,
    /// What the documentation step did.
    pub documentation: DocumentationOutcome,
    /// Stages completed, in order.
    pub stages: Vec<PipelineStage>,
}

struct StageLog {
    stages: Vec<PipelineStage>,
}

impl StageLog {
    fn new() -> Self {
        log::debug!("pipeline stage: {}", PipelineStage::Start);
        Self {
            stages: vec![PipelineStage::Start],
        }
    }

    fn advance(&mut self, stage: PipelineStage) {
        log::debug!("pipeline stage: {stage}");
        self.stages.push(stage);
    }
}

/// Run the full packaging pipeline.
///
/// Progress and the final summary go to `stderr` unless the context is quiet.
///
/// # Errors
///
/// Returns the first error raised by any step; later steps do not run.
pub fn run_pipeline(
    context: &PipelineContext,
    fs: &dyn FileSystem,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<PipelineReport> {
    let mut stages = StageLog::new();

    let version = resolve_version(fs, &context.build_manifest)?;
    stages.advance(PipelineStage::VersionResolved);

    if context.skip_build {
        log::debug!("compile step skipped");
    } else {
        if !context.quiet {
            write_stderr_line(
                stderr,
                format!(
                    "Compiling {} for target {}...",
                    context.project_dir, context.target
                ),
            );
        }
        context.compiler().compile(executor)?;
        stages.advance(PipelineStage::CompileInvoked);
    }

    let renamer = ArtifactRenamer::new(&context.build_name, &context.package);
    let mut listing = renamer.rename_all(fs, &context.out_dir)?;
    stages.advance(PipelineStage::Renamed);

    let declaration = ensure_declaration(fs, &context.out_dir, &context.package, context.surface)?;
    if declaration == DeclarationOutcome::Synthesized {
        listing.push(context.package.types_file());
    }
    let documentation = bundle_documentation(fs, &context.readme, &context.out_dir)?;
    if let DocumentationOutcome::Skipped { missing } = &documentation {
        if !context.quiet {
            write_stderr_line(
                stderr,
                format!("warning: documentation file {missing} not found; continuing without it"),
            );
        }
    }
    stages.advance(PipelineStage::AuxFilesPopulated);

    let files = publishable_files(&listing, documentation.bundled_file());
    let manifest = PackageManifest::new(&context.package, version, files);
    let manifest_path = write_manifest(fs, &context.out_dir, &manifest)?;
    stages.advance(PipelineStage::ManifestWritten);

    if !context.quiet {
        write_stderr_line(
            stderr,
            success_message(
                manifest.name(),
                manifest.version().as_str(),
                &context.out_dir,
            ),
        );
        write_stderr_line(stderr, "");
        write_stderr_line(stderr, publish_hint(&context.out_dir));
    }
    stages.advance(PipelineStage::Done);

    Ok(PipelineReport {
        out_dir: context.out_dir.clone(),
        manifest_path,
        manifest,
        declaration,
        documentation,
        stages: stages.stages,
    })
}

/// Resolve the version and print the plan without touching the output
/// directory or invoking the compiler.
///
/// # Errors
///
/// Returns any error raised while resolving the version.
pub fn run_dry(
    context: &PipelineContext,
    fs: &dyn FileSystem,
    stderr: &mut dyn Write,
) -> Result<PackageVersion> {
    let version = resolve_version(fs, &context.build_manifest)?;
    let info = DryRunInfo {
        project_dir: &context.project_dir,
        build_manifest: &context.build_manifest,
        out_dir: &context.out_dir,
        package_name: context.package.as_str(),
        build_name: &context.build_name,
        version: version.as_str(),
        target: context.target.as_str(),
        readme: &context.readme,
        skip_build: context.skip_build,
        verbosity: context.verbosity,
    };
    write_stderr_line(stderr, info.display_text());
    Ok(version)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

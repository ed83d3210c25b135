//! WebAssembly packager CLI entrypoint.
//!
//! This binary compiles a Rust project to WebAssembly and packages the output
//! for npm. After packaging, it prints the command that publishes the result.

use clap::Parser;
use std::io::Write;
use wasm_packager::cli::Cli;
use wasm_packager::compiler::SystemCommandExecutor;
use wasm_packager::config::PackagerConfig;
use wasm_packager::error::Result;
use wasm_packager::fs::SystemFileSystem;
use wasm_packager::output::write_stderr_line;
use wasm_packager::pipeline::{PipelineContext, run_dry, run_pipeline};

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let fs = SystemFileSystem;
    let context = resolve_context(cli, &fs)?;

    // Dry-run mode: show what would be done without side effects
    if cli.dry_run {
        run_dry(&context, &fs, stderr)?;
        return Ok(());
    }

    run_pipeline(&context, &fs, &SystemCommandExecutor, stderr)?;
    Ok(())
}

/// Loads configuration, applies CLI overrides and builds the run context.
fn resolve_context(cli: &Cli, fs: &SystemFileSystem) -> Result<PipelineContext> {
    let config = PackagerConfig::load(fs, &cli.project_dir, cli.config.as_deref())?
        .with_overrides(cli);
    let mut context = PipelineContext::from_config(&cli.project_dir, &config)?;
    context.skip_build = cli.skip_build;
    context.verbosity = cli.verbosity;
    context.quiet = cli.quiet;
    Ok(context)
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            log::debug!("{} failure: {err:?}", err.category());
            write_stderr_line(stderr, format!("error: {err}"));
            if err.may_leave_partial_output() {
                write_stderr_line(
                    stderr,
                    "The output directory may be partially updated; rebuild it before retrying.",
                );
            }
            1
        }
    }
}

//! WebAssembly packager library.
//!
//! This crate turns the output of `wasm-pack build` into a publishable npm
//! package: artefacts renamed to the public package name, a type declaration,
//! the project README and a `package.json` whose version matches the build
//! manifest. It is used by the `wasm-packager` CLI binary and can be driven
//! programmatically for testing or custom release workflows.
//!
//! # Modules
//!
//! - [`capability`] - Typed description of the compiled module's exports
//! - [`cli`] - Command-line argument definitions
//! - [`compiler`] - External compiler invocation
//! - [`config`] - `packager.toml` loading and CLI overrides
//! - [`declarations`] - Ambient type-declaration synthesis
//! - [`docs`] - Documentation bundling
//! - [`error`] - Semantic error types and failure categories
//! - [`fs`] - Narrow file-system interface
//! - [`manifest`] - Package manifest construction and persistence
//! - [`output`] - Progress, summary and dry-run formatting
//! - [`package_name`] - Validated public package names
//! - [`pipeline`] - Packaging pipeline orchestration
//! - [`renamer`] - Artefact renaming to the public name
//! - [`version`] - Build manifest version resolution

pub mod capability;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod declarations;
pub mod docs;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod output;
pub mod package_name;
pub mod pipeline;
pub mod renamer;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod version;

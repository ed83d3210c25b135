//! Test support utilities for packager behavioural tests.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Creates an empty project directory and returns it with its UTF-8 path.
pub fn temp_project() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let root = Utf8PathBuf::try_from(temp_dir.path().to_owned()).expect("non-UTF8 temp path");
    (temp_dir, root)
}

/// Writes the files `wasm-pack build --out-name <build_name>` leaves behind,
/// minus its own declaration and manifest.
pub fn write_compiler_output(out_dir: &Utf8Path, build_name: &str) {
    fs::create_dir_all(out_dir).expect("create output dir");
    fs::write(out_dir.join(format!("{build_name}_bg.wasm")), b"\0asm\x01\0\0\0")
        .expect("write wasm");
    fs::write(
        out_dir.join(format!("{build_name}.js")),
        "export default function init() {}\n",
    )
    .expect("write bindings");
    fs::write(out_dir.join(".gitignore"), "*\n").expect("write gitignore");
}

//! Shared test utilities for the packager crate.

use crate::compiler::CommandExecutor;
use crate::error::{PackagerError, Result};
use crate::fs::FileSystem;
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "wasm-pack").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<&'static str>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Returns predefined results for the expected invocations, in order, and a
/// [`PackagerError::StubMismatch`] for anything else.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Creates a stub that expects no invocations at all.
    pub fn unused() -> Self {
        Self::new(Vec::new())
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let Some(call) = self.expected.borrow_mut().pop_front() else {
            return Err(PackagerError::StubMismatch {
                message: format!("unexpected invocation: {cmd} {}", args.join(" ")),
            });
        };

        if call.cmd != cmd || call.args.as_slice() != args {
            return Err(PackagerError::StubMismatch {
                message: format!(
                    "expected `{} {}`, got `{cmd} {}`",
                    call.cmd,
                    call.args.join(" "),
                    args.join(" ")
                ),
            });
        }

        call.result
    }
}

/// In-memory [`FileSystem`] for sequencing tests.
///
/// Directories must be created explicitly; files may only be written into an
/// existing directory, mirroring the host behaviour the pipeline relies on.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RefCell<BTreeMap<Utf8PathBuf, Vec<u8>>>,
    dirs: RefCell<BTreeSet<Utf8PathBuf>>,
}

impl MemoryFileSystem {
    /// Creates an empty file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `dir` and every ancestor.
    pub fn add_dir(&self, dir: impl AsRef<Utf8Path>) {
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in dir.as_ref().ancestors() {
            if !ancestor.as_str().is_empty() {
                dirs.insert(ancestor.to_owned());
            }
        }
    }

    /// Creates a file, along with its parent directories.
    pub fn add_file(&self, path: impl AsRef<Utf8Path>, contents: impl AsRef<[u8]>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files
            .borrow_mut()
            .insert(path.to_owned(), contents.as_ref().to_vec());
    }

    /// Returns the contents of `path` as text, if it exists.
    pub fn contents(&self, path: impl AsRef<Utf8Path>) -> Option<String> {
        self.files
            .borrow()
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Returns every file path currently stored, sorted.
    pub fn paths(&self) -> Vec<Utf8PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    fn ensure_parent(&self, path: &Utf8Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_str().is_empty() && !self.is_dir(parent) => {
                Err(not_found(parent))
            }
            _ => Ok(()),
        }
    }
}

fn not_found(path: &Utf8Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{path} does not exist"))
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.files.borrow().contains_key(path) || self.dirs.borrow().contains(path)
    }

    fn is_dir(&self, path: &Utf8Path) -> bool {
        self.dirs.borrow().contains(path)
    }

    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        let files = self.files.borrow();
        let bytes = files.get(path).ok_or_else(|| not_found(path))?;
        String::from_utf8(bytes.clone())
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn list_dir(&self, dir: &Utf8Path) -> io::Result<Vec<String>> {
        if !self.is_dir(dir) {
            return Err(not_found(dir));
        }
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name().map(str::to_owned))
            .collect())
    }

    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        self.ensure_parent(to)?;
        let mut files = self.files.borrow_mut();
        let contents = files.remove(from).ok_or_else(|| not_found(from))?;
        files.insert(to.to_owned(), contents);
        Ok(())
    }

    fn write_atomic(&self, path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
        self.ensure_parent(path)?;
        self.files
            .borrow_mut()
            .insert(path.to_owned(), contents.to_vec());
        Ok(())
    }

    fn copy(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        self.ensure_parent(to)?;
        let contents = self
            .files
            .borrow()
            .get(from)
            .cloned()
            .ok_or_else(|| not_found(from))?;
        self.files.borrow_mut().insert(to.to_owned(), contents);
        Ok(())
    }
}

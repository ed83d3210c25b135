//! Narrow file-system interface used by the packaging pipeline.
//!
//! All pipeline steps reach the disk through [`FileSystem`], which exposes
//! only the handful of operations packaging needs. This keeps the sequencing
//! logic testable against an in-memory fake.

use camino::Utf8Path;
use std::fs;
use std::io::{self, Write};

/// File-system operations the pipeline relies on.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
    /// Return true if `path` names an existing file or directory.
    fn exists(&self, path: &Utf8Path) -> bool;

    /// Return true if `path` names an existing directory.
    fn is_dir(&self, path: &Utf8Path) -> bool;

    /// Read a UTF-8 text file.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while opening or reading the file.
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String>;

    /// Return the names of the files directly inside `dir`, sorted.
    ///
    /// Subdirectories are not listed.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading the directory.
    fn list_dir(&self, dir: &Utf8Path) -> io::Result<Vec<String>>;

    /// Rename `from` to `to`, replacing any existing file at `to`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the rename.
    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()>;

    /// Write `contents` to `path` so that readers observe either the old
    /// file or the complete new one.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while staging or persisting the file.
    fn write_atomic(&self, path: &Utf8Path, contents: &[u8]) -> io::Result<()>;

    /// Copy `from` to `to`, overwriting `to`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the copy.
    fn copy(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by the host file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn exists(&self, path: &Utf8Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Utf8Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn list_dir(&self, dir: &Utf8Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in dir.read_dir_utf8()? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn write_atomic(&self, path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        staged.write_all(contents)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|err| err.error)?;
        Ok(())
    }

    fn copy(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }
}

// SPDX-License-Identifier: MPL-2.0
//! File-system capabilities used by the editor.
//!
//! Directories and files are referenced through opaque handles obtained from
//! a [`DirectoryPicker`] and a [`FileSystem`]; the editor never builds paths
//! on its own.

use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Handle to a directory the user granted access to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryHandle(PathBuf);

impl DirectoryHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Handle to one file inside a granted directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle(PathBuf);

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name including extension.
    #[must_use]
    pub fn name(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A file as listed in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub handle: FileHandle,
    pub name: String,
    pub modified: Option<DateTime<Local>>,
    pub created: Option<DateTime<Local>>,
}

/// Read/write access to files under granted directories.
pub trait FileSystem {
    /// Lists the regular files directly inside `dir`.
    fn list(&self, dir: &DirectoryHandle) -> Result<Vec<NoteEntry>>;

    /// Returns the listing entry for a single file.
    fn stat(&self, file: &FileHandle) -> Result<NoteEntry>;

    fn read(&self, file: &FileHandle) -> Result<String>;

    fn write(&mut self, file: &FileHandle, content: &str) -> Result<()>;

    fn exists(&self, dir: &DirectoryHandle, name: &str) -> bool;

    /// Creates an empty file. Fails if `name` is already taken.
    fn create(&mut self, dir: &DirectoryHandle, name: &str) -> Result<FileHandle>;

    fn delete(&mut self, file: &FileHandle) -> Result<()>;

    /// Renames a file within its directory and returns the new handle.
    /// Fails if `new_name` is already taken.
    fn rename(&mut self, file: &FileHandle, new_name: &str) -> Result<FileHandle>;
}

/// Obtains a directory handle from the user.
pub trait DirectoryPicker {
    /// Returns `None` when the user cancels.
    fn pick(&mut self) -> Result<Option<DirectoryHandle>>;
}

/// Picker that always answers with a preset directory, e.g. one given on the
/// command line.
#[derive(Debug, Clone)]
pub struct FixedDirectory(Option<PathBuf>);

impl FixedDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }

    /// A picker that behaves like a cancelled dialog.
    #[must_use]
    pub fn cancelled() -> Self {
        Self(None)
    }
}

impl DirectoryPicker for FixedDirectory {
    fn pick(&mut self) -> Result<Option<DirectoryHandle>> {
        match &self.0 {
            Some(path) if path.is_dir() => Ok(Some(DirectoryHandle::new(path.clone()))),
            Some(path) => Err(Error::NotFound(path.display().to_string())),
            None => Ok(None),
        }
    }
}

/// [`FileSystem`] over the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

fn local_time(time: std::io::Result<SystemTime>) -> Option<DateTime<Local>> {
    time.ok().map(DateTime::<Local>::from)
}

impl FileSystem for LocalFileSystem {
    fn list(&self, dir: &DirectoryHandle) -> Result<Vec<NoteEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir.path())? {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() {
                entries.push(self.stat(&FileHandle::new(path))?);
            }
        }

        Ok(entries)
    }

    fn stat(&self, file: &FileHandle) -> Result<NoteEntry> {
        let metadata = fs::metadata(file.path())?;
        Ok(NoteEntry {
            handle: file.clone(),
            name: file.name(),
            modified: local_time(metadata.modified()),
            created: local_time(metadata.created()),
        })
    }

    fn read(&self, file: &FileHandle) -> Result<String> {
        Ok(fs::read_to_string(file.path())?)
    }

    fn write(&mut self, file: &FileHandle, content: &str) -> Result<()> {
        fs::write(file.path(), content)?;
        Ok(())
    }

    fn exists(&self, dir: &DirectoryHandle, name: &str) -> bool {
        dir.path().join(name).exists()
    }

    fn create(&mut self, dir: &DirectoryHandle, name: &str) -> Result<FileHandle> {
        let path = dir.path().join(name);
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        Ok(FileHandle::new(path))
    }

    fn delete(&mut self, file: &FileHandle) -> Result<()> {
        fs::remove_file(file.path())?;
        Ok(())
    }

    fn rename(&mut self, file: &FileHandle, new_name: &str) -> Result<FileHandle> {
        let parent = file
            .path()
            .parent()
            .ok_or_else(|| Error::Io("No parent directory".into()))?;
        let target = parent.join(new_name);
        if target.exists() {
            return Err(Error::AlreadyExists(new_name.to_string()));
        }
        fs::rename(file.path(), &target)?;
        Ok(FileHandle::new(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn list_skips_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join("a.md"), "# a").unwrap();
        fs::create_dir(temp_dir.path().join("sub.md")).unwrap();

        let entries = LocalFileSystem
            .list(&DirectoryHandle::new(temp_dir.path()))
            .expect("failed to list directory");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.md");
        assert!(entries[0].modified.is_some());
    }

    #[test]
    fn create_refuses_existing_name() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let dir = DirectoryHandle::new(temp_dir.path());
        let mut fs_impl = LocalFileSystem;

        fs_impl.create(&dir, "Untitled.md").expect("first create");
        assert!(matches!(
            fs_impl.create(&dir, "Untitled.md"),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn rename_returns_new_handle_and_keeps_content() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let original = FileHandle::new(temp_dir.path().join("old.md"));
        fs::write(original.path(), "body").unwrap();
        let mut fs_impl = LocalFileSystem;

        let renamed = fs_impl.rename(&original, "new.md").expect("rename");

        assert_eq!(renamed.name(), "new.md");
        assert!(!original.path().exists());
        assert_eq!(fs_impl.read(&renamed).unwrap(), "body");
    }

    #[test]
    fn rename_does_not_overwrite() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let a = FileHandle::new(temp_dir.path().join("a.md"));
        fs::write(a.path(), "a").unwrap();
        fs::write(temp_dir.path().join("b.md"), "b").unwrap();

        assert!(matches!(
            LocalFileSystem.rename(&a, "b.md"),
            Err(Error::AlreadyExists(_))
        ));
        assert_eq!(fs::read_to_string(temp_dir.path().join("b.md")).unwrap(), "b");
    }

    #[test]
    fn fixed_directory_picker() {
        let temp_dir = tempdir().expect("failed to create temp dir");

        let picked = FixedDirectory::new(temp_dir.path()).pick().unwrap();
        assert_eq!(picked, Some(DirectoryHandle::new(temp_dir.path())));

        assert_eq!(FixedDirectory::cancelled().pick().unwrap(), None);
        assert!(FixedDirectory::new(temp_dir.path().join("missing"))
            .pick()
            .is_err());
    }
}

//! Local filesystem adapter
//!
//! Thin blocking wrapper over `std::fs` used by the reconciler. Every error
//! is converted into a [`SyncError`] carrying the offending path.
//!
//! ## Design Decisions
//!
//! - **No symlink following**: entries are classified with
//!   `DirEntry::file_type` / `symlink_metadata`, so a symlink is reported as
//!   [`EntryKind::Other`] rather than as its target.
//! - **Atomic copies**: content is copied to a temporary sibling and renamed
//!   over the target, so a failed copy never leaves a truncated replica file.
//! - **Sorted listings**: names are returned in a `BTreeSet` so reconciliation
//!   visits entries in a stable order.

use std::{
    collections::BTreeSet,
    ffi::{OsStr, OsString},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use crate::SyncError;

/// Suffix of the temporary sibling written during [`LocalFileSystemAdapter::copy_file`]
const TMP_SUFFIX: &str = ".dirmirror-tmp";

// ============================================================================
// Entry classification
// ============================================================================

/// Kind of a directory entry, without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symlink, socket, FIFO, device node
    Other,
}

impl From<std::fs::FileType> for EntryKind {
    fn from(file_type: std::fs::FileType) -> Self {
        if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::Other
        }
    }
}

/// Names found directly under one directory, grouped by [`EntryKind`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    pub files: BTreeSet<OsString>,
    pub directories: BTreeSet<OsString>,
    pub other: BTreeSet<OsString>,
}

impl DirListing {
    /// Names of every entry that is not a directory
    pub fn non_directories(&self) -> impl Iterator<Item = &OsStr> {
        self.files
            .iter()
            .chain(self.other.iter())
            .map(OsString::as_os_str)
    }
}

// ============================================================================
// LocalFileSystemAdapter
// ============================================================================

/// Blocking adapter over the local filesystem.
///
/// Zero-sized: every operation takes its context from the path arguments.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystemAdapter;

impl LocalFileSystemAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the kind of `path`, or `None` if nothing exists there.
    pub fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>, SyncError> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) => Ok(Some(meta.file_type().into())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::io("inspect", path, e)),
        }
    }

    /// Returns whether `path` resolves to a directory, following symlinks.
    ///
    /// Used for the roots handed in by the caller; entries found while
    /// walking are classified with [`entry_kind`](Self::entry_kind) instead.
    pub fn resolves_to_directory(&self, path: &Path) -> Result<bool, SyncError> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SyncError::io("inspect", path, e)),
        }
    }

    /// Lists the entries directly under `dir` (non-recursive).
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn list_directory(&self, dir: &Path) -> Result<DirListing, SyncError> {
        let mut listing = DirListing::default();
        let entries = std::fs::read_dir(dir).map_err(|e| SyncError::io("list", dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| SyncError::io("list", dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| SyncError::io("inspect", entry.path(), e))?;

            let bucket = match EntryKind::from(file_type) {
                EntryKind::File => &mut listing.files,
                EntryKind::Directory => &mut listing.directories,
                EntryKind::Other => &mut listing.other,
            };
            bucket.insert(entry.file_name());
        }

        debug!(
            files = listing.files.len(),
            directories = listing.directories.len(),
            other = listing.other.len(),
            "directory listed"
        );
        Ok(listing)
    }

    /// Creates `dir` and any missing parents.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn create_directory(&self, dir: &Path) -> Result<(), SyncError> {
        std::fs::create_dir_all(dir).map_err(|e| SyncError::io("create directory", dir, e))?;
        debug!("directory created");
        Ok(())
    }

    /// Copies the full content of `source` over `target` (overwriting).
    ///
    /// Writes to `<target>.dirmirror-tmp` first and renames it into place.
    #[instrument(skip(self), fields(source = %source.display(), target = %target.display()))]
    pub fn copy_file(&self, source: &Path, target: &Path) -> Result<u64, SyncError> {
        let tmp_path = tmp_sibling(target);

        debug!(tmp_path = %tmp_path.display(), "copying to temporary file");
        let bytes = match std::fs::copy(source, &tmp_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = std::fs::remove_file(&tmp_path);
                return Err(SyncError::io("copy file to", target, e));
            }
        };

        if let Err(e) = std::fs::rename(&tmp_path, target) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(SyncError::io("replace", target, e));
        }

        debug!(bytes, "copy complete");
        Ok(bytes)
    }

    /// Removes a single non-directory entry.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn remove_file(&self, path: &Path) -> Result<(), SyncError> {
        std::fs::remove_file(path).map_err(|e| SyncError::io("delete file", path, e))?;
        debug!("file removed");
        Ok(())
    }

    /// Removes a directory and everything below it.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn remove_directory(&self, path: &Path) -> Result<(), SyncError> {
        std::fs::remove_dir_all(path).map_err(|e| SyncError::io("delete directory", path, e))?;
        debug!("directory removed");
        Ok(())
    }
}

fn tmp_sibling(target: &Path) -> PathBuf {
    let mut p = target.as_os_str().to_owned();
    p.push(TMP_SUFFIX);
    PathBuf::from(p)
}

// ============================================================================
// Unit tests
// ============================================================================

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_entry_kind() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystemAdapter::new();
        std::fs::write(dir.path().join("f.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("d")).unwrap();

        assert_eq!(
            fs.entry_kind(&dir.path().join("f.txt")).unwrap(),
            Some(EntryKind::File)
        );
        assert_eq!(
            fs.entry_kind(&dir.path().join("d")).unwrap(),
            Some(EntryKind::Directory)
        );
        assert_eq!(fs.entry_kind(&dir.path().join("missing")).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_other() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystemAdapter::new();
        std::fs::write(dir.path().join("target.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("target.txt"), dir.path().join("link"))
            .unwrap();

        let listing = fs.list_directory(dir.path()).unwrap();
        assert!(listing.files.contains(OsStr::new("target.txt")));
        assert!(listing.other.contains(OsStr::new("link")));
        assert_eq!(listing.non_directories().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolves_to_directory_follows_symlinks() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystemAdapter::new();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::fs::write(dir.path().join("f.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("dir_link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        assert!(fs.resolves_to_directory(&dir.path().join("real")).unwrap());
        assert!(fs.resolves_to_directory(&dir.path().join("dir_link")).unwrap());
        assert_eq!(
            fs.entry_kind(&dir.path().join("dir_link")).unwrap(),
            Some(EntryKind::Other)
        );
        assert!(!fs.resolves_to_directory(&dir.path().join("f.txt")).unwrap());
        assert!(!fs.resolves_to_directory(&dir.path().join("dangling")).unwrap());
        assert!(!fs.resolves_to_directory(&dir.path().join("missing")).unwrap());
    }

    #[test]
    fn test_list_directory_groups_entries() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystemAdapter::new();
        std::fs::write(dir.path().join("b.txt"), b"b").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/nested.txt"), b"n").unwrap();

        let listing = fs.list_directory(dir.path()).unwrap();
        let files: Vec<_> = listing.files.iter().cloned().collect();
        assert_eq!(files, vec![OsString::from("a.txt"), OsString::from("b.txt")]);
        assert!(listing.directories.contains(OsStr::new("sub")));
        assert!(listing.other.is_empty());
    }

    #[test]
    fn test_list_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystemAdapter::new();
        let err = fs.list_directory(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, SyncError::Io { op: "list", .. }));
    }

    #[test]
    fn test_copy_file_overwrites_and_leaves_no_tmp() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystemAdapter::new();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        std::fs::write(&src, b"new content").unwrap();
        std::fs::write(&dst, b"old").unwrap();

        let bytes = fs.copy_file(&src, &dst).unwrap();

        assert_eq!(bytes, 11);
        assert_eq!(std::fs::read(&dst).unwrap(), b"new content");
        assert!(!tmp_sibling(&dst).exists());
    }

    #[test]
    fn test_copy_missing_source_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystemAdapter::new();
        let dst = dir.path().join("dst.txt");
        std::fs::write(&dst, b"keep me").unwrap();

        let err = fs.copy_file(&dir.path().join("absent"), &dst).unwrap_err();

        assert!(matches!(err, SyncError::Io { .. }));
        assert_eq!(std::fs::read(&dst).unwrap(), b"keep me");
        assert!(!tmp_sibling(&dst).exists());
    }

    #[test]
    fn test_create_and_remove_directory() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystemAdapter::new();
        let deep = dir.path().join("a/b/c");

        fs.create_directory(&deep).unwrap();
        std::fs::write(deep.join("f.txt"), b"x").unwrap();
        assert!(deep.is_dir());

        fs.remove_directory(&dir.path().join("a")).unwrap();
        assert!(!dir.path().join("a").exists());
    }

    #[test]
    fn test_remove_file() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystemAdapter::new();
        let path = dir.path().join("gone.txt");
        std::fs::write(&path, b"bye").unwrap();

        fs.remove_file(&path).unwrap();
        assert!(!path.exists());
        assert!(fs.remove_file(&path).is_err());
    }
}

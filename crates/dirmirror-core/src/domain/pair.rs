//! One level of the source/replica walk

use std::{
    ffi::OsStr,
    path::{Component, Path, PathBuf},
};

use super::errors::DomainError;

/// A (source, replica) directory pair at one recursion level
///
/// The replica side need not exist yet. Pairs are rebuilt from the
/// filesystem on every cycle and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPair {
    source: PathBuf,
    replica: PathBuf,
}

impl DirectoryPair {
    pub fn new(source: impl Into<PathBuf>, replica: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn replica(&self) -> &Path {
        &self.replica
    }

    /// Derives the pair for the entry called `name` one level down
    ///
    /// `name` must be a single path component; separators, `.` and `..`
    /// are rejected so a pair can never escape its parent.
    pub fn child(&self, name: impl AsRef<OsStr>) -> Result<Self, DomainError> {
        let name = name.as_ref();
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Self {
                source: self.source.join(name),
                replica: self.replica.join(name),
            }),
            _ => Err(DomainError::InvalidEntryName(
                name.to_string_lossy().into_owned(),
            )),
        }
    }
}

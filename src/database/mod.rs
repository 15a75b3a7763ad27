//! JSON-file comment store.
//!
//! Every read goes to disk and every write replaces the whole file. Writers
//! inside this process are serialized through `write_lock`, so a
//! load-append-persist sequence never drops a concurrent submission. Readers
//! take no lock: writes land through an atomic rename, so a reader sees either
//! the previous list or the new one. Processes sharing the same file are not
//! coordinated.

mod file;

pub use file::atomic_write;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use tracing::{debug, info};

use crate::{error::StorageError, models::comments::Comment};

pub struct CommentStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CommentStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the data file holding an empty list if it does not exist yet.
    /// Returns whether a file was created.
    pub fn ensure_exists(&self) -> Result<bool, StorageError> {
        let _guard = self.lock();
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| self.write_error(source))?;
        }
        self.write(&[])?;
        info!(path = %self.path.display(), "created empty comment store");
        Ok(true)
    }

    pub fn load(&self) -> Result<Vec<Comment>, StorageError> {
        let comments = file::read_comments(&self.path)?;
        debug!(count = comments.len(), "loaded comments");
        Ok(comments)
    }

    pub fn append(comments: &mut Vec<Comment>, comment: Comment) {
        comments.push(comment);
    }

    pub fn persist(&self, comments: &[Comment]) -> Result<(), StorageError> {
        let _guard = self.lock();
        self.write(comments)
    }

    /// Loads the list, applies `f` and persists the result while holding the
    /// writer lock. Returns the list as written.
    pub fn update<F>(&self, f: F) -> Result<Vec<Comment>, StorageError>
    where
        F: FnOnce(&mut Vec<Comment>),
    {
        let _guard = self.lock();
        let mut comments = self.load()?;
        f(&mut comments);
        self.write(&comments)?;
        Ok(comments)
    }

    fn write(&self, comments: &[Comment]) -> Result<(), StorageError> {
        let content = file::encode_comments(comments)?;
        file::atomic_write(&self.path, &content).map_err(|source| self.write_error(source))?;
        debug!(count = comments.len(), "persisted comments");
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is (), so a poisoned lock carries no broken state.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

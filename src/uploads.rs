//! Image attachments: validation, content-addressed storage and lookup.

use std::{
    fs,
    path::{Path, PathBuf},
};

use blake2::{Blake2b, Digest};
use tracing::info;

use crate::{
    database::atomic_write,
    error::{NotFoundError, StorageError, ValidationError},
};

pub const STATIC_PREFIX: &str = "/static/";

/// SVG is left out on purpose: it can carry script.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpe", "jpeg", "png", "gif", "bmp", "webp"];

const NAME_HASH_LEN: usize = 32;

/// An upload that passed validation and may be stored.
#[derive(Debug)]
pub struct ImageUpload {
    extension: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn file_name(&self) -> String {
        let digest = format!("{:x}", Blake2b::digest(&self.bytes));
        format!("{}.{}", &digest[..NAME_HASH_LEN], self.extension)
    }
}

pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new<P: Into<PathBuf>>(dir: P, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })
    }

    pub fn accept(&self, filename: &str, bytes: Vec<u8>) -> Result<ImageUpload, ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| ValidationError::NotAnImage(filename.to_string()))?;
        if bytes.is_empty() {
            return Err(ValidationError::EmptyUpload);
        }
        if bytes.len() > self.max_bytes {
            return Err(ValidationError::UploadTooLarge {
                limit: self.max_bytes,
            });
        }
        Ok(ImageUpload { extension, bytes })
    }

    /// Stores the image and returns the URL it is served under.
    pub fn store(&self, upload: &ImageUpload) -> Result<String, StorageError> {
        let name = upload.file_name();
        let path = self.dir.join(&name);
        // A file left short by an interrupted write no longer matches its name.
        let intact = fs::read(&path).map_or(false, |existing| existing == upload.bytes);
        if !intact {
            atomic_write(&path, &upload.bytes).map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;
            info!(file = %name, size = upload.bytes.len(), "stored upload");
        }
        Ok(url_for(&name))
    }

    /// Maps a requested name to a file inside the upload directory.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, NotFoundError> {
        let not_found = || NotFoundError(filename.to_string());
        if !is_plain_file_name(filename) {
            return Err(not_found());
        }

        let dir = fs::canonicalize(&self.dir).map_err(|_| not_found())?;
        let path = fs::canonicalize(dir.join(filename)).map_err(|_| not_found())?;
        if !path.starts_with(&dir) || !path.is_file() {
            return Err(not_found());
        }
        Ok(path)
    }
}

pub fn url_for(name: &str) -> String {
    format!("{}{}", STATIC_PREFIX, name)
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_store() -> (tempfile::TempDir, UploadStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("static"), 16);
        store.ensure_dir().unwrap();
        (dir, store)
    }

    #[test]
    fn accepts_image_extensions_case_insensitively() {
        let (_dir, store) = new_store();
        assert!(store.accept("cat.PNG", vec![1, 2, 3]).is_ok());
        assert!(store.accept("cat.jpeg", vec![1]).is_ok());
    }

    #[test]
    fn rejects_non_images() {
        let (_dir, store) = new_store();
        for name in &["notes.txt", "script.svg", "noext", "archive.png.exe"] {
            assert_eq!(
                store.accept(name, vec![1]).unwrap_err(),
                ValidationError::NotAnImage(name.to_string())
            );
        }
    }

    #[test]
    fn rejects_empty_and_oversized_files() {
        let (_dir, store) = new_store();
        assert_eq!(store.accept("a.png", vec![]).unwrap_err(), ValidationError::EmptyUpload);
        assert_eq!(
            store.accept("a.png", vec![0; 17]).unwrap_err(),
            ValidationError::UploadTooLarge { limit: 16 }
        );
    }

    #[test]
    fn stored_files_are_named_by_content() {
        let (_dir, store) = new_store();
        let first = store.accept("one.png", b"same".to_vec()).unwrap();
        let second = store.accept("two.PNG", b"same".to_vec()).unwrap();

        let url = store.store(&first).unwrap();
        assert_eq!(url, store.store(&second).unwrap());
        assert!(url.starts_with(STATIC_PREFIX));
        assert!(url.ends_with(".png"));

        let name = &url[STATIC_PREFIX.len()..];
        assert_eq!(name.len(), NAME_HASH_LEN + ".png".len());
        assert_eq!(fs::read(store.dir().join(name)).unwrap(), b"same");
    }

    #[test]
    fn truncated_upload_is_rewritten() {
        let (_dir, store) = new_store();
        let upload = store.accept("full.png", b"full image".to_vec()).unwrap();
        let path = store.dir().join(upload.file_name());
        fs::write(&path, b"full").unwrap();

        store.store(&upload).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"full image");
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 1);
    }

    #[test]
    fn resolves_stored_files() {
        let (_dir, store) = new_store();
        let upload = store.accept("pic.gif", b"GIF89a".to_vec()).unwrap();
        let url = store.store(&upload).unwrap();
        let path = store.resolve(&url[STATIC_PREFIX.len()..]).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"GIF89a");
    }

    #[test]
    fn resolve_rejects_traversal_and_missing_files() {
        let (dir, store) = new_store();
        fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

        for name in &["../secret.txt", "..", "", ".hidden", "a/b.png", "a\\b.png", "missing.png"] {
            assert_eq!(store.resolve(name).unwrap_err(), NotFoundError(name.to_string()));
        }
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed comment data in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize comments: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Rejected user input. Messages are shown on the submission form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Only images allowed!")]
    NotAnImage(String),

    #[error("The uploaded file is empty")]
    EmptyUpload,

    #[error("The uploaded file exceeds {limit} bytes")]
    UploadTooLarge { limit: usize },

    #[error("Form field '{0}' is too long")]
    FieldTooLarge(String),

    #[error("Malformed form data: {0}")]
    MalformedForm(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("file not found: {0}")]
pub struct NotFoundError(pub String);

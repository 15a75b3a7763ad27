use std::{
    ffi::OsString,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::{error::StorageError, models::comments::Comment};

const INDENT: &[u8] = b"   ";

pub fn read_comments(path: &Path) -> Result<Vec<Comment>, StorageError> {
    let content = fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StorageError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

pub fn encode_comments(comments: &[Comment]) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    comments
        .serialize(&mut ser)
        .map_err(StorageError::Serialize)?;
    Ok(buf)
}

/// Writes `content` next to `path`, syncs it and renames it into place.
/// The previous file stays untouched when any step before the rename fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let tmp_path = tmp_path_for(path)?;
    let result = (|| {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
        return result;
    }

    // fsync directory for rename durability
    if let Ok(d) = fs::File::open(parent_dir(path)) {
        let _ = d.sync_all();
    }
    Ok(())
}

/// A bare file name lives in the working directory.
fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn tmp_path_for(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;
    let mut tmp_name = OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

//! Local content helpers
//!
//! Content ids, file validation and checksums for files about to be stored.

use std::io::ErrorKind;
use std::path::Path;

use jiff::Timestamp;
use md5::{Digest, Md5};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::{Error, Result};

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Generate a content id of the form `<file-name>-<epoch-millis>`
pub fn generate_content_id(path: &Path, timestamp: Timestamp) -> Result<String> {
    let name = path
        .file_name()
        .ok_or_else(|| Error::General(format!("Path {} has no file name", path.display())))?;
    Ok(format!(
        "{}-{}",
        name.to_string_lossy(),
        timestamp.as_millisecond()
    ))
}

/// Check that `path` is an existing regular file and return its length
pub async fn ensure_content_file(path: &Path) -> Result<u64> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => Ok(metadata.len()),
        Ok(_) => Err(Error::MissingContent(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::MissingContent(path.to_path_buf())),
        Err(e) => Err(e.into()),
    }
}

/// Open a local file for upload
pub async fn open_content_file(path: &Path) -> Result<File> {
    File::open(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::MissingContent(path.to_path_buf()),
        _ => Error::Io(e),
    })
}

/// Compute the MD5 checksum of a local file as lowercase hex
///
/// The file is streamed and closed before this returns.
pub async fn file_md5(path: &Path) -> Result<String> {
    let mut file = open_content_file(path).await?;
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

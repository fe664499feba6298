// upload saving with collision-avoiding renames

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::utils::files::split_extension;

/// upper bound on `.NNN` suffixes tried before giving up
const MAX_RENAME_ATTEMPTS: u32 = 9999;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid filename")]
    InvalidFilename,
    #[error("no free name after {0} attempts")]
    NoFreeName(u32),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// one file taken from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// result of saving one uploaded file
#[derive(Debug)]
pub struct UploadOutcome {
    pub original_name: String,
    pub result: Result<PathBuf, UploadError>,
}

/// save every file into `local_dir`; a failure on one file does not stop the rest
pub async fn handle_upload(local_dir: &Path, files: Vec<UploadedFile>) -> Vec<UploadOutcome> {
    let mut outcomes = Vec::with_capacity(files.len());

    for file in files {
        let result = save_upload(local_dir, &file).await;
        match &result {
            Ok(path) => info!(
                "saved upload {:?} ({} bytes) to {}",
                file.file_name,
                file.data.len(),
                path.display()
            ),
            Err(err) => warn!("upload {:?} failed: {}", file.file_name, err),
        }
        outcomes.push(UploadOutcome {
            original_name: file.file_name,
            result,
        });
    }

    outcomes
}

/// write one file under its base name, adding `.NNN` before the extension on collision
pub async fn save_upload(local_dir: &Path, file: &UploadedFile) -> Result<PathBuf, UploadError> {
    let base_name = upload_basename(&file.file_name)?;

    for attempt in 0..=MAX_RENAME_ATTEMPTS {
        let candidate = local_dir.join(collision_name(base_name, attempt));

        // exclusive create closes the gap between the existence check and the write
        let open_result = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await;

        let mut out = match open_result {
            Ok(out) => out,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(UploadError::Io(err)),
        };

        let written = async {
            out.write_all(&file.data).await?;
            out.flush().await
        }
        .await;

        if let Err(err) = written {
            let _ = fs::remove_file(&candidate).await;
            return Err(UploadError::Io(err));
        }

        return Ok(candidate);
    }

    Err(UploadError::NoFreeName(MAX_RENAME_ATTEMPTS))
}

/// last path component of a client-supplied file name
pub fn upload_basename(file_name: &str) -> Result<&str, UploadError> {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    if base.is_empty() || base == "." || base == ".." {
        return Err(UploadError::InvalidFilename);
    }

    Ok(base)
}

/// `name` for attempt 0, otherwise `stem.NNN.ext`
pub fn collision_name(name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_string();
    }

    let (stem, extension) = split_extension(name);
    format!("{stem}.{attempt:03}{extension}")
}

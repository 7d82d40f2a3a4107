//! Upload storage: validates an uploaded CSV and writes it to the data path.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Aucun fichier sélectionné")]
    EmptyUpload,
    #[error("Nom de fichier vide")]
    EmptyFileName,
    #[error("Format de fichier non supporté. Veuillez uploader un fichier CSV.")]
    UnsupportedFormat(String),
    #[error("Failed to store upload at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validate `file_name`/`contents` and overwrite `destination` with them.
///
/// The parent directory is created when missing. The write is not atomic.
pub fn store_upload(
    file_name: &str,
    contents: &[u8],
    destination: &Path,
) -> Result<PathBuf, UploadError> {
    if file_name.is_empty() {
        return Err(UploadError::EmptyFileName);
    }
    if !file_name.ends_with(".csv") {
        return Err(UploadError::UnsupportedFormat(file_name.to_string()));
    }
    if contents.is_empty() {
        return Err(UploadError::EmptyUpload);
    }

    let io_err = |source: std::io::Error| UploadError::Io {
        path: destination.to_path_buf(),
        source,
    };

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(destination, contents).map_err(io_err)?;

    info!(
        file_name,
        bytes = contents.len(),
        destination = %destination.display(),
        "stored upload"
    );
    Ok(destination.to_path_buf())
}

//! Local storage of downloaded media.

use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::ports::MediaError;

/// Writes media bytes to `{dir}/{uuid}.{extension}`, creating `dir` if needed.
pub(crate) async fn save_media(
    dir: &Path,
    extension: &str,
    bytes: &[u8],
) -> Result<PathBuf, MediaError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| MediaError::IoError(e.to_string()))?;

    let path = dir.join(format!("{}.{}", Uuid::new_v4(), extension));
    fs::write(&path, bytes)
        .await
        .map_err(|e| MediaError::IoError(e.to_string()))?;

    Ok(path)
}

/// Extension of a remote file path, `ogg` when it has none.
pub(crate) fn extension_or_ogg(file_path: &str) -> &str {
    Path::new(file_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or("ogg")
}

use std::fs;
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactDirError {
    #[error("artifact directory missing or not writable: {0}")]
    NotWritable(String),
}

/// Ensure the archive output directory exists and is writable; create if
/// missing.
pub fn ensure_artifact_dir(dir: &Path) -> Result<(), ArtifactDirError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| ArtifactDirError::NotWritable(e.to_string()))?;
        if !meta.is_dir() {
            return Err(ArtifactDirError::NotWritable(
                "path is not a directory".into(),
            ));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| ArtifactDirError::NotWritable(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| ArtifactDirError::NotWritable(e.to_string()))?;
    Ok(())
}

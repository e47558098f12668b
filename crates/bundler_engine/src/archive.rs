use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;
use url::Url;
use zip::result::ZipError;
use zip::write::{SimpleFileOptions, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("could not create archive file: {0}")]
    Create(io::Error),
    #[error("could not write archive entry {name}: {source}")]
    Entry { name: String, source: ZipError },
    #[error("could not finalize archive: {0}")]
    Finish(ZipError),
}

/// Writes fetched files into a single zip archive on disk.
///
/// Entry names are not deduplicated: two URLs sharing a final path segment
/// produce two entries with the same name.
pub struct ArchiveWriter {
    inner: ZipWriter<File>,
}

impl ArchiveWriter {
    pub fn create(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::create(path).map_err(ArchiveError::Create)?;
        Ok(Self {
            inner: ZipWriter::new(file),
        })
    }

    pub fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        self.inner
            .start_file(name, SimpleFileOptions::default())
            .map_err(|source| ArchiveError::Entry {
                name: name.to_string(),
                source,
            })?;
        self.inner.write_all(bytes).map_err(|err| ArchiveError::Entry {
            name: name.to_string(),
            source: ZipError::Io(err),
        })?;
        Ok(())
    }

    pub fn finish(self) -> Result<(), ArchiveError> {
        self.inner
            .finish()
            .map(|_| ())
            .map_err(ArchiveError::Finish)
    }
}

/// Archive entry name for a URL: its final non-empty path segment, or
/// `"file"` when the URL carries no usable path.
pub fn entry_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path()
                .rsplit('/')
                .find(|segment| !segment.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "file".to_string())
}

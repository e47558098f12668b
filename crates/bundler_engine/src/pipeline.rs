use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::archive::{entry_name, ArchiveError, ArchiveWriter};
use crate::fetch::Fetcher;

/// Reserved error-map key for failures that are not tied to a single URL.
pub const SYSTEM_ERROR_KEY: &str = "system";

/// File extension of produced archives.
pub const ARCHIVE_EXTENSION: &str = "zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// File name of the produced archive inside the artifact directory.
    pub archive_file: String,
    /// Per-URL failure reasons; empty when every fetch succeeded.
    pub errors: BTreeMap<String, String>,
}

/// One download-and-archive run per eligible task.
///
/// Runs for different tasks are fully independent; nothing here touches the
/// task store, so a slow remote never blocks API traffic.
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    artifact_dir: PathBuf,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, artifact_dir: PathBuf) -> Self {
        Self {
            fetcher,
            artifact_dir,
        }
    }

    pub fn archive_file_name(task_id: &str) -> String {
        format!("{task_id}.{ARCHIVE_EXTENSION}")
    }

    /// Fetch every URL in registration order and pack the successes into one
    /// archive named after the task.
    ///
    /// Fetch failures are independent: each is recorded under its URL and the
    /// batch carries on. The only fatal error is failing to allocate the
    /// archive file itself.
    pub async fn run(
        &self,
        task_id: &str,
        urls: &[String],
    ) -> Result<PipelineOutcome, ArchiveError> {
        let archive_file = Self::archive_file_name(task_id);
        let mut writer = ArchiveWriter::create(&self.artifact_dir.join(&archive_file))?;
        let mut errors = BTreeMap::new();

        for url in urls {
            match self.fetcher.fetch(url).await {
                Ok(output) => {
                    log::debug!(
                        "fetched {} ({} bytes)",
                        output.metadata.final_url,
                        output.metadata.byte_len
                    );
                    if let Err(err) = writer.add_entry(&entry_name(url), &output.bytes) {
                        errors.insert(url.clone(), err.to_string());
                    }
                }
                Err(err) => {
                    log::warn!("fetch failed for {url}: {err}");
                    errors.insert(url.clone(), err.to_string());
                }
            }
        }

        if let Err(err) = writer.finish() {
            // Every URL was already attempted; keep the per-URL results and
            // record the broken artifact instead of discarding the run.
            errors.insert(SYSTEM_ERROR_KEY.to_string(), err.to_string());
        }

        Ok(PipelineOutcome {
            archive_file,
            errors,
        })
    }
}

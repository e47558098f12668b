//! Bundler engine: the download-and-archive pipeline.
mod archive;
mod artifacts;
mod fetch;
mod pipeline;

pub use archive::{entry_name, ArchiveError, ArchiveWriter};
pub use artifacts::{ensure_artifact_dir, ArtifactDirError};
pub use fetch::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, FetchSettings, Fetcher, ReqwestFetcher,
};
pub use pipeline::{Pipeline, PipelineOutcome, ARCHIVE_EXTENSION, SYSTEM_ERROR_KEY};

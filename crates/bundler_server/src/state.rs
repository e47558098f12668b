use std::path::PathBuf;
use std::sync::Arc;

use bundler_core::TaskStore;
use bundler_engine::Pipeline;

/// Shared handles threaded through every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TaskStore>,
    pub pipeline: Arc<Pipeline>,
    /// Directory archives are written to and served from.
    pub artifact_dir: PathBuf,
}

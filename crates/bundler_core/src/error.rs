use thiserror::Error;

/// Validation failures surfaced synchronously by lifecycle operations.
///
/// These are the only errors a caller of the store ever sees; everything that
/// goes wrong during a pipeline run is recorded in the task's error map
/// instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The task id is not present in the store.
    #[error("task not found")]
    TaskNotFound,
    /// The active-task ceiling or a task's file limit was hit.
    #[error("capacity exceeded")]
    CapacityExceeded,
    /// The URL's file extension is not in the allowed set.
    #[error("unsupported file type")]
    UnsupportedType,
}

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::LifecycleError;
use crate::task::{Task, TaskId, TaskSnapshot, TaskStatus};

/// Reserved error-map key for failures that are not tied to a single URL.
pub const SYSTEM_ERROR_KEY: &str = "system";

/// Deferred work handed back by a store operation.
///
/// Effects are executed by the caller after the store's critical section has
/// returned, so network and disk IO never run under the lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RunPipeline { task_id: TaskId, urls: Vec<String> },
}

/// Process-wide task state behind a single exclusive lock.
///
/// The task map and the active-task counter are only ever touched together,
/// inside one critical section per operation, so no caller can observe a
/// half-updated store.
pub struct TaskStore {
    config: Config,
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    tasks: HashMap<TaskId, Task>,
    active_tasks: usize,
}

impl TaskStore {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// Allocate a new pending task, enforcing the active-task ceiling.
    ///
    /// Nothing is mutated when the ceiling is already reached.
    pub fn create_task(&self) -> Result<TaskSnapshot, LifecycleError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.active_tasks >= self.config.max_concurrent_tasks {
            return Err(LifecycleError::CapacityExceeded);
        }
        let task = Task::new(Uuid::new_v4().to_string(), Utc::now());
        let snapshot = task.snapshot();
        inner.tasks.insert(task.id.clone(), task);
        inner.active_tasks += 1;
        Ok(snapshot)
    }

    /// Append a URL to a task, handing back a pipeline run when the append
    /// fills the task.
    ///
    /// The capacity check, the append and the threshold check share one
    /// critical section: two callers racing the final slot can never both
    /// observe the threshold, so at most one `RunPipeline` effect is ever
    /// handed out per task. A task that already reached its file limit
    /// rejects further URLs regardless of pipeline state.
    pub fn add_url(&self, task_id: &str, url: &str) -> Result<Option<Effect>, LifecycleError> {
        let mut inner = self.inner.lock().unwrap();
        let task = inner
            .tasks
            .get_mut(task_id)
            .ok_or(LifecycleError::TaskNotFound)?;
        if task.urls.len() >= self.config.max_files_per_task {
            return Err(LifecycleError::CapacityExceeded);
        }
        if !self.config.allows_url(url) {
            return Err(LifecycleError::UnsupportedType);
        }
        task.urls.push(url.to_string());
        if task.urls.len() == self.config.max_files_per_task {
            return Ok(Some(Effect::RunPipeline {
                task_id: task.id.clone(),
                urls: task.urls.clone(),
            }));
        }
        Ok(None)
    }

    /// Read an owned copy of a task; callers never see the live record.
    pub fn get_task(&self, task_id: &str) -> Result<TaskSnapshot, LifecycleError> {
        let inner = self.inner.lock().unwrap();
        inner
            .tasks
            .get(task_id)
            .map(Task::snapshot)
            .ok_or(LifecycleError::TaskNotFound)
    }

    /// Move a task from `Pending` to `Processing` as its pipeline run starts.
    pub fn begin_processing(&self, task_id: &str) -> Result<(), LifecycleError> {
        let mut inner = self.inner.lock().unwrap();
        let task = inner
            .tasks
            .get_mut(task_id)
            .ok_or(LifecycleError::TaskNotFound)?;
        if task.status == TaskStatus::Pending {
            task.status = TaskStatus::Processing;
        }
        Ok(())
    }

    /// Finalize a task after its pipeline run attempted every URL.
    ///
    /// `archive` is the host-agnostic locator of the produced artifact;
    /// `errors` maps each failed URL to its reason. A task that is already
    /// terminal is left untouched.
    pub fn complete_task(
        &self,
        task_id: &str,
        archive: String,
        errors: BTreeMap<String, String>,
    ) -> Result<(), LifecycleError> {
        let mut inner = self.inner.lock().unwrap();
        let task = inner
            .tasks
            .get_mut(task_id)
            .ok_or(LifecycleError::TaskNotFound)?;
        if task.status.is_terminal() {
            return Ok(());
        }
        task.status = TaskStatus::Completed;
        task.archive = Some(archive);
        task.errors = errors;
        inner.active_tasks -= 1;
        Ok(())
    }

    /// Mark a task failed because its pipeline could not produce an archive.
    ///
    /// The reason is recorded under [`SYSTEM_ERROR_KEY`] to keep it distinct
    /// from per-URL fetch failures.
    pub fn fail_task(&self, task_id: &str, reason: String) -> Result<(), LifecycleError> {
        let mut inner = self.inner.lock().unwrap();
        let task = inner
            .tasks
            .get_mut(task_id)
            .ok_or(LifecycleError::TaskNotFound)?;
        if task.status.is_terminal() {
            return Ok(());
        }
        task.status = TaskStatus::Failed;
        task.errors = BTreeMap::from([(SYSTEM_ERROR_KEY.to_string(), reason)]);
        inner.active_tasks -= 1;
        Ok(())
    }

    /// Number of tasks not yet in a terminal status.
    pub fn active_tasks(&self) -> usize {
        self.inner.lock().unwrap().active_tasks
    }
}

use bundler_core::{Effect, TaskId};

use crate::state::AppState;

/// Execute an effect handed back by the task store.
///
/// Runs after the store's critical section has been released; the pipeline
/// gets its own tokio task so the caller's request returns immediately.
pub fn execute(state: AppState, effect: Effect) {
    match effect {
        Effect::RunPipeline { task_id, urls } => run_pipeline(state, task_id, urls),
    }
}

fn run_pipeline(state: AppState, task_id: TaskId, urls: Vec<String>) {
    tokio::spawn(async move {
        if let Err(err) = state.store.begin_processing(&task_id) {
            log::error!("task {task_id} vanished before processing: {err}");
            return;
        }
        match state.pipeline.run(&task_id, &urls).await {
            Ok(outcome) => {
                let archive = format!("/download/{}", outcome.archive_file);
                let failed = outcome.errors.len();
                if let Err(err) =
                    state
                        .store
                        .complete_task(&task_id, archive.clone(), outcome.errors)
                {
                    log::error!("could not record completion for task {task_id}: {err}");
                    return;
                }
                log::info!("task {task_id} completed ({failed} failed fetches), archive at {archive}");
            }
            Err(err) => {
                log::error!("task {task_id} failed: {err}");
                if let Err(err) = state.store.fail_task(&task_id, err.to_string()) {
                    log::error!("could not record failure for task {task_id}: {err}");
                }
            }
        }
    });
}

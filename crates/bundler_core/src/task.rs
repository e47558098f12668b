use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Opaque unique identifier of one batch job.
pub type TaskId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Whether the task has reached a state it can never leave.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// Live task record. Owned exclusively by the store; callers only ever see
/// [`TaskSnapshot`] copies.
#[derive(Debug, Clone)]
pub(crate) struct Task {
    pub(crate) id: TaskId,
    pub(crate) status: TaskStatus,
    pub(crate) urls: Vec<String>,
    pub(crate) errors: BTreeMap<String, String>,
    pub(crate) archive: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl Task {
    pub(crate) fn new(id: TaskId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            status: TaskStatus::Pending,
            urls: Vec::new(),
            errors: BTreeMap::new(),
            archive: None,
            created_at,
        }
    }

    pub(crate) fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id.clone(),
            status: self.status,
            urls: self.urls.clone(),
            errors: self.errors.clone(),
            archive: self.archive.clone(),
            created_at: self.created_at,
        }
    }
}

/// Owned copy of a task record, safe to hold and serialize outside the
/// store's lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub status: TaskStatus,
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    pub created_at: DateTime<Utc>,
}

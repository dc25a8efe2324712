//! Task pages.

use crate::error::ApiError;
use crate::record::{decode_tasks, decode_updates};
use crate::session::ScopeSet;
use crate::state::Crm;
use crate::types::{EntityKind, RecordId, Task, Update};

/// Task detail page: the task plus its associated updates.
#[derive(Debug, Clone)]
pub struct TaskDetail {
    pub task: Task,
    pub updates: Vec<Update>,
}

/// My-tasks list: every task assigned to the current user.
pub async fn my_tasks(crm: &Crm) -> Result<Vec<Task>, ApiError> {
    let ids = crm.session.ids(ScopeSet::AssignedTasks);
    let records = crm
        .cache
        .fetch_many(crm.api.as_ref(), EntityKind::Tasks, &ids)
        .await?;
    decode_tasks(&records)
}

/// Load a task and, once its update references are known, the updates.
pub async fn task_detail(crm: &Crm, id: RecordId) -> Result<TaskDetail, ApiError> {
    let record = crm
        .cache
        .fetch_one(crm.api.as_ref(), EntityKind::Tasks, id)
        .await?;
    let task = Task::from_record(&record)?;

    let updates = if task.updates.is_empty() {
        Vec::new()
    } else {
        decode_updates(
            &crm.cache
                .fetch_many(crm.api.as_ref(), EntityKind::Updates, &task.updates)
                .await?,
        )?
    };

    Ok(TaskDetail { task, updates })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::{MemoryStorage, SessionStore};
    use crate::testutil::{record, FakeApi};

    fn crm_with_fake() -> (Crm, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::new());
        let session = SessionStore::new(Arc::new(MemoryStorage::new()));
        (Crm::new(api.clone(), session), api)
    }

    #[tokio::test]
    async fn test_my_tasks_scoped_by_assigned_ids() {
        let (crm, api) = crm_with_fake();
        crm.session.add_id(ScopeSet::AssignedTasks, 1);
        api.insert(
            EntityKind::Tasks,
            record(1, serde_json::json!({ "Task Name": "Draft contract", "Status": "In Progress" })),
        );
        // A task only in taskIds must not show up here.
        crm.session.add_id(ScopeSet::Tasks, 2);
        api.insert(
            EntityKind::Tasks,
            record(2, serde_json::json!({ "Task Name": "Other" })),
        );

        let tasks = my_tasks(&crm).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 1);
    }

    #[tokio::test]
    async fn test_no_assigned_tasks_resolves_empty_without_network() {
        let (crm, api) = crm_with_fake();
        let tasks = my_tasks(&crm).await.unwrap();
        assert!(tasks.is_empty());
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_task_detail_loads_expanded_update_references() {
        let (crm, api) = crm_with_fake();
        // Back-references can arrive as expanded objects.
        api.insert(
            EntityKind::Tasks,
            record(9, serde_json::json!({ "Task Name": "Draft contract", "Updates": [{ "id": 1 }] })),
        );
        api.insert(
            EntityKind::Updates,
            record(1, serde_json::json!({ "Notes": "Sent the draft" })),
        );

        let detail = task_detail(&crm, 9).await.unwrap();
        assert_eq!(detail.task.display_name(), "Draft contract");
        assert_eq!(detail.updates.len(), 1);
        assert_eq!(detail.updates[0].notes.as_deref(), Some("Sent the draft"));
    }
}

//! Update pages.

use crate::error::ApiError;
use crate::record::decode_updates;
use crate::session::ScopeSet;
use crate::state::Crm;
use crate::types::{EntityKind, Project, RecordId, Task, Update};

/// A row on the my-updates list: the update with its display context.
/// Names come from the record's server-side lookups, falling back to
/// "N/A" like every unresolvable reference.
#[derive(Debug, Clone)]
pub struct UpdateRow {
    pub update: Update,
    pub project_name: String,
    pub task_name: Option<String>,
}

/// Update detail page: the update plus its referenced project and task,
/// each fetched only when the reference exists.
#[derive(Debug, Clone)]
pub struct UpdateDetail {
    pub update: Update,
    pub project: Option<Project>,
    pub task: Option<Task>,
}

/// My-updates list, scoped by `updateIds`.
pub async fn my_updates(crm: &Crm) -> Result<Vec<UpdateRow>, ApiError> {
    let ids = crm.session.ids(ScopeSet::Updates);
    let records = crm
        .cache
        .fetch_many(crm.api.as_ref(), EntityKind::Updates, &ids)
        .await?;
    let updates = decode_updates(&records)?;

    Ok(updates
        .into_iter()
        .map(|update| {
            let project_name = update
                .project_name
                .clone()
                .unwrap_or_else(|| "N/A".to_string());
            // Task context renders only when both the name and the
            // reference resolved.
            let task_name = match (&update.task_name, update.task) {
                (Some(name), Some(_)) => Some(name.clone()),
                _ => None,
            };
            UpdateRow {
                update,
                project_name,
                task_name,
            }
        })
        .collect())
}

/// Load an update, then its project and task, gated on each reference.
pub async fn update_detail(crm: &Crm, id: RecordId) -> Result<UpdateDetail, ApiError> {
    let record = crm
        .cache
        .fetch_one(crm.api.as_ref(), EntityKind::Updates, id)
        .await?;
    let update = Update::from_record(&record)?;

    let project = match update.project {
        Some(project_id) => {
            let record = crm
                .cache
                .fetch_one(crm.api.as_ref(), EntityKind::Projects, project_id)
                .await?;
            Some(Project::from_record(&record)?)
        }
        None => None,
    };

    let task = match update.task {
        Some(task_id) => {
            let record = crm
                .cache
                .fetch_one(crm.api.as_ref(), EntityKind::Tasks, task_id)
                .await?;
            Some(Task::from_record(&record)?)
        }
        None => None,
    };

    Ok(UpdateDetail {
        update,
        project,
        task,
    })
}

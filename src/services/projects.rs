//! Project pages.

use crate::error::ApiError;
use crate::queries::{account_name_index, resolve_account_name, resolve_task_name, task_name_index};
use crate::record::{decode_accounts, decode_projects, decode_tasks, decode_updates};
use crate::session::ScopeSet;
use crate::state::Crm;
use crate::types::{EntityKind, Project, RecordId, Update};

/// A row on the projects list: the project plus its resolved account name.
#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub project: Project,
    pub account_name: String,
}

/// An update on the project detail page with its task reference resolved
/// to a name ("N/A" when the reference is absent or unfetchable).
#[derive(Debug, Clone)]
pub struct UpdateWithTask {
    pub update: Update,
    pub task_name: String,
}

/// Project detail page: the project, its account name, and its updates
/// joined with their task names.
#[derive(Debug, Clone)]
pub struct ProjectDetail {
    pub project: Project,
    pub account_name: String,
    pub updates: Vec<UpdateWithTask>,
}

/// My-projects list, scoped by `projectIds`, with account names resolved
/// against the user's accounts.
pub async fn projects_overview(crm: &Crm) -> Result<Vec<ProjectRow>, ApiError> {
    let project_ids = crm.session.ids(ScopeSet::Projects);
    let records = crm
        .cache
        .fetch_many(crm.api.as_ref(), EntityKind::Projects, &project_ids)
        .await?;
    let projects = decode_projects(&records)?;

    let account_ids = crm.session.ids(ScopeSet::Accounts);
    let accounts = decode_accounts(
        &crm.cache
            .fetch_many(crm.api.as_ref(), EntityKind::Accounts, &account_ids)
            .await?,
    )?;
    let index = account_name_index(&accounts);

    Ok(projects
        .into_iter()
        .map(|project| {
            let account_name =
                resolve_account_name(project.account, project.account_name.as_deref(), &index);
            ProjectRow { project, account_name }
        })
        .collect())
}

/// Load a project, then its updates, then the tasks those updates
/// reference. Each dependent fetch waits on the IDs from the previous
/// one and is skipped entirely when there are none.
pub async fn project_detail(crm: &Crm, id: RecordId) -> Result<ProjectDetail, ApiError> {
    let record = crm
        .cache
        .fetch_one(crm.api.as_ref(), EntityKind::Projects, id)
        .await?;
    let project = Project::from_record(&record)?;
    let account_name = project
        .account_name
        .clone()
        .unwrap_or_else(|| "N/A".to_string());

    let updates = if project.updates.is_empty() {
        Vec::new()
    } else {
        decode_updates(
            &crm.cache
                .fetch_many(crm.api.as_ref(), EntityKind::Updates, &project.updates)
                .await?,
        )?
    };

    let mut task_ids: Vec<RecordId> = Vec::new();
    for update in &updates {
        if let Some(task_id) = update.task {
            if !task_ids.contains(&task_id) {
                task_ids.push(task_id);
            }
        }
    }
    let tasks = if task_ids.is_empty() {
        Vec::new()
    } else {
        decode_tasks(
            &crm.cache
                .fetch_many(crm.api.as_ref(), EntityKind::Tasks, &task_ids)
                .await?,
        )?
    };

    let index = task_name_index(&tasks);
    let updates = updates
        .into_iter()
        .map(|update| {
            let task_name = resolve_task_name(&update, &index);
            UpdateWithTask { update, task_name }
        })
        .collect();

    Ok(ProjectDetail {
        project,
        account_name,
        updates,
    })
}

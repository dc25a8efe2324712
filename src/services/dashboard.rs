//! Home dashboard service.

use crate::error::ApiError;
use crate::queries::upcoming_tasks;
use crate::record::decode_tasks;
use crate::session::ScopeSet;
use crate::state::Crm;
use crate::types::{EntityKind, Task};

/// Everything the home page renders.
#[derive(Debug, Clone)]
pub struct HomeDashboard {
    pub user_name: String,
    /// Scope-set counters for the summary cards.
    pub managed_accounts: usize,
    pub active_projects: usize,
    pub recent_updates: usize,
    pub upcoming_tasks: Vec<Task>,
}

/// Load the home dashboard: counters straight off the scope sets, plus
/// the upcoming-tasks projection over the user's tasks.
pub async fn home_dashboard(crm: &Crm) -> Result<HomeDashboard, ApiError> {
    let user_name = crm.session.user_name().unwrap_or_else(|| "User".to_string());

    let managed_accounts = crm.session.ids(ScopeSet::Accounts).len();
    let active_projects = crm.session.ids(ScopeSet::Projects).len();
    let recent_updates = crm.session.ids(ScopeSet::Updates).len();

    let task_ids = crm.session.ids(ScopeSet::Tasks);
    let records = crm
        .cache
        .fetch_many(crm.api.as_ref(), EntityKind::Tasks, &task_ids)
        .await?;
    let tasks = decode_tasks(&records)?;

    Ok(HomeDashboard {
        user_name,
        managed_accounts,
        active_projects,
        recent_updates,
        upcoming_tasks: upcoming_tasks(&tasks),
    })
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
    async fn test_dashboard_counts_and_upcoming_tasks() {
        let (crm, api) = crm_with_fake();
        crm.session.login("Priya", "usr-9", false);
        crm.session.add_id(ScopeSet::Accounts, 41);
        crm.session.add_id(ScopeSet::Projects, 12);
        crm.session.add_id(ScopeSet::Projects, 13);
        crm.session.add_id(ScopeSet::Tasks, 1);
        crm.session.add_id(ScopeSet::Tasks, 2);

        api.insert(
            EntityKind::Tasks,
            record(1, serde_json::json!({ "Task Name": "Ship", "Status": "Done", "Due Date": "2026-08-01" })),
        );
        api.insert(
            EntityKind::Tasks,
            record(2, serde_json::json!({ "Task Name": "Draft", "Status": "To Do", "Due Date": "2026-08-10" })),
        );

        let dashboard = home_dashboard(&crm).await.unwrap();
        assert_eq!(dashboard.user_name, "Priya");
        assert_eq!(dashboard.managed_accounts, 1);
        assert_eq!(dashboard.active_projects, 2);
        assert_eq!(dashboard.recent_updates, 0);
        // Done task filtered out of the upcoming list.
        assert_eq!(dashboard.upcoming_tasks.len(), 1);
        assert_eq!(dashboard.upcoming_tasks[0].id, 2);
    }

    #[tokio::test]
    async fn test_empty_task_scope_never_hits_the_api() {
        let (crm, api) = crm_with_fake();

        let dashboard = home_dashboard(&crm).await.unwrap();
        assert_eq!(dashboard.user_name, "User");
        assert!(dashboard.upcoming_tasks.is_empty());
        assert_eq!(api.call_count(), 0);
    }
}

//! Account pages.

use crate::error::ApiError;
use crate::record::{decode_accounts, decode_projects};
use crate::session::ScopeSet;
use crate::state::Crm;
use crate::types::{Account, EntityKind, Project, RecordId};

/// Account detail page: the account plus its back-referenced projects.
#[derive(Debug, Clone)]
pub struct AccountDetail {
    pub account: Account,
    pub projects: Vec<Project>,
}

/// My-accounts list, scoped by `accountIds`.
pub async fn my_accounts(crm: &Crm) -> Result<Vec<Account>, ApiError> {
    let ids = crm.session.ids(ScopeSet::Accounts);
    let records = crm
        .cache
        .fetch_many(crm.api.as_ref(), EntityKind::Accounts, &ids)
        .await?;
    decode_accounts(&records)
}

/// Load an account and, once its project references are known, the
/// projects themselves. The dependent fetch is gated: no project IDs, no
/// second request.
pub async fn account_detail(crm: &Crm, id: RecordId) -> Result<AccountDetail, ApiError> {
    let record = crm
        .cache
        .fetch_one(crm.api.as_ref(), EntityKind::Accounts, id)
        .await?;
    let account = Account::from_record(&record)?;

    let projects = if account.projects.is_empty() {
        Vec::new()
    } else {
        let records = crm
            .cache
            .fetch_many(crm.api.as_ref(), EntityKind::Projects, &account.projects)
            .await?;
        decode_projects(&records)?
    };

    Ok(AccountDetail { account, projects })
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
    async fn test_account_detail_fetches_back_referenced_projects() {
        let (crm, api) = crm_with_fake();
        api.insert(
            EntityKind::Accounts,
            record(41, serde_json::json!({ "Account Name": "Acme", "Projects": [12, 13] })),
        );
        api.insert(
            EntityKind::Projects,
            record(12, serde_json::json!({ "Project Name": "Rollout" })),
        );
        api.insert(
            EntityKind::Projects,
            record(13, serde_json::json!({ "Project Name": "Renewal" })),
        );

        let detail = account_detail(&crm, 41).await.unwrap();
        assert_eq!(detail.account.display_name(), "Acme");
        assert_eq!(detail.projects.len(), 2);
        assert_eq!(api.call_count(), 2, "one account fetch, one batched project fetch");
    }

    #[tokio::test]
    async fn test_account_without_projects_skips_dependent_fetch() {
        let (crm, api) = crm_with_fake();
        api.insert(
            EntityKind::Accounts,
            record(41, serde_json::json!({ "Account Name": "Acme" })),
        );

        let detail = account_detail(&crm, 41).await.unwrap();
        assert!(detail.projects.is_empty());
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_surfaces_with_message() {
        let (crm, api) = crm_with_fake();

        let err = account_detail(&crm, 404).await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 404, .. }));
        assert_eq!(api.call_count(), 1);
    }
}

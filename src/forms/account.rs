//! Account creation form.

use super::{submit_message, FormPhase, Notification};
use crate::error::FormError;
use crate::session::ScopeSet;
use crate::state::Crm;
use crate::types::{AccountDraft, EntityKind, RecordId};

/// "Create a New Account" form state.
#[derive(Debug, Default)]
pub struct AccountForm {
    pub draft: AccountDraft,
    phase: FormPhase,
    pub notification: Option<Notification>,
}

impl AccountForm {
    pub fn new() -> AccountForm {
        AccountForm::default()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// The submit control is disabled while a request is in flight.
    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    fn validate(&self) -> Result<(), String> {
        if self.draft.name.trim().is_empty() {
            return Err("Account Name and Type are required.".to_string());
        }
        Ok(())
    }

    /// Submit the draft. On success the new ID joins `accountIds` and the
    /// form resets; on failure the entered values are kept.
    pub async fn submit(&mut self, crm: &Crm) -> Result<RecordId, FormError> {
        if let Err(message) = self.validate() {
            self.phase = FormPhase::Editing;
            self.notification = Some(Notification::error(&message));
            return Err(FormError::Validation(message));
        }

        self.phase = FormPhase::Submitting;
        let owner = crm.session.user_record_id();
        let fields = self.draft.to_fields(owner.as_deref());

        match crm.api.create(EntityKind::Accounts, fields).await {
            Ok(record) => {
                crm.session.add_id(ScopeSet::Accounts, record.id);
                crm.cache.invalidate_kind(EntityKind::Accounts);
                self.draft = AccountDraft::default();
                self.phase = FormPhase::Success;
                self.notification = Some(Notification::success("Account created successfully!"));
                Ok(record.id)
            }
            Err(e) => {
                let message = submit_message(&e, "Failed to create account.");
                self.phase = FormPhase::Failed;
                self.notification = Some(Notification::error(&message));
                Err(FormError::Submit(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::ApiError;
    use crate::forms::NotificationKind;
    use crate::session::{MemoryStorage, SessionStore};
    use crate::testutil::FakeApi;
    use crate::types::AccountType;

    fn crm_with_fake() -> (Crm, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::new());
        let session = SessionStore::new(Arc::new(MemoryStorage::new()));
        (Crm::new(api.clone(), session), api)
    }

    #[tokio::test]
    async fn test_create_account_success_updates_scope_and_resets_form() {
        let (crm, api) = crm_with_fake();
        crm.session.login("Priya", "usr-9", false);

        let mut form = AccountForm::new();
        form.draft.name = "Acme".into();
        form.draft.account_type = AccountType::Client;
        form.draft.description = String::new();

        let id = form.submit(&crm).await.unwrap();

        assert_eq!(crm.session.ids(ScopeSet::Accounts), vec![id]);
        assert_eq!(form.phase(), FormPhase::Success);
        // Form resets to its initial values.
        assert_eq!(form.draft, AccountDraft::default());
        assert_eq!(form.draft.account_type, AccountType::ALL[0]);
        let note = form.notification.unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(note.auto_hide, crate::forms::TOAST_DISMISS);
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_name_short_circuits_without_network() {
        let (crm, api) = crm_with_fake();

        let mut form = AccountForm::new();
        form.draft.account_type = AccountType::Client;

        let err = form.submit(&crm).await.unwrap_err();

        assert!(matches!(err, FormError::Validation(_)));
        assert_eq!(err.to_string(), "Account Name and Type are required.");
        assert_eq!(api.call_count(), 0);
        assert!(crm.session.ids(ScopeSet::Accounts).is_empty());
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_values_and_allows_retry() {
        let (crm, api) = crm_with_fake();

        let mut form = AccountForm::new();
        form.draft.name = "Acme".into();

        api.fail_next(ApiError::Api { status: 500, message: "upstream down".into() });
        let err = form.submit(&crm).await.unwrap_err();

        assert!(matches!(err, FormError::Submit(_)));
        assert_eq!(form.phase(), FormPhase::Failed);
        assert_eq!(form.draft.name, "Acme", "entered values survive a failure");
        assert_eq!(form.notification.as_ref().unwrap().message, "upstream down");
        assert!(crm.session.ids(ScopeSet::Accounts).is_empty());

        // Resubmission from Failed re-enters Submitting and can succeed.
        let id = form.submit(&crm).await.unwrap();
        assert_eq!(crm.session.ids(ScopeSet::Accounts), vec![id]);
    }
}

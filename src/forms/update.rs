//! Update creation forms: the full "Log a New Update" page and the inline
//! quick-update row on the projects list.

use super::{submit_message, FormPhase, Notification};
use crate::error::FormError;
use crate::session::ScopeSet;
use crate::state::Crm;
use crate::types::{EntityKind, RecordId, UpdateDraft, UpdateType};

/// "Log a New Update" form state.
#[derive(Debug, Default)]
pub struct UpdateForm {
    pub draft: UpdateDraft,
    phase: FormPhase,
    pub notification: Option<Notification>,
}

impl UpdateForm {
    pub fn new() -> UpdateForm {
        UpdateForm::default()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    fn validate(&self) -> Result<(), String> {
        if self.draft.notes.trim().is_empty()
            || self.draft.project.is_none()
            || self.draft.date.is_none()
        {
            return Err("Please fill out all required fields.".to_string());
        }
        Ok(())
    }

    pub async fn submit(&mut self, crm: &Crm) -> Result<RecordId, FormError> {
        if let Err(message) = self.validate() {
            self.phase = FormPhase::Editing;
            self.notification = Some(Notification::error(&message));
            return Err(FormError::Validation(message));
        }

        self.phase = FormPhase::Submitting;
        let owner = crm.session.user_record_id();
        let fields = self.draft.to_fields(owner.as_deref());

        match crm.api.create(EntityKind::Updates, fields).await {
            Ok(record) => {
                crm.session.add_id(ScopeSet::Updates, record.id);
                crm.cache.invalidate_kind(EntityKind::Updates);
                self.draft = UpdateDraft::default();
                self.phase = FormPhase::Success;
                self.notification = Some(Notification::success("Update created successfully!"));
                Ok(record.id)
            }
            Err(e) => {
                let message = submit_message(&e, "Failed to create update.");
                self.phase = FormPhase::Failed;
                self.notification = Some(Notification::error(&message));
                Err(FormError::Submit(message))
            }
        }
    }
}

/// Inline update logger on a project row: notes and type only, the
/// project reference is fixed and the date defaults to today at submit.
/// Confirmation and errors render inline, not as toasts.
#[derive(Debug)]
pub struct QuickUpdateForm {
    project_id: RecordId,
    pub notes: String,
    pub update_type: UpdateType,
    phase: FormPhase,
    pub notification: Option<Notification>,
}

impl QuickUpdateForm {
    pub fn new(project_id: RecordId) -> QuickUpdateForm {
        QuickUpdateForm {
            project_id,
            notes: String::new(),
            update_type: UpdateType::ALL[0],
            phase: FormPhase::Editing,
            notification: None,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub async fn submit(&mut self, crm: &Crm) -> Result<RecordId, FormError> {
        if self.notes.trim().is_empty() {
            let message = "Notes are required.".to_string();
            self.phase = FormPhase::Editing;
            self.notification = Some(Notification::inline_error(&message));
            return Err(FormError::Validation(message));
        }

        self.phase = FormPhase::Submitting;
        let draft = UpdateDraft {
            notes: self.notes.clone(),
            date: Some(chrono::Utc::now().date_naive()),
            update_type: self.update_type,
            project: Some(self.project_id),
            task: None,
        };
        let owner = crm.session.user_record_id();
        let fields = draft.to_fields(owner.as_deref());

        match crm.api.create(EntityKind::Updates, fields).await {
            Ok(record) => {
                crm.session.add_id(ScopeSet::Updates, record.id);
                crm.cache.invalidate_kind(EntityKind::Updates);
                self.notes = String::new();
                self.update_type = UpdateType::ALL[0];
                self.phase = FormPhase::Success;
                self.notification =
                    Some(Notification::inline_success("Update saved successfully!"));
                Ok(record.id)
            }
            Err(e) => {
                let message = submit_message(&e, "Failed to create update.");
                self.phase = FormPhase::Failed;
                self.notification = Some(Notification::inline_error(&message));
                Err(FormError::Submit(message))
            }
        }
    }
}

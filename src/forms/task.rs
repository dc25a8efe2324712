//! Task creation form.

use super::{submit_message, FormPhase, Notification};
use crate::error::FormError;
use crate::session::ScopeSet;
use crate::state::Crm;
use crate::types::{EntityKind, RecordId, TaskDraft};

/// "Create New Task" form state.
#[derive(Debug, Default)]
pub struct TaskForm {
    pub draft: TaskDraft,
    phase: FormPhase,
    pub notification: Option<Notification>,
}

impl TaskForm {
    pub fn new() -> TaskForm {
        TaskForm::default()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    fn validate(&self) -> Result<(), String> {
        if self.draft.name.trim().is_empty() || self.draft.project.is_none() {
            return Err("Task Name and Project are required.".to_string());
        }
        Ok(())
    }

    /// Submit the draft. The new ID always joins `taskIds`; it also joins
    /// `assignedTaskIds` when the task is assigned to the current user.
    pub async fn submit(&mut self, crm: &Crm) -> Result<RecordId, FormError> {
        if let Err(message) = self.validate() {
            self.phase = FormPhase::Editing;
            self.notification = Some(Notification::error(&message));
            return Err(FormError::Validation(message));
        }

        self.phase = FormPhase::Submitting;
        let fields = self.draft.to_fields();

        match crm.api.create(EntityKind::Tasks, fields).await {
            Ok(record) => {
                crm.session.add_id(ScopeSet::Tasks, record.id);
                let me = crm.session.user_record_id();
                if me.is_some() && self.draft.assigned_to == me {
                    crm.session.add_id(ScopeSet::AssignedTasks, record.id);
                }
                crm.cache.invalidate_kind(EntityKind::Tasks);
                self.draft = TaskDraft::default();
                self.phase = FormPhase::Success;
                self.notification = Some(Notification::success("Task created successfully!"));
                Ok(record.id)
            }
            Err(e) => {
                let message = submit_message(&e, "Failed to create task.");
                self.phase = FormPhase::Failed;
                self.notification = Some(Notification::error(&message));
                Err(FormError::Submit(message))
            }
        }
    }
}

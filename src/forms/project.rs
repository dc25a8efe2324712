//! Project creation and edit-in-place forms.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::{submit_message, FormPhase, Notification};
use crate::error::FormError;
use crate::session::ScopeSet;
use crate::state::Crm;
use crate::types::{EntityKind, Project, ProjectDraft, ProjectStatus, RecordId};

/// "Create a New Project" form state.
#[derive(Debug, Default)]
pub struct ProjectForm {
    pub draft: ProjectDraft,
    phase: FormPhase,
    pub notification: Option<Notification>,
}

impl ProjectForm {
    pub fn new() -> ProjectForm {
        ProjectForm::default()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    fn validate(&self) -> Result<(), String> {
        if self.draft.name.trim().is_empty() || self.draft.account.is_none() {
            return Err("Project Name and Account are required.".to_string());
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

        match crm.api.create(EntityKind::Projects, fields).await {
            Ok(record) => {
                crm.session.add_id(ScopeSet::Projects, record.id);
                crm.cache.invalidate_kind(EntityKind::Projects);
                self.draft = ProjectDraft::default();
                self.phase = FormPhase::Success;
                self.notification = Some(Notification::success("Project created successfully!"));
                Ok(record.id)
            }
            Err(e) => {
                let message = submit_message(&e, "Failed to create project.");
                self.phase = FormPhase::Failed;
                self.notification = Some(Notification::error(&message));
                Err(FormError::Submit(message))
            }
        }
    }
}

/// Edit-in-place form on the project detail page.
///
/// Pre-populated from the fetched record (and re-populated whenever that
/// record changes). Saving patches the record and invalidates its cached
/// fetches so the next read reflects the server's value; scope sets are
/// never touched by an edit.
#[derive(Debug)]
pub struct ProjectEditForm {
    project_id: RecordId,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub description: String,
    phase: FormPhase,
    pub notification: Option<Notification>,
}

impl ProjectEditForm {
    pub fn new(project_id: RecordId) -> ProjectEditForm {
        ProjectEditForm {
            project_id,
            status: None,
            start_date: None,
            end_date: None,
            value: None,
            description: String::new(),
            phase: FormPhase::Editing,
            notification: None,
        }
    }

    /// Load the editable fields from the fetched record.
    pub fn populate(&mut self, project: &Project) {
        self.status = project.status;
        self.start_date = project.start_date;
        self.end_date = project.end_date;
        self.value = project.value;
        self.description = project.description.clone().unwrap_or_default();
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    fn patch_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(status) = self.status {
            fields.insert(
                "Project Status".into(),
                Value::String(status.as_str().to_string()),
            );
        }
        fields.insert("Start Date".into(), date_value(self.start_date));
        fields.insert("End Date".into(), date_value(self.end_date));
        fields.insert(
            "Project Value".into(),
            match self.value {
                Some(v) => serde_json::Number::from_f64(v)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                None => Value::Null,
            },
        );
        fields.insert(
            "Project Description".into(),
            Value::String(self.description.clone()),
        );
        fields
    }

    /// Save the edited fields. Values are kept either way.
    pub async fn save(&mut self, crm: &Crm) -> Result<(), FormError> {
        self.phase = FormPhase::Submitting;
        let fields = self.patch_fields();

        match crm.api.update(EntityKind::Projects, self.project_id, fields).await {
            Ok(_) => {
                crm.cache.invalidate_record(EntityKind::Projects, self.project_id);
                self.phase = FormPhase::Success;
                self.notification =
                    Some(Notification::inline_success("Project saved successfully!"));
                Ok(())
            }
            Err(e) => {
                let message = submit_message(&e, "Failed to save project.");
                self.phase = FormPhase::Failed;
                self.notification = Some(Notification::inline_error(&message));
                Err(FormError::Submit(message))
            }
        }
    }
}

fn date_value(date: Option<NaiveDate>) -> Value {
    match date {
        Some(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        None => Value::String(String::new()),
    }
}

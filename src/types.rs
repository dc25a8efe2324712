//! Domain types for the four CRM record kinds.
//!
//! Enum values serialize to the literal option strings the remote API
//! stores (e.g. `"Channel Partner"`, `"Closed Won"`). Decoded records use
//! `Option` for every field because the wire envelope makes no presence
//! guarantee; display fallbacks live with the views, not here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-minted numeric record identifier. The client never invents one.
pub type RecordId = i64;

/// The record tables exposed by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Accounts,
    Projects,
    Tasks,
    Updates,
}

impl EntityKind {
    /// URL path segment for this table, e.g. `GET /Accounts/42`.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Accounts => "Accounts",
            EntityKind::Projects => "Projects",
            EntityKind::Tasks => "Tasks",
            EntityKind::Updates => "Updates",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "Channel Partner")]
    ChannelPartner,
    Client,
    Vendor,
    #[serde(rename = "Technology Partner")]
    TechnologyPartner,
    #[serde(rename = "Internal Initiative")]
    InternalInitiative,
}

impl AccountType {
    /// Dropdown order; the first entry is the form default.
    pub const ALL: [AccountType; 5] = [
        AccountType::ChannelPartner,
        AccountType::Client,
        AccountType::Vendor,
        AccountType::TechnologyPartner,
        AccountType::InternalInitiative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::ChannelPartner => "Channel Partner",
            AccountType::Client => "Client",
            AccountType::Vendor => "Vendor",
            AccountType::TechnologyPartner => "Technology Partner",
            AccountType::InternalInitiative => "Internal Initiative",
        }
    }

    pub fn parse(s: &str) -> Option<AccountType> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Negotiation,
    #[serde(rename = "Need Analysis")]
    NeedAnalysis,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Negotiation,
        ProjectStatus::NeedAnalysis,
        ProjectStatus::ClosedWon,
        ProjectStatus::ClosedLost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Negotiation => "Negotiation",
            ProjectStatus::NeedAnalysis => "Need Analysis",
            ProjectStatus::ClosedWon => "Closed Won",
            ProjectStatus::ClosedLost => "Closed Lost",
        }
    }

    pub fn parse(s: &str) -> Option<ProjectStatus> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::ToDo,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
            TaskStatus::Blocked => "Blocked",
        }
    }

    pub fn parse(s: &str) -> Option<TaskStatus> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateType {
    Email,
    Call,
    #[serde(rename = "Online Meeting")]
    OnlineMeeting,
    #[serde(rename = "Physical Meeting")]
    PhysicalMeeting,
}

impl UpdateType {
    pub const ALL: [UpdateType; 4] = [
        UpdateType::Email,
        UpdateType::Call,
        UpdateType::OnlineMeeting,
        UpdateType::PhysicalMeeting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Email => "Email",
            UpdateType::Call => "Call",
            UpdateType::OnlineMeeting => "Online Meeting",
            UpdateType::PhysicalMeeting => "Physical Meeting",
        }
    }

    pub fn parse(s: &str) -> Option<UpdateType> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

/// A decoded account record.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: RecordId,
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub description: Option<String>,
    /// Owner user reference (opaque user record ID).
    pub owner: Option<String>,
    /// Back-referenced project IDs, read-only from this side.
    pub projects: Vec<RecordId>,
}

impl Account {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Account")
    }
}

/// A decoded project record.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: RecordId,
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub description: Option<String>,
    pub account: Option<RecordId>,
    /// Server-side lookup of the account's name, when provided.
    pub account_name: Option<String>,
    pub owner: Option<String>,
    pub updates: Vec<RecordId>,
}

impl Project {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Project")
    }
}

/// A decoded task record.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: RecordId,
    pub name: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub project: Option<RecordId>,
    /// Server-side lookup of the project's name, when provided.
    pub project_name: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_to_name: Option<String>,
    pub updates: Vec<RecordId>,
}

impl Task {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Task")
    }
}

/// A decoded update record.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub id: RecordId,
    pub notes: Option<String>,
    pub date: Option<NaiveDate>,
    pub update_type: Option<UpdateType>,
    pub project: Option<RecordId>,
    pub project_name: Option<String>,
    pub task: Option<RecordId>,
    pub task_name: Option<String>,
    pub owner: Option<String>,
    pub owner_name: Option<String>,
}

/// Draft of a new account, as entered in the create form.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDraft {
    pub name: String,
    pub account_type: AccountType,
    pub description: String,
}

impl Default for AccountDraft {
    fn default() -> Self {
        AccountDraft {
            name: String::new(),
            account_type: AccountType::ALL[0],
            description: String::new(),
        }
    }
}

impl AccountDraft {
    /// Wire fields for the create request.
    pub fn to_fields(&self, owner: Option<&str>) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("Account Name".into(), Value::String(self.name.clone()));
        fields.insert(
            "Account Type".into(),
            Value::String(self.account_type.as_str().to_string()),
        );
        fields.insert(
            "Account Description".into(),
            Value::String(self.description.clone()),
        );
        fields.insert("Account Owner".into(), owner_refs(owner));
        fields
    }
}

/// Draft of a new project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub account: Option<RecordId>,
    pub value: Option<f64>,
    pub description: String,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        ProjectDraft {
            name: String::new(),
            status: ProjectStatus::ALL[0],
            start_date: None,
            end_date: None,
            account: None,
            value: None,
            description: String::new(),
        }
    }
}

impl ProjectDraft {
    pub fn to_fields(&self, owner: Option<&str>) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("Project Name".into(), Value::String(self.name.clone()));
        fields.insert(
            "Project Status".into(),
            Value::String(self.status.as_str().to_string()),
        );
        fields.insert("Start Date".into(), date_value(self.start_date));
        fields.insert("End Date".into(), date_value(self.end_date));
        fields.insert("Account".into(), id_refs(self.account));
        fields.insert("Project Value".into(), number_value(self.value));
        fields.insert(
            "Project Description".into(),
            Value::String(self.description.clone()),
        );
        fields.insert("Project Owner".into(), owner_refs(owner));
        fields
    }
}

/// Draft of a new task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub name: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub description: String,
    pub project: Option<RecordId>,
    /// User reference of the assignee, if any.
    pub assigned_to: Option<String>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        TaskDraft {
            name: String::new(),
            status: TaskStatus::ALL[0],
            due_date: None,
            description: String::new(),
            project: None,
            assigned_to: None,
        }
    }
}

impl TaskDraft {
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("Task Name".into(), Value::String(self.name.clone()));
        fields.insert(
            "Status".into(),
            Value::String(self.status.as_str().to_string()),
        );
        fields.insert("Due Date".into(), date_value(self.due_date));
        fields.insert(
            "Description".into(),
            Value::String(self.description.clone()),
        );
        fields.insert("Project".into(), id_refs(self.project));
        fields.insert("Assigned To".into(), owner_refs(self.assigned_to.as_deref()));
        fields
    }
}

/// Draft of a new update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDraft {
    pub notes: String,
    pub date: Option<NaiveDate>,
    pub update_type: UpdateType,
    pub project: Option<RecordId>,
    pub task: Option<RecordId>,
}

impl Default for UpdateDraft {
    fn default() -> Self {
        UpdateDraft {
            notes: String::new(),
            date: None,
            update_type: UpdateType::ALL[0],
            project: None,
            task: None,
        }
    }
}

impl UpdateDraft {
    pub fn to_fields(&self, owner: Option<&str>) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("Notes".into(), Value::String(self.notes.clone()));
        fields.insert("Date".into(), date_value(self.date));
        fields.insert(
            "Update Type".into(),
            Value::String(self.update_type.as_str().to_string()),
        );
        fields.insert("Project".into(), id_refs(self.project));
        fields.insert("Task".into(), id_refs(self.task));
        fields.insert("Update Owner".into(), owner_refs(owner));
        fields
    }
}

/// Reference list for a single optional record ID.
fn id_refs(id: Option<RecordId>) -> Value {
    match id {
        Some(id) => Value::Array(vec![Value::from(id)]),
        None => Value::Array(Vec::new()),
    }
}

/// Reference list for a single optional user ID.
fn owner_refs(owner: Option<&str>) -> Value {
    match owner {
        Some(o) if !o.is_empty() => Value::Array(vec![Value::String(o.to_string())]),
        _ => Value::Array(Vec::new()),
    }
}

/// ISO date or empty string, matching the form inputs on the wire.
fn date_value(date: Option<NaiveDate>) -> Value {
    match date {
        Some(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        None => Value::String(String::new()),
    }
}

/// JSON number or null.
fn number_value(value: Option<f64>) -> Value {
    match value {
        Some(v) => serde_json::Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trips_through_wire_strings() {
        for t in AccountType::ALL {
            assert_eq!(AccountType::parse(t.as_str()), Some(t));
        }
        for s in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::parse(s.as_str()), Some(s));
        }
        for s in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(s.as_str()), Some(s));
        }
        for t in UpdateType::ALL {
            assert_eq!(UpdateType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_enum_serde_uses_literal_option_strings() {
        assert_eq!(
            serde_json::to_value(AccountType::TechnologyPartner).unwrap(),
            serde_json::json!("Technology Partner")
        );
        assert_eq!(
            serde_json::to_value(TaskStatus::ToDo).unwrap(),
            serde_json::json!("To Do")
        );
    }

    #[test]
    fn test_account_draft_defaults_to_first_type_option() {
        let draft = AccountDraft::default();
        assert_eq!(draft.account_type, AccountType::ChannelPartner);
        assert!(draft.name.is_empty());
    }

    #[test]
    fn test_account_draft_fields_carry_owner_reference() {
        let draft = AccountDraft {
            name: "Acme".into(),
            account_type: AccountType::Client,
            description: String::new(),
        };
        let fields = draft.to_fields(Some("usr-7"));
        assert_eq!(fields["Account Name"], serde_json::json!("Acme"));
        assert_eq!(fields["Account Type"], serde_json::json!("Client"));
        assert_eq!(fields["Account Owner"], serde_json::json!(["usr-7"]));
    }

    #[test]
    fn test_project_draft_serializes_dates_and_refs() {
        let draft = ProjectDraft {
            name: "Q4 Rollout".into(),
            account: Some(41),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 15),
            value: Some(50_000.0),
            ..ProjectDraft::default()
        };
        let fields = draft.to_fields(None);
        assert_eq!(fields["Account"], serde_json::json!([41]));
        assert_eq!(fields["Start Date"], serde_json::json!("2026-01-15"));
        assert_eq!(fields["End Date"], serde_json::json!(""));
        assert_eq!(fields["Project Value"], serde_json::json!(50000.0));
        assert_eq!(fields["Project Owner"], serde_json::json!([]));
    }
}

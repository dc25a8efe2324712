//! The `{id, fields}` wire envelope and the decode boundary.
//!
//! Everything the API returns passes through here before the rest of the
//! crate sees it. Decoding is lenient about absence (missing fields become
//! `None`/empty and render as fallbacks) but strict about nonsense: a
//! present enum value the schema doesn't know is a decode error, not a
//! silently dropped field. Dates are the exception — an unparseable date
//! decodes to `None` because views must sort by date without failing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::types::{
    Account, AccountType, Project, ProjectStatus, RecordId, Task, TaskStatus, Update, UpdateType,
};

/// Generic record envelope, exactly as exchanged with the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// String field, `None` when absent or not a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Numeric field; accepts a JSON number or a numeric string.
    pub fn number_field(&self, name: &str) -> Option<f64> {
        match self.fields.get(name) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Date field. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; anything
    /// else (including garbage) is `None` so ordering never fails on it.
    pub fn date_field(&self, name: &str) -> Option<NaiveDate> {
        let raw = self.str_field(name)?;
        parse_date(raw)
    }

    /// Reference list field: an array of record IDs. Elements may be
    /// numbers, numeric strings, or `{id: …}` objects (expanded
    /// back-references); unusable elements are skipped.
    pub fn id_list_field(&self, name: &str) -> Vec<RecordId> {
        match self.fields.get(name) {
            Some(Value::Array(items)) => items.iter().filter_map(value_as_id).collect(),
            _ => Vec::new(),
        }
    }

    /// First element of a reference list, the usual single-reference case.
    pub fn first_id(&self, name: &str) -> Option<RecordId> {
        self.id_list_field(name).into_iter().next()
    }

    /// Lookup field: either a plain string or a list whose first element
    /// is the looked-up string (server-side join shapes vary).
    pub fn lookup_field(&self, name: &str) -> Option<String> {
        match self.fields.get(name) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Array(items)) => items.first().and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }

    /// User reference field: first element of a reference list, kept as an
    /// opaque string.
    pub fn user_ref_field(&self, name: &str) -> Option<String> {
        match self.fields.get(name) {
            Some(Value::Array(items)) => items.first().and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// Enum field: absent is `None`, present-but-unrecognized is an error.
    fn enum_field<T>(&self, name: &str, parse: fn(&str) -> Option<T>) -> Result<Option<T>, ApiError> {
        match self.str_field(name) {
            None => Ok(None),
            Some("") => Ok(None),
            Some(raw) => parse(raw).map(Some).ok_or_else(|| {
                ApiError::Decode(format!("unrecognized {} value: {}", name, raw))
            }),
        }
    }
}

fn value_as_id(value: &Value) -> Option<RecordId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(obj) => obj.get("id").and_then(value_as_id),
        _ => None,
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

impl Account {
    pub fn from_record(record: &Record) -> Result<Account, ApiError> {
        Ok(Account {
            id: record.id,
            name: record.str_field("Account Name").map(str::to_string),
            account_type: record.enum_field("Account Type", AccountType::parse)?,
            description: record.str_field("Account Description").map(str::to_string),
            owner: record.user_ref_field("Account Owner"),
            projects: record.id_list_field("Projects"),
        })
    }
}

impl Project {
    pub fn from_record(record: &Record) -> Result<Project, ApiError> {
        Ok(Project {
            id: record.id,
            name: record.str_field("Project Name").map(str::to_string),
            status: record.enum_field("Project Status", ProjectStatus::parse)?,
            start_date: record.date_field("Start Date"),
            end_date: record.date_field("End Date"),
            value: record.number_field("Project Value"),
            description: record.str_field("Project Description").map(str::to_string),
            account: record.first_id("Account"),
            account_name: record.lookup_field("Account Name (from Account)"),
            owner: record.user_ref_field("Project Owner"),
            updates: record.id_list_field("Updates"),
        })
    }
}

impl Task {
    pub fn from_record(record: &Record) -> Result<Task, ApiError> {
        Ok(Task {
            id: record.id,
            name: record.str_field("Task Name").map(str::to_string),
            status: record.enum_field("Status", TaskStatus::parse)?,
            due_date: record.date_field("Due Date"),
            description: record.str_field("Description").map(str::to_string),
            project: record.first_id("Project"),
            project_name: record.lookup_field("Project Name"),
            assigned_to: record.user_ref_field("Assigned To"),
            assigned_to_name: record.lookup_field("Assigned To Name"),
            updates: record.id_list_field("Updates"),
        })
    }
}

impl Update {
    pub fn from_record(record: &Record) -> Result<Update, ApiError> {
        Ok(Update {
            id: record.id,
            notes: record.str_field("Notes").map(str::to_string),
            date: record.date_field("Date"),
            update_type: record.enum_field("Update Type", UpdateType::parse)?,
            project: record.first_id("Project"),
            project_name: record.lookup_field("Project Name"),
            task: record.first_id("Task"),
            task_name: record.lookup_field("Task Name"),
            owner: record.user_ref_field("Update Owner"),
            owner_name: record.lookup_field("Update Owner Name"),
        })
    }
}

/// Decode a fetched batch into tasks.
pub fn decode_tasks(records: &[Record]) -> Result<Vec<Task>, ApiError> {
    records.iter().map(Task::from_record).collect()
}

/// Decode a fetched batch into projects.
pub fn decode_projects(records: &[Record]) -> Result<Vec<Project>, ApiError> {
    records.iter().map(Project::from_record).collect()
}

/// Decode a fetched batch into accounts.
pub fn decode_accounts(records: &[Record]) -> Result<Vec<Account>, ApiError> {
    records.iter().map(Account::from_record).collect()
}

/// Decode a fetched batch into updates.
pub fn decode_updates(records: &[Record]) -> Result<Vec<Update>, ApiError> {
    records.iter().map(Update::from_record).collect()
}

//! Form submission state machines.
//!
//! Every form walks `Editing → Submitting → {Success | Failed}`. A submit
//! with a missing required field stays in `Editing` with a validation
//! message and never reaches the network. Success on a create flow
//! appends the new ID to the relevant scope set and resets the draft;
//! success on an edit flow invalidates the record's cached fetches and
//! keeps the values. Failure keeps the entered values so the user can
//! retry; resubmission is allowed from `Failed` and `Success`.

pub mod account;
pub mod project;
pub mod task;
pub mod update;

use std::time::Duration;

pub use account::AccountForm;
pub use project::{ProjectEditForm, ProjectForm};
pub use task::TaskForm;
pub use update::{QuickUpdateForm, UpdateForm};

/// Toast notifications stay up this long before auto-hiding.
pub const TOAST_DISMISS: Duration = Duration::from_secs(5);
/// Inline confirmations (edit saves, quick updates) hide sooner.
pub const INLINE_DISMISS: Duration = Duration::from_secs(3);

/// Where a form is in its submit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A message for the page to show, with its auto-hide delay. The form
/// owns the content; the caller owns the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub auto_hide: Duration,
}

impl Notification {
    pub fn success(message: &str) -> Notification {
        Notification {
            message: message.to_string(),
            kind: NotificationKind::Success,
            auto_hide: TOAST_DISMISS,
        }
    }

    pub fn error(message: &str) -> Notification {
        Notification {
            message: message.to_string(),
            kind: NotificationKind::Error,
            auto_hide: TOAST_DISMISS,
        }
    }

    pub fn inline_success(message: &str) -> Notification {
        Notification {
            message: message.to_string(),
            kind: NotificationKind::Success,
            auto_hide: INLINE_DISMISS,
        }
    }

    pub fn inline_error(message: &str) -> Notification {
        Notification {
            message: message.to_string(),
            kind: NotificationKind::Error,
            auto_hide: INLINE_DISMISS,
        }
    }
}

/// Server message verbatim when it has one, else the flow's fallback.
pub(crate) fn submit_message(err: &crate::error::ApiError, fallback: &str) -> String {
    let message = err.to_string();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

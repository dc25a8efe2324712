//! The home dashboard's "upcoming tasks" projection.

use crate::types::{Task, TaskStatus};

/// Number of tasks shown on the dashboard.
pub const UPCOMING_TASK_LIMIT: usize = 5;

/// Tasks still open, soonest due first, capped at [`UPCOMING_TASK_LIMIT`].
///
/// Tasks without a parseable due date sort before everything else. The
/// sort is stable, so equal due dates keep their input order.
pub fn upcoming_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut open: Vec<Task> = tasks
        .iter()
        .filter(|t| t.status != Some(TaskStatus::Done))
        .cloned()
        .collect();
    open.sort_by_key(|t| t.due_date);
    open.truncate(UPCOMING_TASK_LIMIT);
    open
}

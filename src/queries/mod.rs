//! Derived views: pure, synchronous projections over fetched records.
//!
//! Nothing here performs I/O or suspends; services fetch, these shape.

pub mod joins;
pub mod notes;
pub mod upcoming;

pub use joins::{account_name_index, resolve_account_name, resolve_task_name, task_name_index};
pub use notes::{truncate_notes, NOTE_PREVIEW_LIMIT};
pub use upcoming::{upcoming_tasks, UPCOMING_TASK_LIMIT};

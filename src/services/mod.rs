//! Page services: the async orchestration behind each page.
//!
//! A service reads the relevant scope sets, pulls records through the
//! fetch cache (dependent fetches gated on the prerequisite data), and
//! shapes the result with the pure `queries` functions. Services are the
//! only async entry points of the crate; dropping a returned future
//! abandons the page load silently.

pub mod accounts;
pub mod dashboard;
pub mod projects;
pub mod tasks;
pub mod updates;

pub use accounts::{account_detail, my_accounts, AccountDetail};
pub use dashboard::{home_dashboard, HomeDashboard};
pub use projects::{project_detail, projects_overview, ProjectDetail, ProjectRow, UpdateWithTask};
pub use tasks::{my_tasks, task_detail, TaskDetail};
pub use updates::{my_updates, update_detail, UpdateDetail, UpdateRow};

//! Client-side joins between fetched record sets.

use std::collections::HashMap;

use crate::types::{Account, RecordId, Task, Update};

/// Map task ID → display name. Unnamed tasks fall back to their ID so the
/// join still resolves to something linkable.
pub fn task_name_index(tasks: &[Task]) -> HashMap<RecordId, String> {
    tasks
        .iter()
        .map(|t| {
            let name = t.name.clone().unwrap_or_else(|| t.id.to_string());
            (t.id, name)
        })
        .collect()
}

/// Resolve an update's task reference through the index. An absent
/// reference or an unindexed task yields "N/A".
pub fn resolve_task_name(update: &Update, index: &HashMap<RecordId, String>) -> String {
    update
        .task
        .and_then(|id| index.get(&id).cloned())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Map account ID → display name.
pub fn account_name_index(accounts: &[Account]) -> HashMap<RecordId, String> {
    accounts
        .iter()
        .map(|a| (a.id, a.display_name().to_string()))
        .collect()
}

/// Resolve an account reference, preferring the fetched account over the
/// record's server-side lookup, then "N/A".
pub fn resolve_account_name(
    account: Option<RecordId>,
    lookup: Option<&str>,
    index: &HashMap<RecordId, String>,
) -> String {
    account
        .and_then(|id| index.get(&id).cloned())
        .or_else(|| lookup.map(str::to_string))
        .unwrap_or_else(|| "N/A".to_string())
}

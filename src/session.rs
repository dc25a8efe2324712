//! Durable session state: the current-user stub and the per-kind scope
//! sets ("my" record IDs).
//!
//! All raw storage access goes through the [`Storage`] trait so pages and
//! forms never touch the backing file directly. The production backend is
//! a single JSON object persisted atomically; tests use the in-memory
//! backend. Scope sets only grow — there is no remove path — and a set's
//! membership never implies the record is still fetchable.
//!
//! Known limitations, kept on purpose: last writer wins (two processes can
//! race and silently drop an addition), and sets are not namespaced per
//! user — `logout` clears the whole store, but switching users without
//! logging out inherits the previous user's sets.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::types::RecordId;

const KEY_USER_NAME: &str = "userName";
const KEY_USER_RECORD_ID: &str = "userRecordId";
const KEY_IS_ADMIN: &str = "isAdmin";

/// Origin-scoped, synchronous, string-keyed durable storage.
///
/// Writes are best-effort: backends log and swallow persistence failures
/// rather than surfacing them, so callers never fail on a write.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// File-backed storage: one JSON object, atomically replaced on write.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or create) the store at `path`. A missing or malformed file
    /// starts empty — corruption must never take the client down.
    pub fn open(path: &Path) -> FileStorage {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Session store {} is corrupt ({}); starting empty", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        FileStorage {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let content = match serde_json::to_string_pretty(entries) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to serialize session store: {}", e);
                return;
            }
        };
        if let Err(e) = crate::util::atomic_write_str(&self.path, &content) {
            log::warn!("Failed to write session store {}: {}", self.path.display(), e);
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
            self.persist(&entries);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
            self.persist(&entries);
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
            self.persist(&entries);
        }
    }
}

/// In-memory storage backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

/// The per-session scope sets, one per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeSet {
    /// Accounts the user created.
    Accounts,
    /// Projects the user created.
    Projects,
    /// Every task the user created or has seen.
    Tasks,
    /// Tasks assigned to the current user.
    AssignedTasks,
    /// Updates the user logged.
    Updates,
}

impl ScopeSet {
    /// Storage key holding this set's JSON array.
    pub fn key(&self) -> &'static str {
        match self {
            ScopeSet::Accounts => "accountIds",
            ScopeSet::Projects => "projectIds",
            ScopeSet::Tasks => "taskIds",
            ScopeSet::AssignedTasks => "assignedTaskIds",
            ScopeSet::Updates => "updateIds",
        }
    }
}

/// Session facade over a [`Storage`] backend.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> SessionStore {
        SessionStore { storage }
    }

    /// IDs in a scope set, deduplicated, in stored order. Malformed JSON
    /// reads as the empty set.
    pub fn ids(&self, set: ScopeSet) -> Vec<RecordId> {
        let raw = match self.storage.get(set.key()) {
            Some(raw) => raw,
            None => return Vec::new(),
        };
        let parsed: Vec<RecordId> = match serde_json::from_str(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                log::warn!("Scope set {} holds invalid JSON ({}); treating as empty", set.key(), e);
                return Vec::new();
            }
        };
        let mut seen = Vec::with_capacity(parsed.len());
        for id in parsed {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }

    /// Union-insert `id` into a scope set and write the set back.
    /// Adding an ID that is already present is a no-op.
    pub fn add_id(&self, set: ScopeSet, id: RecordId) {
        let mut ids = self.ids(set);
        if ids.contains(&id) {
            return;
        }
        ids.push(id);
        match serde_json::to_string(&ids) {
            Ok(raw) => self.storage.set(set.key(), &raw),
            Err(e) => log::warn!("Failed to serialize scope set {}: {}", set.key(), e),
        }
    }

    pub fn user_name(&self) -> Option<String> {
        self.storage.get(KEY_USER_NAME).filter(|s| !s.is_empty())
    }

    pub fn user_record_id(&self) -> Option<String> {
        self.storage.get(KEY_USER_RECORD_ID).filter(|s| !s.is_empty())
    }

    pub fn is_admin(&self) -> bool {
        self.storage.get(KEY_IS_ADMIN).as_deref() == Some("true")
    }

    /// Stubbed login: seed the user keys. Scope sets start empty on a
    /// fresh store and are otherwise inherited as-is.
    pub fn login(&self, user_name: &str, user_record_id: &str, is_admin: bool) {
        self.storage.set(KEY_USER_NAME, user_name);
        self.storage.set(KEY_USER_RECORD_ID, user_record_id);
        self.storage.set(KEY_IS_ADMIN, if is_admin { "true" } else { "false" });
        log::info!("Session started for {}", user_name);
    }

    /// Stubbed logout: clears the entire store, scope sets included.
    pub fn logout(&self) {
        self.storage.clear();
        log::info!("Session cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_session() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_id_is_idempotent_union() {
        let session = memory_session();
        session.add_id(ScopeSet::Accounts, 41);
        session.add_id(ScopeSet::Accounts, 41);
        session.add_id(ScopeSet::Accounts, 41);
        session.add_id(ScopeSet::Accounts, 7);

        assert_eq!(session.ids(ScopeSet::Accounts), vec![41, 7]);
    }

    #[test]
    fn test_scope_sets_are_independent() {
        let session = memory_session();
        session.add_id(ScopeSet::Tasks, 1);
        session.add_id(ScopeSet::AssignedTasks, 2);

        assert_eq!(session.ids(ScopeSet::Tasks), vec![1]);
        assert_eq!(session.ids(ScopeSet::AssignedTasks), vec![2]);
        assert!(session.ids(ScopeSet::Updates).is_empty());
    }

    #[test]
    fn test_malformed_scope_json_reads_as_empty() {
        crate::testutil::init_test_logging();
        let storage = Arc::new(MemoryStorage::new());
        storage.set("projectIds", "not-json");
        let session = SessionStore::new(storage);

        assert!(session.ids(ScopeSet::Projects).is_empty());
        // And the set is usable again after the next add.
        session.add_id(ScopeSet::Projects, 3);
        assert_eq!(session.ids(ScopeSet::Projects), vec![3]);
    }

    #[test]
    fn test_stored_duplicates_are_deduplicated_on_read() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("taskIds", "[5, 5, 6, 5]");
        let session = SessionStore::new(storage);

        assert_eq!(session.ids(ScopeSet::Tasks), vec![5, 6]);
    }

    #[test]
    fn test_login_seeds_user_stub_and_logout_clears_everything() {
        let session = memory_session();
        session.login("Priya", "usr-9", true);
        session.add_id(ScopeSet::Accounts, 41);

        assert_eq!(session.user_name().as_deref(), Some("Priya"));
        assert_eq!(session.user_record_id().as_deref(), Some("usr-9"));
        assert!(session.is_admin());

        session.logout();
        assert_eq!(session.user_name(), None);
        assert!(!session.is_admin());
        assert!(session.ids(ScopeSet::Accounts).is_empty());
    }

    #[test]
    fn test_file_storage_round_trips_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let session = SessionStore::new(Arc::new(FileStorage::open(&path)));
            session.login("Priya", "usr-9", false);
            session.add_id(ScopeSet::Projects, 12);
        }

        let session = SessionStore::new(Arc::new(FileStorage::open(&path)));
        assert_eq!(session.user_name().as_deref(), Some("Priya"));
        assert_eq!(session.ids(ScopeSet::Projects), vec![12]);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{{{{").unwrap();

        let session = SessionStore::new(Arc::new(FileStorage::open(&path)));
        assert_eq!(session.user_name(), None);
        assert!(session.ids(ScopeSet::Accounts).is_empty());
    }
}

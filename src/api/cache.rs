//! Fetch cache with request coalescing.
//!
//! Queries are keyed by (kind, sorted deduplicated ID list), so two pages
//! asking for the same records — concurrently or one after the other —
//! share a single network call. Failures are never cached: an errored
//! query leaves no entry behind, and the next identical call refetches.
//! Edits invalidate every cached query containing the edited ID.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use super::RecordApi;
use crate::error::ApiError;
use crate::record::Record;
use crate::types::{EntityKind, RecordId};

/// Identity of a cached query: kind plus the normalized ID list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    kind: EntityKind,
    ids: Vec<RecordId>,
}

impl QueryKey {
    fn new(kind: EntityKind, ids: &[RecordId]) -> QueryKey {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        QueryKey { kind, ids }
    }
}

type Entry = Arc<OnceCell<Vec<Record>>>;

#[derive(Default)]
pub struct FetchCache {
    entries: Mutex<HashMap<QueryKey, Entry>>,
}

impl FetchCache {
    pub fn new() -> FetchCache {
        FetchCache::default()
    }

    fn entry(&self, key: &QueryKey) -> Entry {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.entry(key.clone()).or_default().clone()
    }

    /// Fetch a batch by ID list through the cache. An empty list resolves
    /// immediately without a network call or a cache entry.
    pub async fn fetch_many(
        &self,
        api: &dyn RecordApi,
        kind: EntityKind,
        ids: &[RecordId],
    ) -> Result<Vec<Record>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let key = QueryKey::new(kind, ids);
        let cell = self.entry(&key);
        let records = cell
            .get_or_try_init(|| async {
                log::debug!("fetching {} {:?}", key.kind.table(), key.ids);
                api.fetch_many(key.kind, &key.ids).await
            })
            .await?;
        Ok(records.clone())
    }

    /// Fetch a single record through the cache. Callers gate this on the
    /// ID being known; there is no "absent ID" variant.
    pub async fn fetch_one(
        &self,
        api: &dyn RecordApi,
        kind: EntityKind,
        id: RecordId,
    ) -> Result<Record, ApiError> {
        let key = QueryKey::new(kind, &[id]);
        let cell = self.entry(&key);
        let records = cell
            .get_or_try_init(|| async {
                log::debug!("fetching {} {}", key.kind.table(), id);
                api.fetch_one(key.kind, id).await.map(|record| vec![record])
            })
            .await?;
        records
            .first()
            .cloned()
            .ok_or_else(|| ApiError::Decode(format!("{} {} returned no record", kind.table(), id)))
    }

    /// Drop every cached query of `kind` that contains `id`. Called after
    /// a successful edit so the next read reflects the server's value.
    pub fn invalidate_record(&self, kind: EntityKind, id: RecordId) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|key, _| key.kind != kind || !key.ids.contains(&id));
        log::debug!(
            "invalidated {} cached {} queries for record {}",
            before - entries.len(),
            kind.table(),
            id
        );
    }

    /// Drop every cached query of `kind`. Called after a create so stale
    /// back-reference lists refetch.
    pub fn invalidate_kind(&self, kind: EntityKind) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|key, _| key.kind != kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeApi;

    fn task_record(id: RecordId, name: &str) -> Record {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "fields": { "Task Name": name }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_empty_id_list_never_reaches_the_api() {
        let api = FakeApi::new();
        let cache = FetchCache::new();

        let records = cache.fetch_many(&api, EntityKind::Tasks, &[]).await.unwrap();
        assert!(records.is_empty());
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_identical_queries_share_one_fetch() {
        crate::testutil::init_test_logging();
        let api = FakeApi::new();
        api.insert(EntityKind::Tasks, task_record(1, "Draft contract"));
        api.insert(EntityKind::Tasks, task_record(2, "Send invoice"));
        let cache = FetchCache::new();

        let first = cache.fetch_many(&api, EntityKind::Tasks, &[2, 1]).await.unwrap();
        // Same set, different order and a duplicate: still one network call.
        let second = cache.fetch_many(&api, EntityKind::Tasks, &[1, 2, 2]).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_identical_queries_coalesce() {
        let api = FakeApi::new();
        api.insert(EntityKind::Tasks, task_record(1, "Draft contract"));
        let cache = FetchCache::new();

        let (a, b) = tokio::join!(
            cache.fetch_many(&api, EntityKind::Tasks, &[1]),
            cache.fetch_many(&api, EntityKind::Tasks, &[1]),
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let api = FakeApi::new();
        api.insert(EntityKind::Tasks, task_record(1, "Draft contract"));
        let cache = FetchCache::new();

        api.fail_next(ApiError::Network("connection reset".into()));
        let err = cache.fetch_many(&api, EntityKind::Tasks, &[1]).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));

        // Explicit retry refetches and succeeds.
        let records = cache.fetch_many(&api, EntityKind::Tasks, &[1]).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(api.call_count(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_record_forces_refetch() {
        let api = FakeApi::new();
        api.insert(EntityKind::Tasks, task_record(1, "Draft contract"));
        let cache = FetchCache::new();

        cache.fetch_one(&api, EntityKind::Tasks, 1).await.unwrap();
        cache.fetch_one(&api, EntityKind::Tasks, 1).await.unwrap();
        assert_eq!(api.call_count(), 1);

        cache.invalidate_record(EntityKind::Tasks, 1);
        let record = cache.fetch_one(&api, EntityKind::Tasks, 1).await.unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(api.call_count(), 2);
    }

    #[tokio::test]
    async fn test_invalidation_is_scoped_to_queries_containing_the_id() {
        let api = FakeApi::new();
        api.insert(EntityKind::Tasks, task_record(1, "Draft contract"));
        api.insert(EntityKind::Tasks, task_record(2, "Send invoice"));
        let cache = FetchCache::new();

        cache.fetch_many(&api, EntityKind::Tasks, &[1]).await.unwrap();
        cache.fetch_many(&api, EntityKind::Tasks, &[2]).await.unwrap();
        assert_eq!(api.call_count(), 2);

        cache.invalidate_record(EntityKind::Tasks, 1);
        cache.fetch_many(&api, EntityKind::Tasks, &[2]).await.unwrap();
        assert_eq!(api.call_count(), 2, "query without the edited id stays cached");
    }
}

//! In-memory `RecordApi` fake for network-free tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::api::RecordApi;
use crate::error::ApiError;
use crate::record::Record;
use crate::types::{EntityKind, RecordId};

/// Route `log` output through the test harness when a test opts in.
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a record envelope from literal JSON fields.
pub(crate) fn record(id: RecordId, fields: Value) -> Record {
    serde_json::from_value(serde_json::json!({ "id": id, "fields": fields }))
        .expect("valid record json")
}

/// Fake API backed by an in-memory table map. Counts every call so tests
/// can assert on de-duplication and the no-network guarantees.
pub(crate) struct FakeApi {
    tables: Mutex<HashMap<EntityKind, HashMap<RecordId, Record>>>,
    calls: AtomicUsize,
    fail_next: Mutex<Option<ApiError>>,
    next_id: AtomicI64,
}

impl FakeApi {
    pub fn new() -> FakeApi {
        FakeApi {
            tables: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            fail_next: Mutex::new(None),
            next_id: AtomicI64::new(100),
        }
    }

    pub fn insert(&self, kind: EntityKind, record: Record) {
        self.tables
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .insert(record.id, record);
    }

    /// Number of API calls made so far, across all operations.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next call fail with `err`, then recover.
    pub fn fail_next(&self, err: ApiError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    fn begin_call(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordApi for FakeApi {
    async fn fetch_one(&self, kind: EntityKind, id: RecordId) -> Result<Record, ApiError> {
        self.begin_call()?;
        self.tables
            .lock()
            .unwrap()
            .get(&kind)
            .and_then(|t| t.get(&id))
            .cloned()
            .ok_or(ApiError::Api {
                status: 404,
                message: format!("Record {} not found", id),
            })
    }

    async fn fetch_many(&self, kind: EntityKind, ids: &[RecordId]) -> Result<Vec<Record>, ApiError> {
        self.begin_call()?;
        let tables = self.tables.lock().unwrap();
        let table = tables.get(&kind);
        // Missing IDs are simply absent from the batch, as on the wire.
        Ok(ids
            .iter()
            .filter_map(|id| table.and_then(|t| t.get(id)).cloned())
            .collect())
    }

    async fn create(&self, kind: EntityKind, fields: Map<String, Value>) -> Result<Record, ApiError> {
        self.begin_call()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = Record { id, fields };
        self.insert(kind, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<Record, ApiError> {
        self.begin_call()?;
        let mut tables = self.tables.lock().unwrap();
        let record = tables
            .get_mut(&kind)
            .and_then(|t| t.get_mut(&id))
            .ok_or(ApiError::Api {
                status: 404,
                message: format!("Record {} not found", id),
            })?;
        for (name, value) in fields {
            record.fields.insert(name, value);
        }
        Ok(record.clone())
    }
}

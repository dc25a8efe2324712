//! Remote record API access.
//!
//! The API is a conventional record-oriented HTTP service: get one, get
//! many by ID list, create, and partial update, all exchanging
//! `{id, fields}` JSON. [`RecordApi`] is the seam — services and forms
//! depend on the trait, the reqwest client implements it, and tests swap
//! in an in-memory fake. Reads go through [`cache::FetchCache`] so
//! identical queries share one network call.

pub mod cache;
pub mod client;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::record::Record;
use crate::types::{EntityKind, RecordId};

/// Record-oriented API surface consumed by the rest of the crate.
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// Fetch a single record by ID.
    async fn fetch_one(&self, kind: EntityKind, id: RecordId) -> Result<Record, ApiError>;

    /// Fetch a batch of records by ID list. An empty list must resolve to
    /// an empty batch without touching the network.
    async fn fetch_many(&self, kind: EntityKind, ids: &[RecordId]) -> Result<Vec<Record>, ApiError>;

    /// Create a record; the server mints the ID and returns the envelope.
    async fn create(&self, kind: EntityKind, fields: Map<String, Value>) -> Result<Record, ApiError>;

    /// Partial update of an existing record.
    async fn update(
        &self,
        kind: EntityKind,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<Record, ApiError>;
}

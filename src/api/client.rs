//! HTTP implementation of [`RecordApi`].
//!
//! Uses reqwest with Bearer token auth against per-table endpoints:
//! `GET /{table}/{id}`, `GET /{table}?ids=…`, `POST /{table}`,
//! `PATCH /{table}/{id}`. Error bodies are expected to carry a `message`
//! string; when they don't, the raw body text is used.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::RecordApi;
use crate::config::Config;
use crate::error::ApiError;
use crate::record::Record;
use crate::types::{EntityKind, RecordId};

pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

/// Batch responses arrive wrapped: `{"records": [...]}`.
#[derive(Debug, Deserialize)]
struct RecordList {
    records: Vec<Record>,
}

impl HttpApi {
    pub fn new(config: &Config) -> HttpApi {
        HttpApi {
            client: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        }
    }

    fn table_url(&self, kind: EntityKind) -> String {
        format!("{}/{}", self.base_url, kind.table())
    }

    fn record_url(&self, kind: EntityKind, id: RecordId) -> String {
        format!("{}/{}/{}", self.base_url, kind.table(), id)
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = req
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("API error {}: {}", status, body));
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecordApi for HttpApi {
    async fn fetch_one(&self, kind: EntityKind, id: RecordId) -> Result<Record, ApiError> {
        self.send(self.client.get(self.record_url(kind, id))).await
    }

    async fn fetch_many(&self, kind: EntityKind, ids: &[RecordId]) -> Result<Vec<Record>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let csv = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let list: RecordList = self
            .send(self.client.get(self.table_url(kind)).query(&[("ids", csv)]))
            .await?;
        Ok(list.records)
    }

    async fn create(&self, kind: EntityKind, fields: Map<String, Value>) -> Result<Record, ApiError> {
        let body = serde_json::json!({ "fields": fields });
        self.send(self.client.post(self.table_url(kind)).json(&body))
            .await
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<Record, ApiError> {
        let body = serde_json::json!({ "fields": fields });
        self.send(self.client.patch(self.record_url(kind, id)).json(&body))
            .await
    }
}

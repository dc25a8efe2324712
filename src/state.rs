//! Shared client state handed to page services and forms.

use std::sync::Arc;

use crate::api::cache::FetchCache;
use crate::api::client::HttpApi;
use crate::api::RecordApi;
use crate::config::Config;
use crate::session::{FileStorage, SessionStore, Storage};

/// The client's shared state: the API handle, the fetch cache, and the
/// durable session store. One instance lives for the whole app; pages
/// borrow it.
pub struct Crm {
    pub api: Arc<dyn RecordApi>,
    pub cache: FetchCache,
    pub session: SessionStore,
}

impl Crm {
    pub fn new(api: Arc<dyn RecordApi>, session: SessionStore) -> Crm {
        Crm {
            api,
            cache: FetchCache::new(),
            session,
        }
    }

    /// Wire up the production stack from config: HTTP API + file-backed
    /// session storage under the configured data directory.
    pub fn open(config: &Config) -> Crm {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.session_path()));
        Crm::new(Arc::new(HttpApi::new(config)), SessionStore::new(storage))
    }
}

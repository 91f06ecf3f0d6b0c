//! In-memory storage implementation, used by tests and demos.

use super::{AssetStore, BoxFuture, PageRecord, StoreError, StoreResult};
use fukidashi_core::PageDocument;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory store: a fixed page listing plus a document map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<PageRecord>,
    documents: Mutex<HashMap<String, PageDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store with a fixed page listing.
    pub fn with_records(records: Vec<PageRecord>) -> Self {
        Self {
            records,
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// Seed a document for an asset id.
    pub fn insert_document(&self, asset_id: &str, document: PageDocument) {
        self.documents
            .lock()
            .expect("document map poisoned")
            .insert(asset_id.to_string(), document);
    }
}

impl AssetStore for MemoryStore {
    fn list_pages(&self) -> BoxFuture<'_, StoreResult<Vec<PageRecord>>> {
        let records = self.records.clone();
        Box::pin(async move { Ok(records) })
    }

    fn fetch_document(&self, asset_id: &str) -> BoxFuture<'_, StoreResult<PageDocument>> {
        let found = self
            .documents
            .lock()
            .expect("document map poisoned")
            .get(asset_id)
            .cloned();
        let id = asset_id.to_string();
        Box::pin(async move { found.ok_or(StoreError::NotFound(id)) })
    }

    fn save_document(
        &self,
        asset_id: &str,
        document: &PageDocument,
    ) -> BoxFuture<'_, StoreResult<()>> {
        self.documents
            .lock()
            .expect("document map poisoned")
            .insert(asset_id.to_string(), document.clone());
        Box::pin(async move { Ok(()) })
    }
}

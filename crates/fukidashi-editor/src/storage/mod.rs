//! Storage abstraction for the page listing and annotation documents.
//!
//! Identity, persistence and upload pipelines live outside the editor; the
//! editor only needs to list a chapter's pages, fetch a page's document and
//! save it back. Implementations can sit on a remote API, the filesystem or
//! plain memory.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use fukidashi_core::PageDocument;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// One row of the chapter page listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub page_index: usize,
    pub asset_id: String,
    pub image_url: String,
    pub json_url: Option<String>,
}

/// Wire envelope for document saves: the endpoint accepts
/// `{ "json": <PageDocument> }` and persists the document verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePayload {
    pub json: PageDocument,
}

/// Trait for page/document storage backends.
///
/// Saves are fire-and-forget relative to the synchronous editing state: the
/// document passed in is a snapshot taken at request time, and an edit made
/// while a save is in flight is simply not part of that save.
pub trait AssetStore: Send + Sync {
    /// List the chapter's pages in display order.
    fn list_pages(&self) -> BoxFuture<'_, StoreResult<Vec<PageRecord>>>;

    /// Fetch the annotation document for one page asset.
    fn fetch_document(&self, asset_id: &str) -> BoxFuture<'_, StoreResult<PageDocument>>;

    /// Persist the annotation document for one page asset.
    fn save_document(
        &self,
        asset_id: &str,
        document: &PageDocument,
    ) -> BoxFuture<'_, StoreResult<()>>;
}

/// Busy-poll executor for driving storage futures in tests. The store
/// futures never actually suspend, so a dummy waker is enough.
#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}

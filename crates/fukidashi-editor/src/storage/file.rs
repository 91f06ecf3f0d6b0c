//! File-based storage: a chapter directory of page images and JSON
//! annotation documents.

use super::{AssetStore, BoxFuture, PageRecord, StoreError, StoreResult};
use fukidashi_core::PageDocument;
use std::fs;
use std::path::PathBuf;

/// Image extensions recognized as page rasters.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// File-based store. Page assets are keyed by the image file stem; the
/// annotation document for `p001.png` lives next to it as `p001.json`.
pub struct FileStore {
    /// Chapter directory holding images and documents.
    base_path: PathBuf,
}

impl FileStore {
    /// Open a store over the given chapter directory, creating it if needed.
    pub fn new(base_path: PathBuf) -> StoreResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StoreError::Io(format!("failed to create {}: {e}", base_path.display())))?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Document path for an asset id, sanitized for the filesystem.
    fn document_path(&self, asset_id: &str) -> PathBuf {
        let safe: String = asset_id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{safe}.json"))
    }
}

impl AssetStore for FileStore {
    fn list_pages(&self) -> BoxFuture<'_, StoreResult<Vec<PageRecord>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            let entries = fs::read_dir(&base)
                .map_err(|e| StoreError::Io(format!("failed to read {}: {e}", base.display())))?;

            let mut images: Vec<PathBuf> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| {
                    path.extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                })
                .collect();
            images.sort();

            let records = images
                .into_iter()
                .enumerate()
                .filter_map(|(page_index, path)| {
                    let stem = path.file_stem()?.to_str()?.to_string();
                    let json = path.with_extension("json");
                    Some(PageRecord {
                        page_index,
                        asset_id: stem,
                        image_url: path.to_string_lossy().into_owned(),
                        json_url: json
                            .exists()
                            .then(|| json.to_string_lossy().into_owned()),
                    })
                })
                .collect();
            Ok(records)
        })
    }

    fn fetch_document(&self, asset_id: &str) -> BoxFuture<'_, StoreResult<PageDocument>> {
        let path = self.document_path(asset_id);
        let id = asset_id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StoreError::NotFound(id));
            }
            let json = fs::read_to_string(&path)
                .map_err(|e| StoreError::Io(format!("failed to read {}: {e}", path.display())))?;
            PageDocument::from_json(&json)
                .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display())))
        })
    }

    fn save_document(
        &self,
        asset_id: &str,
        document: &PageDocument,
    ) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.document_path(asset_id);
        let json = match document.to_json() {
            Ok(json) => json,
            Err(e) => {
                return Box::pin(async move { Err(StoreError::Serialization(e.to_string())) });
            }
        };
        Box::pin(async move {
            fs::write(&path, json)
                .map_err(|e| StoreError::Io(format!("failed to write {}: {e}", path.display())))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_save_fetch() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        let doc = PageDocument::new(640, 960);
        block_on(store.save_document("p001", &doc)).unwrap();
        let loaded = block_on(store.fetch_document("p001")).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_file_store_not_found() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        let result = block_on(store.fetch_document("nonexistent"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_file_store_rejects_malformed_document() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        fs::write(dir.path().join("bad.json"), "{\"items\": []}").unwrap();
        let result = block_on(store.fetch_document("bad"));
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_file_store_listing() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        fs::write(dir.path().join("p002.png"), b"").unwrap();
        fs::write(dir.path().join("p001.png"), b"").unwrap();
        fs::write(dir.path().join("p001.json"), b"{}").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let records = block_on(store.list_pages()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].asset_id, "p001");
        assert_eq!(records[0].page_index, 0);
        assert!(records[0].json_url.is_some());
        assert_eq!(records[1].asset_id, "p002");
        assert!(records[1].json_url.is_none());
    }

    #[test]
    fn test_file_store_sanitizes_asset_ids() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        let doc = PageDocument::new(10, 10);
        block_on(store.save_document("ch01/p:1", &doc)).unwrap();
        let loaded = block_on(store.fetch_document("ch01/p:1")).unwrap();
        assert_eq!(loaded, doc);
    }
}

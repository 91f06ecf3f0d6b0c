//! Page collection and per-page editor state.

use crate::storage::PageRecord;
use fukidashi_core::document::BubbleItem;
use fukidashi_core::{order, History, PageDocument};

/// One page of the chapter being edited: an image reference paired with an
/// optional annotation document and the page's mutable editor state.
#[derive(Debug, Clone)]
pub struct Page {
    /// Opaque reference to the page raster.
    pub image_url: String,
    /// Key associating separately uploaded images and documents.
    pub base_name: String,
    /// Asset id used for document fetch/save.
    pub asset_id: Option<String>,
    /// Filename of the original annotation document, used for downloads.
    pub json_name: Option<String>,
    pub document: Option<PageDocument>,
    /// Index of the selected bubble, if any.
    pub selected: Option<usize>,
    /// Set when the operator reordered bubbles by hand; cleared by
    /// auto-order. Surfaced to the user as a notice.
    pub manual_order_changed: bool,
    /// Whether the initial overlap-aware ordering pass has run.
    pub overlap_ordered: bool,
    pub history: History,
}

impl Page {
    pub fn new(base_name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            base_name: base_name.into(),
            asset_id: None,
            json_name: None,
            document: None,
            selected: None,
            manual_order_changed: false,
            overlap_ordered: false,
            history: History::new(),
        }
    }

    pub fn from_record(record: &PageRecord) -> Self {
        let mut page = Self::new(file_stem(&record.image_url), record.image_url.clone());
        page.asset_id = Some(record.asset_id.clone());
        page.json_name = record.json_url.as_deref().map(file_name);
        page
    }

    /// Replace the document wholesale. Resets history, selection and the
    /// ordering flags, then normalizes the reading order.
    pub fn attach_document(&mut self, mut doc: PageDocument) {
        order::normalize_on_load(&mut doc);
        log::info!(
            "attached document for page '{}' ({} items)",
            self.base_name,
            doc.items.len()
        );
        self.document = Some(doc);
        self.selected = None;
        self.manual_order_changed = false;
        self.overlap_ordered = true;
        self.history.clear();
    }

    /// Record the pre-mutation state under `label`.
    pub fn snapshot(&mut self, label: &str) {
        if let Some(doc) = self.document.as_ref() {
            self.history.push(doc, label);
        }
    }

    pub fn undo(&mut self) -> bool {
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        let done = self.history.undo(doc);
        if done {
            self.fix_selection();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        let done = self.history.redo(doc);
        if done {
            self.fix_selection();
        }
        done
    }

    pub fn item_count(&self) -> usize {
        self.document.as_ref().map(|d| d.items.len()).unwrap_or(0)
    }

    pub fn selected_item(&self) -> Option<&BubbleItem> {
        let doc = self.document.as_ref()?;
        doc.items.get(self.selected?)
    }

    /// Select `index`; selecting the already-selected index clears the
    /// selection.
    pub fn toggle_select(&mut self, index: usize) {
        if index >= self.item_count() {
            return;
        }
        self.selected = if self.selected == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Move the selection to the next or previous bubble in reading order,
    /// wrapping around.
    pub fn cycle_selection(&mut self, forward: bool) {
        let Some(doc) = self.document.as_ref() else {
            return;
        };
        if doc.items.is_empty() {
            return;
        }
        let seq = order::ordered_indices(doc);
        let pos = self
            .selected
            .and_then(|sel| seq.iter().position(|&i| i == sel));
        let next = match (pos, forward) {
            (Some(p), true) => (p + 1) % seq.len(),
            (Some(p), false) => (p + seq.len() - 1) % seq.len(),
            (None, true) => 0,
            (None, false) => seq.len() - 1,
        };
        self.selected = Some(seq[next]);
    }

    /// Remove the bubble at `index`, renumbering the remaining orders into a
    /// contiguous sequence.
    pub fn remove_bubble(&mut self, index: usize) -> bool {
        if index >= self.item_count() {
            return false;
        }
        self.snapshot("Remove bubble");
        if let Some(doc) = self.document.as_mut() {
            doc.items.remove(index);
            order::renumber(doc);
            log::debug!("removed bubble {index} from '{}'", self.base_name);
        }
        match self.selected {
            Some(sel) if sel == index => self.selected = None,
            Some(sel) if sel > index => self.selected = Some(sel - 1),
            _ => {}
        }
        true
    }

    /// Move the item at `item` index to `target` position in the ordered
    /// sequence. Marks the page as manually ordered.
    pub fn reorder_item(&mut self, item: usize, target: usize, label: &str) {
        if item >= self.item_count() {
            return;
        }
        self.snapshot(label);
        if let Some(doc) = self.document.as_mut() {
            order::move_to_rank(doc, item, target);
        }
        self.manual_order_changed = true;
    }

    /// Move the item at `from` position in the ordered sequence to `to`.
    /// Used by the list drag-reorder drop.
    pub fn reorder_by_position(&mut self, from: usize, to: usize, label: &str) {
        let Some(doc) = self.document.as_ref() else {
            return;
        };
        let seq = order::ordered_indices(doc);
        let Some(&item) = seq.get(from) else {
            return;
        };
        self.reorder_item(item, to, label);
    }

    fn fix_selection(&mut self) {
        if self.selected.is_some_and(|sel| sel >= self.item_count()) {
            self.selected = None;
        }
    }
}

/// In-memory collection of pages with one active page.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: Vec<Page>,
    active: usize,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the page list from a chapter listing, ordered by page index.
    pub fn from_listing(records: &[PageRecord]) -> Self {
        let mut records: Vec<&PageRecord> = records.iter().collect();
        records.sort_by_key(|r| r.page_index);
        Self {
            pages: records.into_iter().map(Page::from_record).collect(),
            active: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn set_active(&mut self, index: usize) {
        if !self.pages.is_empty() {
            self.active = index.min(self.pages.len() - 1);
        }
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.pages.get(self.active)
    }

    pub fn active_page_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.active)
    }

    pub fn next_page(&mut self) {
        self.set_active(self.active.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_active(self.active.saturating_sub(1));
    }

    /// Find or create the page keyed by `base_name` and set its image.
    /// Returns the page index.
    pub fn add_image(&mut self, base_name: &str, image_url: &str) -> usize {
        match self.index_by_base_name(base_name) {
            Some(index) => {
                self.pages[index].image_url = image_url.to_string();
                index
            }
            None => {
                self.pages.push(Page::new(base_name, image_url));
                self.pages.len() - 1
            }
        }
    }

    /// Attach a document to the page keyed by `base_name`, creating the page
    /// when its image has not arrived yet. Returns the page index.
    pub fn add_document(&mut self, base_name: &str, doc: PageDocument) -> usize {
        let index = match self.index_by_base_name(base_name) {
            Some(index) => index,
            None => {
                self.pages.push(Page::new(base_name, ""));
                self.pages.len() - 1
            }
        };
        self.pages[index].attach_document(doc);
        index
    }

    fn index_by_base_name(&self, base_name: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.base_name == base_name)
    }
}

/// Last path segment of a URL or path.
fn file_name(url: &str) -> String {
    url.rsplit(['/', '\\']).next().unwrap_or(url).to_string()
}

/// Last path segment without its extension.
fn file_stem(url: &str) -> String {
    let name = file_name(url);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

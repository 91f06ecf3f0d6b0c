//! Editor shell: composes the page store, viewport and interaction
//! controller, and wires the toolbar actions (save, download, undo, redo,
//! zoom, auto-order).
//!
//! The shell is synchronous; asynchronous work (listing, fetch, save) is
//! driven by the embedding application through [`crate::storage::AssetStore`]
//! and fed back in via `load_listing` / `attach_document` /
//! `apply_save_result`.

use crate::input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::interaction::InteractionController;
use crate::page::PageStore;
use crate::shortcuts::{EditorAction, ShortcutRegistry};
use crate::storage::{PageRecord, SavePayload, StoreError};
use crate::viewport::{ViewportState, KEY_PAN_STEP, VIEW_MARGIN};
use fukidashi_core::document::{BubbleItem, BubbleKind};
use fukidashi_core::{order, PageDocument};
use kurbo::Vec2;
use thiserror::Error;

/// Errors from shell-level operations.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no page is active")]
    NoActivePage,
    #[error("the active page has no annotation document")]
    NoDocument,
    #[error("no bubble is selected")]
    NoSelection,
    #[error("the active page has no asset id")]
    NoAssetId,
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Non-blocking message surfaced in the editor chrome.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// A pending save produced by the shell. The payload is serialized at
/// request time, so edits made while the save is in flight are not part of
/// it (last-write-wins).
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub asset_id: String,
    pub payload: String,
}

/// A client-side download of the current document.
#[derive(Debug, Clone)]
pub struct DownloadFile {
    pub name: String,
    pub contents: String,
}

/// The bubble editor: page list, canvas interactions, detail form operations
/// and toolbar actions, composed over one mutable state object. Constructed
/// on editor mount and discarded on unmount; there is no ambient global
/// state.
#[derive(Debug, Default)]
pub struct EditorShell {
    pub pages: PageStore,
    pub viewport: ViewportState,
    pub controller: InteractionController,
    status: Option<StatusMessage>,
    auto_pan: bool,
}

impl EditorShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the page list from a chapter listing.
    pub fn load_listing(&mut self, records: &[PageRecord]) {
        self.pages = PageStore::from_listing(records);
        self.sync_viewport_content();
    }

    /// Attach a fetched document to a page. Replaces the page's document
    /// wholesale (resetting its history and ordering flags).
    pub fn attach_document(&mut self, page_index: usize, doc: PageDocument) {
        if let Some(page) = self.pages.page_mut(page_index) {
            page.attach_document(doc);
        }
        if page_index == self.pages.active_index() {
            self.sync_viewport_content();
        }
    }

    /// Record a failed document load. The page keeps no partial state.
    pub fn document_load_failed(&mut self, page_index: usize, error: &StoreError) {
        log::warn!("loading document for page {page_index} failed: {error}");
        self.set_error(format!("Failed to load annotations: {error}"));
    }

    // ---- pointer and keyboard entry points ----

    /// Route a pointer event into the interaction state machine.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        let Self {
            pages,
            viewport,
            controller,
            ..
        } = self;
        let Some(page) = pages.active_page_mut() else {
            return;
        };
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => controller.pointer_down(page, viewport, position),
            PointerEvent::Move { position } => controller.pointer_move(page, viewport, position),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => {
                controller.pointer_up(page, position);
            }
            PointerEvent::Scroll { position, delta } => viewport.wheel_zoom(delta.y, position),
            PointerEvent::Cancel => controller.pointer_cancel(page),
            _ => {}
        }
    }

    /// Handle a key event. Returns a save request when the save shortcut
    /// fired.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Option<SaveRequest> {
        match event {
            KeyEvent::Pressed { key, modifiers } => self.handle_key(key, *modifiers),
            KeyEvent::Released { .. } => None,
        }
    }

    /// Handle a key press. Shortcuts are suppressed while a text-editing
    /// session is active, so typing never triggers editor actions.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<SaveRequest> {
        if self.controller.text_editing() {
            return None;
        }
        let action = ShortcutRegistry::resolve(key, modifiers)?;
        self.dispatch(action)
    }

    /// Execute an editor action (toolbar or shortcut).
    pub fn dispatch(&mut self, action: EditorAction) -> Option<SaveRequest> {
        match action {
            EditorAction::NextBubble => self.cycle_selection(true),
            EditorAction::PrevBubble => self.cycle_selection(false),
            EditorAction::Save => match self.save_request() {
                Ok(request) => return Some(request),
                Err(e) => self.set_error(format!("Cannot save: {e}")),
            },
            EditorAction::Undo => {
                self.undo();
            }
            EditorAction::Redo => {
                self.redo();
            }
            EditorAction::ZoomIn => self.viewport.zoom_in(),
            EditorAction::ZoomOut => self.viewport.zoom_out(),
            EditorAction::ZoomReset => self.viewport.reset(),
            EditorAction::PanLeft => self.viewport.pan_by(Vec2::new(KEY_PAN_STEP, 0.0)),
            EditorAction::PanRight => self.viewport.pan_by(Vec2::new(-KEY_PAN_STEP, 0.0)),
            EditorAction::PanUp => self.viewport.pan_by(Vec2::new(0.0, KEY_PAN_STEP)),
            EditorAction::PanDown => self.viewport.pan_by(Vec2::new(0.0, -KEY_PAN_STEP)),
            EditorAction::NextPage => self.set_active_page(self.pages.active_index() + 1),
            EditorAction::PrevPage => {
                self.set_active_page(self.pages.active_index().saturating_sub(1))
            }
            EditorAction::RemoveBubble => self.remove_selected(),
            EditorAction::ToggleDraw => self.controller.toggle_draw(),
        }
        None
    }

    /// Switch the active page. Ignored while a gesture is in flight.
    pub fn set_active_page(&mut self, index: usize) {
        if !self.controller.is_idle() {
            return;
        }
        self.pages.set_active(index);
        self.sync_viewport_content();
    }

    // ---- toolbar actions ----

    pub fn undo(&mut self) -> bool {
        self.pages.active_page_mut().is_some_and(|p| p.undo())
    }

    pub fn redo(&mut self) -> bool {
        self.pages.active_page_mut().is_some_and(|p| p.redo())
    }

    /// Recompute the reading order from geometry and clear the manual-order
    /// notice.
    pub fn auto_order(&mut self) {
        let Some(page) = self.pages.active_page_mut() else {
            return;
        };
        if page.document.is_none() {
            return;
        }
        page.snapshot("Auto order");
        if let Some(doc) = page.document.as_mut() {
            order::auto_order(doc);
        }
        page.manual_order_changed = false;
        page.overlap_ordered = true;
    }

    /// Serialize the active document for saving, wrapped as the
    /// `{ "json": … }` envelope the persistence endpoint expects.
    pub fn save_request(&self) -> Result<SaveRequest, EditorError> {
        let page = self.pages.active_page().ok_or(EditorError::NoActivePage)?;
        let doc = page.document.as_ref().ok_or(EditorError::NoDocument)?;
        let asset_id = page.asset_id.clone().ok_or(EditorError::NoAssetId)?;
        let payload = serde_json::to_string(&SavePayload { json: doc.clone() })?;
        Ok(SaveRequest { asset_id, payload })
    }

    /// Record the outcome of an asynchronous save. Failures never touch the
    /// local document or its history; the user can retry.
    pub fn apply_save_result(&mut self, result: Result<(), StoreError>) {
        match result {
            Ok(()) => self.set_info("Annotations saved"),
            Err(e) => {
                log::warn!("save failed: {e}");
                self.set_error(format!("Save failed: {e}"));
            }
        }
    }

    /// Serialize the active document for a client-side download, named after
    /// the original annotation file or derived from the image base name.
    pub fn download(&self) -> Result<DownloadFile, EditorError> {
        let page = self.pages.active_page().ok_or(EditorError::NoActivePage)?;
        let doc = page.document.as_ref().ok_or(EditorError::NoDocument)?;
        let name = page
            .json_name
            .clone()
            .unwrap_or_else(|| format!("{}.json", page.base_name));
        Ok(DownloadFile {
            name,
            contents: doc.to_json()?,
        })
    }

    // ---- selection and detail form ----

    /// List click: select the bubble, or deselect when already selected.
    pub fn select_bubble(&mut self, index: usize) {
        if let Some(page) = self.pages.active_page_mut() {
            page.toggle_select(index);
        }
    }

    pub fn selected_bubble(&self) -> Option<&BubbleItem> {
        self.pages.active_page()?.selected_item()
    }

    /// Bubble indices of the active page in reading order, for the list
    /// panel.
    pub fn bubble_list(&self) -> Vec<usize> {
        self.pages
            .active_page()
            .and_then(|p| p.document.as_ref())
            .map(order::ordered_indices)
            .unwrap_or_default()
    }

    /// Remove the selected bubble.
    pub fn remove_selected(&mut self) {
        let Some(page) = self.pages.active_page_mut() else {
            return;
        };
        if let Some(index) = page.selected {
            page.remove_bubble(index);
        }
    }

    /// Begin a text-editing session for the detail form (field focus).
    pub fn begin_text_edit(&mut self) {
        let Self {
            pages, controller, ..
        } = self;
        if let Some(page) = pages.active_page() {
            controller.begin_text_edit(page);
        }
    }

    /// End the text-editing session (field blur); commits one history entry
    /// if the text changed.
    pub fn end_text_edit(&mut self) {
        let Self {
            pages, controller, ..
        } = self;
        if let Some(page) = pages.active_page_mut() {
            controller.end_text_edit(page);
        }
    }

    /// Replace the selected bubble's translation. Intended to be called
    /// between `begin_text_edit` and `end_text_edit`.
    pub fn set_selected_text(&mut self, text: &str) -> Result<(), EditorError> {
        let page = self
            .pages
            .active_page_mut()
            .ok_or(EditorError::NoActivePage)?;
        let selected = page.selected.ok_or(EditorError::NoSelection)?;
        let doc = page.document.as_mut().ok_or(EditorError::NoDocument)?;
        let item = doc.items.get_mut(selected).ok_or(EditorError::NoSelection)?;
        item.text = Some(text.to_string());
        Ok(())
    }

    /// Change the selected bubble's type.
    pub fn set_selected_kind(&mut self, kind: BubbleKind) -> Result<(), EditorError> {
        let page = self
            .pages
            .active_page_mut()
            .ok_or(EditorError::NoActivePage)?;
        let selected = page.selected.ok_or(EditorError::NoSelection)?;
        page.snapshot("Change bubble type");
        if let Some(item) = page
            .document
            .as_mut()
            .and_then(|doc| doc.items.get_mut(selected))
        {
            item.bubble_type = Some(kind);
        }
        Ok(())
    }

    /// Type a target rank (1-based) for the selected bubble: a manual
    /// reorder to that position.
    pub fn set_selected_rank(&mut self, rank: usize) -> Result<(), EditorError> {
        let page = self
            .pages
            .active_page_mut()
            .ok_or(EditorError::NoActivePage)?;
        let selected = page.selected.ok_or(EditorError::NoSelection)?;
        page.reorder_item(selected, rank.saturating_sub(1), "Reorder bubble");
        Ok(())
    }

    // ---- status and options ----

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn take_status(&mut self) -> Option<StatusMessage> {
        self.status.take()
    }

    /// Whether the "manual order changed" notice should be shown for the
    /// active page.
    pub fn manual_order_notice(&self) -> bool {
        self.pages
            .active_page()
            .map(|p| p.manual_order_changed)
            .unwrap_or(false)
    }

    pub fn auto_pan(&self) -> bool {
        self.auto_pan
    }

    /// Toggle auto-panning the selection into view on keyboard navigation.
    pub fn set_auto_pan(&mut self, enabled: bool) {
        self.auto_pan = enabled;
    }

    fn cycle_selection(&mut self, forward: bool) {
        let auto_pan = self.auto_pan;
        let Self {
            pages, viewport, ..
        } = self;
        let Some(page) = pages.active_page_mut() else {
            return;
        };
        page.cycle_selection(forward);
        if auto_pan {
            if let Some(rect) = page
                .selected_item()
                .and_then(|item| item.geometry())
                .map(|b| b.rect())
            {
                viewport.pan_into_view(rect, VIEW_MARGIN);
            }
        }
    }

    fn sync_viewport_content(&mut self) {
        if let Some(size) = self
            .pages
            .active_page()
            .and_then(|p| p.document.as_ref())
            .map(|d| d.image_size)
        {
            self.viewport
                .set_content_size(size.width as f64, size.height as f64);
        }
    }

    fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Error,
            text: text.into(),
        });
    }
}

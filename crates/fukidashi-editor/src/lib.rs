//! Fukidashi Editor Library
//!
//! Editor-side state for the bubble-annotation engine: the page collection,
//! viewport transform, pointer interaction state machine, keyboard shortcuts
//! and the storage interface to the surrounding application.

pub mod editor;
pub mod input;
pub mod interaction;
pub mod page;
pub mod shortcuts;
pub mod storage;
pub mod viewport;

pub use editor::{DownloadFile, EditorError, EditorShell, SaveRequest, StatusKind, StatusMessage};
pub use input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{Corner, Edge, Handle, HandleKind, InteractionController, Mode};
pub use page::{Page, PageStore};
pub use shortcuts::{EditorAction, Shortcut, ShortcutRegistry};
pub use storage::{AssetStore, FileStore, MemoryStore, PageRecord, SavePayload, StoreError, StoreResult};
pub use viewport::ViewportState;

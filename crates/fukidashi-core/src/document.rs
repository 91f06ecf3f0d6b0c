//! Annotation document model and structural validation.

use crate::geometry::BBox;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from loading an annotation document.
///
/// All of these reject the whole file; a document is never partially loaded.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed annotation document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("image_size must have positive width and height")]
    InvalidImageSize,
}

/// Stable bubble identity. Documents in the wild carry either numeric or
/// string ids; both are preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl ItemId {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            ItemId::Number(n) => Some(*n),
            ItemId::Text(_) => None,
        }
    }
}

/// Bubble classification.
///
/// Lowercase on the wire; `soft` and `custom` are accepted as aliases.
/// Unknown values decode as `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleKind {
    #[default]
    Standard,
    Thought,
    Shouting,
    #[serde(alias = "soft")]
    Whisper,
    Narration,
    #[serde(alias = "custom")]
    Distorted,
    Sfx,
}

/// Pixel dimensions of the page raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// One annotated region on a page.
///
/// Keys the editor does not model are kept verbatim in `extra` and written
/// back unchanged on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleItem {
    pub id: ItemId,
    /// Reading-order rank, 1-based. Absent until assigned.
    #[serde(
        default,
        deserialize_with = "de_opt_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<u32>,
    /// Source text recognized from the raster. Read-only in the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_original: Option<String>,
    /// Translated text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_opt_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub bubble_type: Option<BubbleKind>,
    #[serde(
        default,
        deserialize_with = "de_opt_bbox",
        skip_serializing_if = "Option::is_none"
    )]
    pub bbox_bubble: Option<BBox>,
    #[serde(
        default,
        deserialize_with = "de_opt_bbox",
        skip_serializing_if = "Option::is_none"
    )]
    pub bbox_text: Option<BBox>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BubbleItem {
    /// A freshly drawn bubble: standard type, empty texts, no order yet.
    pub fn new(id: ItemId, bbox: BBox) -> Self {
        Self {
            id,
            order: None,
            text_original: Some(String::new()),
            text: Some(String::new()),
            bubble_type: Some(BubbleKind::Standard),
            bbox_bubble: Some(bbox),
            bbox_text: None,
            extra: Map::new(),
        }
    }

    /// The box the editor reads for layout: `bbox_bubble` preferred,
    /// `bbox_text` as fallback.
    pub fn geometry(&self) -> Option<&BBox> {
        self.bbox_bubble.as_ref().or(self.bbox_text.as_ref())
    }

    /// Whether the item participates in geometric ordering. Items without a
    /// usable box sort after all placeable ones.
    pub fn is_placeable(&self) -> bool {
        self.geometry().is_some()
    }

    /// Write the authoritative box: `bbox_bubble` when present, otherwise
    /// `bbox_text`. Exactly one box is ever mutated per item.
    pub fn set_geometry(&mut self, bbox: BBox) {
        if self.bbox_bubble.is_some() || self.bbox_text.is_none() {
            self.bbox_bubble = Some(bbox);
        } else {
            self.bbox_text = Some(bbox);
        }
    }

    /// Effective bubble type, defaulting to `Standard`.
    pub fn kind(&self) -> BubbleKind {
        self.bubble_type.unwrap_or_default()
    }
}

/// A page's annotation document: raster dimensions plus the bubble items.
///
/// The `items` insertion order is not the reading order; `order` is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDocument {
    pub image_size: ImageSize,
    pub items: Vec<BubbleItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageDocument {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image_size: ImageSize { width, height },
            items: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Parse and structurally validate a document. A malformed `image_size`,
    /// a non-array `items`, or a malformed record rejects the whole file.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: PageDocument = serde_json::from_str(json)?;
        if doc.image_size.width == 0 || doc.image_size.height == 0 {
            return Err(DocumentError::InvalidImageSize);
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Id for a newly drawn bubble: one past the highest numeric id, or the
    /// item count plus one when no numeric id exists.
    pub fn next_item_id(&self) -> i64 {
        self.items
            .iter()
            .filter_map(|item| item.id.as_number())
            .max()
            .map(|max| max + 1)
            .unwrap_or(self.items.len() as i64 + 1)
    }
}

/// Tolerant order decoder: anything but a positive integer becomes `None`.
fn de_opt_order<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_u64())
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok()))
}

/// Tolerant type decoder: unknown or non-string values become `Standard`,
/// null behaves like an absent field.
fn de_opt_kind<'de, D>(deserializer: D) -> Result<Option<BubbleKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        if v.is_null() {
            None
        } else {
            Some(serde_json::from_value(v).unwrap_or_default())
        }
    }))
}

/// Tolerant box decoder: a box that does not parse as four finite numbers
/// becomes `None`, leaving the item unplaceable instead of rejecting the
/// document.
fn de_opt_bbox<'de, D>(deserializer: D) -> Result<Option<BBox>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(BBox::from_value))
}

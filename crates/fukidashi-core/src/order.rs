//! Reading-order inference: anchor-based row ordering, missing-order fill,
//! overlap resolution, and manual reordering.

use crate::document::{BubbleItem, PageDocument};
use std::collections::HashSet;

/// Weight of the horizontal center in the right-top-priority score. Larger
/// values favor right-most bubbles more strongly when ranking within a row.
const ANCHOR_X_WEIGHT: f64 = 1.1;

/// Side of the focal item an overlap-resolution pass pulls from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Right-top-priority score: smaller values read earlier. `None` for items
/// without usable geometry.
fn reading_score(item: &BubbleItem) -> Option<f64> {
    item.geometry()
        .map(|b| b.y_min - ANCHOR_X_WEIGHT * b.center().x)
}

/// Index of the anchor item: the placeable item minimizing the right-top
/// score, ties broken by the lowest original index.
pub fn anchor_index(items: &[BubbleItem]) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| reading_score(item).map(|score| (i, score)))
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(i, _)| i)
}

/// Row-based geometric reading order, as a permutation of item indices.
///
/// Placeable items sort by the distance of their vertical center from the
/// anchor's vertical center (grouping into implicit rows), ties broken by the
/// right-top score, then by original index. Items without usable geometry go
/// to the end in original order.
///
/// Pure function of the input geometry: repeated calls on the same items
/// return the same permutation.
pub fn row_order(items: &[BubbleItem]) -> Vec<usize> {
    let Some(anchor) = anchor_index(items) else {
        return (0..items.len()).collect();
    };
    let anchor_cy = items[anchor]
        .geometry()
        .map(|b| b.center().y)
        .unwrap_or_default();

    // (index, row distance, right-top score)
    let mut placeable: Vec<(usize, f64, f64)> = Vec::new();
    let mut unplaceable: Vec<usize> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match item.geometry() {
            Some(b) => placeable.push((
                i,
                (b.center().y - anchor_cy).abs(),
                b.y_min - ANCHOR_X_WEIGHT * b.center().x,
            )),
            None => unplaceable.push(i),
        }
    }

    placeable.sort_by(|a, b| {
        a.1.total_cmp(&b.1)
            .then(a.2.total_cmp(&b.2))
            .then(a.0.cmp(&b.0))
    });

    placeable
        .into_iter()
        .map(|(i, _, _)| i)
        .chain(unplaceable)
        .collect()
}

/// Assign the smallest unused positive order values to items lacking one,
/// visiting items in row-based order. Existing assignments are untouched.
pub fn fill_missing_orders(doc: &mut PageDocument) {
    let used: HashSet<u32> = doc.items.iter().filter_map(|item| item.order).collect();
    let mut next = 1u32;
    for idx in row_order(&doc.items) {
        if doc.items[idx].order.is_none() {
            while used.contains(&next) {
                next += 1;
            }
            doc.items[idx].order = Some(next);
            next += 1;
        }
    }
}

/// The current ordered sequence: item indices sorted by `order` (stable,
/// unordered items last in insertion order).
pub fn ordered_indices(doc: &PageDocument) -> Vec<usize> {
    let mut seq: Vec<usize> = (0..doc.items.len()).collect();
    seq.sort_by_key(|&i| {
        let order = doc.items[i].order;
        (order.is_none(), order.unwrap_or(u32::MAX), i)
    });
    seq
}

/// Rewrite every item's `order` to its 1-based position in `seq`.
fn renumber_seq(doc: &mut PageDocument, seq: &[usize]) {
    for (pos, &idx) in seq.iter().enumerate() {
        doc.items[idx].order = Some(pos as u32 + 1);
    }
}

/// Renumber all orders into a contiguous `1..N` following the current
/// ordered sequence. Used after removals leave gaps.
pub fn renumber(doc: &mut PageDocument) {
    let seq = ordered_indices(doc);
    renumber_seq(doc, &seq);
}

/// Pull items whose box overlaps the focal item's box so they sit
/// immediately adjacent to it in the ordered sequence. Only items on the
/// requested side of the focal item move; their relative order is preserved.
/// Non-overlapping items stay in place. Orders are renumbered.
pub fn resolve_overlaps(doc: &mut PageDocument, focal: usize, direction: Direction) {
    let Some(focal_box) = doc.items.get(focal).and_then(|item| item.geometry()).copied() else {
        return;
    };
    let seq = ordered_indices(doc);
    let Some(focal_pos) = seq.iter().position(|&i| i == focal) else {
        return;
    };

    let mut moved = Vec::new();
    let mut rest = Vec::new();
    for (pos, &idx) in seq.iter().enumerate() {
        let overlapping = idx != focal
            && doc.items[idx]
                .geometry()
                .is_some_and(|b| b.overlaps(&focal_box));
        let on_side = match direction {
            Direction::Backward => pos < focal_pos,
            Direction::Forward => pos > focal_pos,
        };
        if overlapping && on_side {
            moved.push(idx);
        } else {
            rest.push(idx);
        }
    }
    if moved.is_empty() {
        return;
    }

    let insert_at = rest
        .iter()
        .position(|&i| i == focal)
        .map(|pos| match direction {
            Direction::Backward => pos,
            Direction::Forward => pos + 1,
        })
        .unwrap_or(rest.len());
    let mut merged = rest;
    merged.splice(insert_at..insert_at, moved);
    renumber_seq(doc, &merged);
}

/// One overlap-resolution pass over the whole page: every item pulls its
/// overlapping later neighbors next to itself.
pub fn resolve_all_overlaps(doc: &mut PageDocument) {
    for idx in 0..doc.items.len() {
        resolve_overlaps(doc, idx, Direction::Forward);
    }
}

/// Order normalization for a freshly loaded document: fill in missing order
/// values following row order, then run one overlap pass per item.
pub fn normalize_on_load(doc: &mut PageDocument) {
    fill_missing_orders(doc);
    resolve_all_overlaps(doc);
    log::debug!("normalized reading order for {} items", doc.items.len());
}

/// Recompute the reading order from geometry alone, then resolve overlaps.
/// Discards any manual order values.
pub fn auto_order(doc: &mut PageDocument) {
    let seq = row_order(&doc.items);
    renumber_seq(doc, &seq);
    resolve_all_overlaps(doc);
}

/// Move `item` to position `target` (0-based) in the ordered sequence,
/// clamped to `[0, N − 1]`, and renumber all orders to a contiguous `1..N`.
pub fn move_to_rank(doc: &mut PageDocument, item: usize, target: usize) {
    if item >= doc.items.len() {
        return;
    }
    let mut seq = ordered_indices(doc);
    let Some(pos) = seq.iter().position(|&i| i == item) else {
        return;
    };
    seq.remove(pos);
    let target = target.min(doc.items.len() - 1);
    seq.insert(target.min(seq.len()), item);
    renumber_seq(doc, &seq);
}

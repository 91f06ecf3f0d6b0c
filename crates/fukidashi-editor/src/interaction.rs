//! Pointer interaction state machine: select, resize, draw, reorder, pan.
//!
//! One controller owns the mutually exclusive interaction modes, so exactly
//! one gesture can mutate the live document at a time and the per-handler
//! pointer-capture bookkeeping lives in a single place.

use crate::page::Page;
use crate::viewport::ViewportState;
use fukidashi_core::document::{BubbleItem, ImageSize, ItemId, PageDocument};
use fukidashi_core::{order, BBox};
use kurbo::{Point, Vec2};

/// Minimum bubble box size on either axis, in image pixels.
pub const MIN_BUBBLE_SIZE: f64 = 12.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Corner handle positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge-midpoint handle positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// The kind of resize handle being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
}

/// A resize handle with its position in image coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check whether a point (image coordinates) hits this handle.
    /// `tolerance` should be adjusted for the current zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let d = point - self.position;
        d.x * d.x + d.y * d.y <= tolerance * tolerance
    }
}

/// The 8 resize handles of a box: 4 corners plus 4 edge midpoints.
pub fn handles(bbox: &BBox) -> Vec<Handle> {
    let cx = (bbox.x_min + bbox.x_max) / 2.0;
    let cy = (bbox.y_min + bbox.y_max) / 2.0;
    vec![
        Handle::new(Point::new(bbox.x_min, bbox.y_min), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(bbox.x_max, bbox.y_min), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bbox.x_min, bbox.y_max), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(bbox.x_max, bbox.y_max), HandleKind::Corner(Corner::BottomRight)),
        Handle::new(Point::new(cx, bbox.y_min), HandleKind::Edge(Edge::Top)),
        Handle::new(Point::new(bbox.x_max, cy), HandleKind::Edge(Edge::Right)),
        Handle::new(Point::new(cx, bbox.y_max), HandleKind::Edge(Edge::Bottom)),
        Handle::new(Point::new(bbox.x_min, cy), HandleKind::Edge(Edge::Left)),
    ]
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(bbox: &BBox, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles(bbox)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// State of an active resize gesture. The box is always recomputed from the
/// gesture-start state, so intermediate moves never accumulate error.
#[derive(Debug, Clone)]
pub struct ResizeState {
    pub item: usize,
    pub handle: HandleKind,
    pub start_box: BBox,
    pub start_pointer: Point,
}

/// State of an active draw gesture: the overlay rectangle between the press
/// point and the current pointer.
#[derive(Debug, Clone)]
pub struct DrawState {
    pub start: Point,
    pub overlay: BBox,
}

/// Mutually exclusive interaction modes.
#[derive(Debug, Clone, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Dragging on empty canvas moves the viewport.
    Panning { last: Point },
    Resizing(ResizeState),
    Drawing(DrawState),
    /// Dragging a row handle in the bubble list. The value is the source
    /// position in the ordered sequence.
    ListDragging { source: usize },
}

/// Translates pointer gestures into page-store mutations.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    mode: Mode,
    draw_armed: bool,
    text_session: Option<TextSession>,
}

/// Pre-edit snapshot captured when a text field gains focus. Committed to
/// history at blur only if the document actually changed.
#[derive(Debug, Clone)]
struct TextSession {
    snapshot: PageDocument,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Idle)
    }

    pub fn draw_armed(&self) -> bool {
        self.draw_armed
    }

    /// Arm or disarm the draw-new-bubble mode.
    pub fn set_draw_armed(&mut self, armed: bool) {
        if self.is_idle() {
            self.draw_armed = armed;
        }
    }

    pub fn toggle_draw(&mut self) {
        self.set_draw_armed(!self.draw_armed);
    }

    /// Pointer press on the canvas. Starts a draw, resize, selection or pan
    /// depending on what is under the pointer; the modes are exclusive, so a
    /// press over a handle or an item never starts a pan.
    pub fn pointer_down(&mut self, page: &mut Page, viewport: &ViewportState, screen: Point) {
        if !self.is_idle() {
            return;
        }
        let image = viewport.screen_to_image(screen);

        if self.draw_armed {
            if let Some(size) = page.document.as_ref().map(|d| d.image_size) {
                let p = clamp_to_image(image, size);
                self.mode = Mode::Drawing(DrawState {
                    start: p,
                    overlay: BBox::new(p.x, p.y, p.x, p.y),
                });
            }
            return;
        }

        // a press on a handle of the selected bubble starts a resize
        let handle_hit = page.selected.and_then(|sel| {
            let bbox = *page.document.as_ref()?.items.get(sel)?.geometry()?;
            let tolerance = HANDLE_HIT_TOLERANCE / viewport.scale;
            hit_test_handles(&bbox, image, tolerance).map(|handle| (sel, handle, bbox))
        });
        if let Some((item, handle, start_box)) = handle_hit {
            page.snapshot("Resize bubble");
            self.mode = Mode::Resizing(ResizeState {
                item,
                handle,
                start_box,
                start_pointer: image,
            });
            return;
        }

        if let Some(index) = page
            .document
            .as_ref()
            .and_then(|doc| hit_test_items(doc, image))
        {
            page.toggle_select(index);
            return;
        }

        self.mode = Mode::Panning { last: screen };
    }

    /// Pointer movement. Updates whichever gesture is in flight; no history
    /// is pushed here.
    pub fn pointer_move(&mut self, page: &mut Page, viewport: &mut ViewportState, screen: Point) {
        match &mut self.mode {
            Mode::Idle | Mode::ListDragging { .. } => {}
            Mode::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                viewport.pan_by(delta);
            }
            Mode::Resizing(state) => {
                let image = viewport.screen_to_image(screen);
                let delta = image - state.start_pointer;
                let Some(size) = page.document.as_ref().map(|d| d.image_size) else {
                    return;
                };
                let resized = apply_resize(&state.start_box, state.handle, delta, size);
                let item = state.item;
                if let Some(item) = page.document.as_mut().and_then(|d| d.items.get_mut(item)) {
                    item.set_geometry(resized);
                }
            }
            Mode::Drawing(state) => {
                let Some(size) = page.document.as_ref().map(|d| d.image_size) else {
                    return;
                };
                let p = clamp_to_image(viewport.screen_to_image(screen), size);
                state.overlay = BBox::new(
                    state.start.x.min(p.x),
                    state.start.y.min(p.y),
                    state.start.x.max(p.x),
                    state.start.y.max(p.y),
                );
            }
        }
    }

    /// Pointer release. Commits an in-flight draw gesture and returns the
    /// index of the created bubble, if any.
    pub fn pointer_up(&mut self, page: &mut Page, _screen: Point) -> Option<usize> {
        match std::mem::take(&mut self.mode) {
            Mode::Drawing(state) => {
                self.draw_armed = false;
                commit_draw(page, state)
            }
            _ => None,
        }
    }

    /// Abort the active gesture (pointer-cancel or lost capture), discarding
    /// uncommitted visual state. History is left untouched.
    pub fn pointer_cancel(&mut self, page: &mut Page) {
        match std::mem::take(&mut self.mode) {
            Mode::Resizing(state) => {
                let item = state.item;
                if let Some(item) = page.document.as_mut().and_then(|d| d.items.get_mut(item)) {
                    item.set_geometry(state.start_box);
                }
            }
            Mode::Drawing(_) => {
                self.draw_armed = false;
            }
            _ => {}
        }
    }

    /// Begin dragging the list row at `source` position in the ordered
    /// sequence.
    pub fn begin_list_drag(&mut self, source: usize) {
        if self.is_idle() {
            self.mode = Mode::ListDragging { source };
        }
    }

    /// Drop the dragged row at `target` position: a manual reorder.
    pub fn drop_list_drag(&mut self, page: &mut Page, target: usize) {
        if let Mode::ListDragging { source } = std::mem::take(&mut self.mode) {
            page.reorder_by_position(source, target, "Reorder bubble");
        }
    }

    /// Begin a text-editing session: capture the pre-edit document so a
    /// focus/blur pair produces at most one history entry.
    pub fn begin_text_edit(&mut self, page: &Page) {
        if let Some(doc) = page.document.as_ref() {
            self.text_session = Some(TextSession { snapshot: doc.clone() });
        }
    }

    /// End the text-editing session. The captured snapshot is committed to
    /// history only when the document changed since focus.
    pub fn end_text_edit(&mut self, page: &mut Page) {
        let Some(session) = self.text_session.take() else {
            return;
        };
        let changed = page
            .document
            .as_ref()
            .is_some_and(|doc| *doc != session.snapshot);
        if changed {
            page.history.push_snapshot(session.snapshot, "Edit text");
        }
    }

    /// Whether a text-editing session is active (keyboard shortcuts are
    /// suppressed while it is).
    pub fn text_editing(&self) -> bool {
        self.text_session.is_some()
    }
}

/// Topmost item whose box contains `point`, preferring later items.
fn hit_test_items(doc: &PageDocument, point: Point) -> Option<usize> {
    doc.items
        .iter()
        .enumerate()
        .rev()
        .find(|(_, item)| item.geometry().is_some_and(|b| b.contains(point)))
        .map(|(i, _)| i)
}

fn clamp_to_image(p: Point, size: ImageSize) -> Point {
    Point::new(
        p.x.clamp(0.0, size.width as f64),
        p.y.clamp(0.0, size.height as f64),
    )
}

/// Resize the gesture-start box by the pointer delta. Dragged edges clamp to
/// the image bounds and respect the minimum size; the opposite edges never
/// move.
fn apply_resize(start: &BBox, handle: HandleKind, delta: Vec2, size: ImageSize) -> BBox {
    let (w, h) = (size.width as f64, size.height as f64);
    let mut b = *start;

    let moves_left = matches!(
        handle,
        HandleKind::Corner(Corner::TopLeft | Corner::BottomLeft) | HandleKind::Edge(Edge::Left)
    );
    let moves_right = matches!(
        handle,
        HandleKind::Corner(Corner::TopRight | Corner::BottomRight) | HandleKind::Edge(Edge::Right)
    );
    let moves_top = matches!(
        handle,
        HandleKind::Corner(Corner::TopLeft | Corner::TopRight) | HandleKind::Edge(Edge::Top)
    );
    let moves_bottom = matches!(
        handle,
        HandleKind::Corner(Corner::BottomLeft | Corner::BottomRight) | HandleKind::Edge(Edge::Bottom)
    );

    if moves_left {
        b.x_min = (start.x_min + delta.x)
            .clamp(0.0, w)
            .min(b.x_max - MIN_BUBBLE_SIZE);
    }
    if moves_right {
        b.x_max = (start.x_max + delta.x)
            .clamp(0.0, w)
            .max(b.x_min + MIN_BUBBLE_SIZE);
    }
    if moves_top {
        b.y_min = (start.y_min + delta.y)
            .clamp(0.0, h)
            .min(b.y_max - MIN_BUBBLE_SIZE);
    }
    if moves_bottom {
        b.y_max = (start.y_max + delta.y)
            .clamp(0.0, h)
            .max(b.y_min + MIN_BUBBLE_SIZE);
    }
    b
}

/// Grow an undersized box symmetrically to the minimum size, shifting it
/// back inside the image when the growth crosses an edge.
fn expand_to_min(bbox: BBox, size: ImageSize) -> BBox {
    let (w, h) = (size.width as f64, size.height as f64);
    let mut b = bbox;
    if b.width() < MIN_BUBBLE_SIZE {
        let grow = (MIN_BUBBLE_SIZE - b.width()) / 2.0;
        b.x_min -= grow;
        b.x_max += grow;
        if b.x_min < 0.0 {
            b.x_max -= b.x_min;
            b.x_min = 0.0;
        }
        if b.x_max > w {
            b.x_min -= b.x_max - w;
            b.x_max = w;
        }
        b.x_min = b.x_min.max(0.0);
    }
    if b.height() < MIN_BUBBLE_SIZE {
        let grow = (MIN_BUBBLE_SIZE - b.height()) / 2.0;
        b.y_min -= grow;
        b.y_max += grow;
        if b.y_min < 0.0 {
            b.y_max -= b.y_min;
            b.y_min = 0.0;
        }
        if b.y_max > h {
            b.y_min -= b.y_max - h;
            b.y_max = h;
        }
        b.y_min = b.y_min.max(0.0);
    }
    b
}

/// Commit a finished draw gesture as a new bubble: assign the next id,
/// append, re-derive missing orders and select the new item.
fn commit_draw(page: &mut Page, state: DrawState) -> Option<usize> {
    let size = page.document.as_ref().map(|d| d.image_size)?;
    let bbox = expand_to_min(state.overlay, size);

    page.snapshot("Add bubble");
    let doc = page.document.as_mut()?;
    let id = ItemId::Number(doc.next_item_id());
    log::debug!("drawing new bubble {:?} at {:?}", id, bbox);
    doc.items.push(BubbleItem::new(id, bbox));
    order::fill_missing_orders(doc);

    let index = doc.items.len() - 1;
    page.selected = Some(index);
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fukidashi_core::document::ItemId;

    fn test_page() -> Page {
        let mut doc = PageDocument::new(200, 200);
        doc.items.push(BubbleItem::new(
            ItemId::Number(1),
            BBox::new(50.0, 50.0, 100.0, 100.0),
        ));
        doc.items.push(BubbleItem::new(
            ItemId::Number(2),
            BBox::new(120.0, 50.0, 170.0, 100.0),
        ));
        let mut page = Page::new("p001", "p001.png");
        page.attach_document(doc);
        page
    }

    fn test_viewport() -> ViewportState {
        let mut vp = ViewportState::new();
        vp.set_viewport_size(800.0, 600.0);
        vp.set_content_size(200.0, 200.0);
        vp
    }

    /// Screen point over the given image point under the test viewport.
    fn at(vp: &ViewportState, x: f64, y: f64) -> Point {
        vp.image_to_screen(Point::new(x, y))
    }

    fn geometry(page: &Page, index: usize) -> BBox {
        *page.document.as_ref().unwrap().items[index].geometry().unwrap()
    }

    #[test]
    fn test_eight_handles() {
        let hs = handles(&BBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(hs.len(), 8);
        assert!(hit_test_handles(&BBox::new(0.0, 0.0, 10.0, 10.0), Point::new(5.0, 10.0), 2.0)
            .is_some_and(|k| k == HandleKind::Edge(Edge::Bottom)));
        assert!(hit_test_handles(&BBox::new(0.0, 0.0, 10.0, 10.0), Point::new(5.0, 5.0), 2.0).is_none());
    }

    #[test]
    fn test_click_selects_and_toggles() {
        let mut page = test_page();
        let vp = test_viewport();
        let mut ctl = InteractionController::new();

        ctl.pointer_down(&mut page, &vp, at(&vp, 75.0, 75.0));
        assert_eq!(page.selected, Some(0));
        ctl.pointer_up(&mut page, at(&vp, 75.0, 75.0));

        ctl.pointer_down(&mut page, &vp, at(&vp, 75.0, 75.0));
        assert_eq!(page.selected, None);
    }

    #[test]
    fn test_empty_canvas_press_pans() {
        let mut page = test_page();
        let mut vp = test_viewport();
        let mut ctl = InteractionController::new();

        let start = at(&vp, 10.0, 180.0);
        ctl.pointer_down(&mut page, &vp, start);
        assert!(matches!(ctl.mode(), Mode::Panning { .. }));

        let pan_before = vp.pan;
        ctl.pointer_move(&mut page, &mut vp, start + Vec2::new(30.0, 0.0));
        assert!((vp.pan.x - pan_before.x - 30.0).abs() < f64::EPSILON);
        ctl.pointer_up(&mut page, start);
        assert!(ctl.is_idle());
    }

    #[test]
    fn test_press_over_item_does_not_pan() {
        let mut page = test_page();
        let vp = test_viewport();
        let mut ctl = InteractionController::new();

        ctl.pointer_down(&mut page, &vp, at(&vp, 130.0, 60.0));
        assert!(ctl.is_idle());
        assert_eq!(page.selected, Some(1));
    }

    #[test]
    fn test_resize_from_corner() {
        let mut page = test_page();
        let mut vp = test_viewport();
        let mut ctl = InteractionController::new();
        page.toggle_select(0);

        ctl.pointer_down(&mut page, &vp, at(&vp, 100.0, 100.0));
        assert!(matches!(ctl.mode(), Mode::Resizing(_)));

        let p = at(&vp, 120.0, 130.0);


        ctl.pointer_move(&mut page, &mut vp, p);
        assert_eq!(geometry(&page, 0), BBox::new(50.0, 50.0, 120.0, 130.0));

        ctl.pointer_up(&mut page, at(&vp, 120.0, 130.0));
        assert!(ctl.is_idle());
        // one history entry for the whole gesture
        assert_eq!(page.history.undo_depth(), 1);
    }

    #[test]
    fn test_resize_clamps_to_image_bounds() {
        let mut page = test_page();
        let mut vp = test_viewport();
        let mut ctl = InteractionController::new();
        page.toggle_select(0);

        ctl.pointer_down(&mut page, &vp, at(&vp, 100.0, 100.0));
        let p = at(&vp, 900.0, 900.0);

        ctl.pointer_move(&mut page, &mut vp, p);
        assert_eq!(geometry(&page, 0), BBox::new(50.0, 50.0, 200.0, 200.0));
    }

    #[test]
    fn test_resize_enforces_minimum_size() {
        let mut page = test_page();
        let mut vp = test_viewport();
        let mut ctl = InteractionController::new();
        page.toggle_select(0);

        // drag the bottom-right corner far past the opposite corner
        ctl.pointer_down(&mut page, &vp, at(&vp, 100.0, 100.0));
        let p = at(&vp, 0.0, 0.0);

        ctl.pointer_move(&mut page, &mut vp, p);

        let b = geometry(&page, 0);
        assert!((b.width() - MIN_BUBBLE_SIZE).abs() < f64::EPSILON);
        assert!((b.height() - MIN_BUBBLE_SIZE).abs() < f64::EPSILON);
        // the opposite corner never moved
        assert_eq!((b.x_min, b.y_min), (50.0, 50.0));
    }

    #[test]
    fn test_resize_edge_handle_moves_single_edge() {
        let mut page = test_page();
        let mut vp = test_viewport();
        let mut ctl = InteractionController::new();
        page.toggle_select(0);

        ctl.pointer_down(&mut page, &vp, at(&vp, 50.0, 75.0));
        assert!(matches!(
            ctl.mode(),
            Mode::Resizing(ResizeState { handle: HandleKind::Edge(Edge::Left), .. })
        ));
        let p = at(&vp, 40.0, 90.0);

        ctl.pointer_move(&mut page, &mut vp, p);
        assert_eq!(geometry(&page, 0), BBox::new(40.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_resize_cancel_restores_start_box() {
        let mut page = test_page();
        let mut vp = test_viewport();
        let mut ctl = InteractionController::new();
        page.toggle_select(0);

        ctl.pointer_down(&mut page, &vp, at(&vp, 100.0, 100.0));
        let p = at(&vp, 150.0, 150.0);

        ctl.pointer_move(&mut page, &mut vp, p);
        ctl.pointer_cancel(&mut page);

        assert_eq!(geometry(&page, 0), BBox::new(50.0, 50.0, 100.0, 100.0));
        assert!(ctl.is_idle());
    }

    #[test]
    fn test_draw_creates_selected_bubble() {
        let mut page = test_page();
        let mut vp = test_viewport();
        let mut ctl = InteractionController::new();

        ctl.set_draw_armed(true);
        ctl.pointer_down(&mut page, &vp, at(&vp, 10.0, 110.0));
        assert!(matches!(ctl.mode(), Mode::Drawing(_)));

        let p = at(&vp, 40.0, 150.0);


        ctl.pointer_move(&mut page, &mut vp, p);
        let created = ctl.pointer_up(&mut page, at(&vp, 40.0, 150.0));

        assert_eq!(created, Some(2));
        assert_eq!(page.selected, Some(2));
        assert!(!ctl.draw_armed(), "draw mode exits after one draw");

        let doc = page.document.as_ref().unwrap();
        let item = &doc.items[2];
        assert_eq!(item.id, ItemId::Number(3));
        assert_eq!(item.kind(), fukidashi_core::BubbleKind::Standard);
        assert_eq!(item.text.as_deref(), Some(""));
        assert_eq!(item.order, Some(3));
        assert_eq!(*item.geometry().unwrap(), BBox::new(10.0, 110.0, 40.0, 150.0));
        assert_eq!(page.history.undo_depth(), 1);
    }

    #[test]
    fn test_tiny_draw_expands_symmetrically() {
        let mut page = test_page();
        let mut vp = test_viewport();
        let mut ctl = InteractionController::new();

        ctl.set_draw_armed(true);
        ctl.pointer_down(&mut page, &vp, at(&vp, 20.0, 120.0));
        let p = at(&vp, 24.0, 124.0);

        ctl.pointer_move(&mut page, &mut vp, p);
        ctl.pointer_up(&mut page, at(&vp, 24.0, 124.0));

        let b = geometry(&page, 2);
        assert!((b.width() - MIN_BUBBLE_SIZE).abs() < 1e-9);
        assert!((b.height() - MIN_BUBBLE_SIZE).abs() < 1e-9);
        // symmetric growth around the drawn rectangle
        assert!((b.x_min - 16.0).abs() < 1e-9);
        assert!((b.x_max - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiny_draw_at_image_edge_stays_in_bounds() {
        let mut page = test_page();
        let mut vp = test_viewport();
        let mut ctl = InteractionController::new();

        ctl.set_draw_armed(true);
        ctl.pointer_down(&mut page, &vp, at(&vp, 0.0, 0.0));
        let p = at(&vp, 2.0, 2.0);

        ctl.pointer_move(&mut page, &mut vp, p);
        ctl.pointer_up(&mut page, at(&vp, 2.0, 2.0));

        let b = geometry(&page, 2);
        assert!(b.x_min >= 0.0 && b.y_min >= 0.0);
        assert!((b.width() - MIN_BUBBLE_SIZE).abs() < 1e-9);
    }

    #[test]
    fn test_draw_cancel_commits_nothing() {
        let mut page = test_page();
        let vp = test_viewport();
        let mut ctl = InteractionController::new();

        ctl.set_draw_armed(true);
        ctl.pointer_down(&mut page, &vp, at(&vp, 10.0, 110.0));
        ctl.pointer_cancel(&mut page);

        assert_eq!(page.item_count(), 2);
        assert!(!ctl.draw_armed());
        assert!(!page.history.can_undo());
    }

    #[test]
    fn test_list_drag_reorders() {
        let mut page = test_page();
        let mut ctl = InteractionController::new();

        // reading order is [1, 0]: item 1 is to the right
        ctl.begin_list_drag(0);
        ctl.drop_list_drag(&mut page, 1);

        assert!(page.manual_order_changed);
        let doc = page.document.as_ref().unwrap();
        assert_eq!(doc.items[1].order, Some(2));
        assert_eq!(doc.items[0].order, Some(1));
    }

    #[test]
    fn test_text_session_commits_only_on_change() {
        let mut page = test_page();
        let mut ctl = InteractionController::new();

        // focus and blur without editing: no history entry
        ctl.begin_text_edit(&page);
        assert!(ctl.text_editing());
        ctl.end_text_edit(&mut page);
        assert!(!page.history.can_undo());

        // focus, edit, blur: exactly one entry with the pre-edit state
        ctl.begin_text_edit(&page);
        if let Some(doc) = page.document.as_mut() {
            doc.items[0].text = Some("translated".to_string());
        }
        ctl.end_text_edit(&mut page);
        assert_eq!(page.history.undo_depth(), 1);

        page.undo();
        let doc = page.document.as_ref().unwrap();
        assert_eq!(doc.items[0].text.as_deref(), Some(""));
    }
}

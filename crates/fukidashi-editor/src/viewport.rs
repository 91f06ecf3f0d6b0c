//! Viewport transform: zoom and pan over the page raster.
//!
//! The raster is drawn centered in the viewport, scaled by `scale` and
//! shifted by `pan` (screen pixels). All clamping lives here so callers can
//! pan and zoom freely without losing the content.

use kurbo::{Point, Rect, Size, Vec2};

/// Zoom step for the toolbar and keyboard zoom actions.
pub const ZOOM_STEP: f64 = 0.2;
/// Minimum zoom level.
pub const MIN_ZOOM: f64 = 0.4;
/// Maximum zoom level.
pub const MAX_ZOOM: f64 = 3.0;
/// Extra slack beyond the content edge when panning, in screen pixels.
pub const PAN_MARGIN: f64 = 48.0;
/// Pan distance for one shifted arrow-key press, in screen pixels.
pub const KEY_PAN_STEP: f64 = 64.0;
/// Margin kept between a focused bubble and the viewport edge when
/// auto-panning it into view.
pub const VIEW_MARGIN: f64 = 24.0;

/// Zoom/pan state for the page canvas.
#[derive(Debug, Clone)]
pub struct ViewportState {
    pub scale: f64,
    pub pan: Vec2,
    pub viewport_size: Size,
    pub content_size: Size,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan: Vec2::ZERO,
            viewport_size: Size::new(800.0, 600.0),
            content_size: Size::ZERO,
        }
    }
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
        self.clamp_pan();
    }

    pub fn set_content_size(&mut self, width: f64, height: f64) {
        self.content_size = Size::new(width, height);
        self.clamp_pan();
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.scale + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.scale - ZOOM_STEP);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.scale = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.clamp_pan();
    }

    /// Zoom from scroll input, keeping the point under the cursor visually
    /// stationary.
    pub fn wheel_zoom(&mut self, delta_y: f64, cursor: Point) {
        let old = self.scale;
        let stepped = if delta_y < 0.0 {
            old + ZOOM_STEP
        } else {
            old - ZOOM_STEP
        };
        let new = stepped.clamp(MIN_ZOOM, MAX_ZOOM);
        if (new - old).abs() < f64::EPSILON {
            return;
        }
        let offset = cursor - self.viewport_center();
        self.pan += (1.0 - new / old) * (offset - self.pan);
        self.scale = new;
        self.clamp_pan();
    }

    /// Pan by a screen-space delta, clamped so the content stays reachable.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
        self.clamp_pan();
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.pan = Vec2::ZERO;
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0)
    }

    /// Half-range of legal pan values for the current content and zoom.
    fn pan_limit(&self) -> Vec2 {
        Vec2::new(
            ((self.content_size.width * self.scale - self.viewport_size.width) / 2.0).max(0.0)
                + PAN_MARGIN,
            ((self.content_size.height * self.scale - self.viewport_size.height) / 2.0).max(0.0)
                + PAN_MARGIN,
        )
    }

    fn clamp_pan(&mut self) {
        let limit = self.pan_limit();
        self.pan.x = self.pan.x.clamp(-limit.x, limit.x);
        self.pan.y = self.pan.y.clamp(-limit.y, limit.y);
    }

    /// Convert a screen point to content (image-pixel) coordinates.
    pub fn screen_to_image(&self, screen: Point) -> Point {
        let center = self.viewport_center();
        Point::new(
            (screen.x - center.x - self.pan.x) / self.scale + self.content_size.width / 2.0,
            (screen.y - center.y - self.pan.y) / self.scale + self.content_size.height / 2.0,
        )
    }

    /// Convert a content point to screen coordinates.
    pub fn image_to_screen(&self, image: Point) -> Point {
        let center = self.viewport_center();
        Point::new(
            center.x + self.pan.x + (image.x - self.content_size.width / 2.0) * self.scale,
            center.y + self.pan.y + (image.y - self.content_size.height / 2.0) * self.scale,
        )
    }

    /// Screen-space rectangle of a content-space rectangle.
    pub fn image_rect_to_screen(&self, rect: Rect) -> Rect {
        let p0 = self.image_to_screen(Point::new(rect.x0, rect.y0));
        let p1 = self.image_to_screen(Point::new(rect.x1, rect.y1));
        Rect::new(p0.x, p0.y, p1.x, p1.y)
    }

    /// Minimal pan adjustment bringing `rect` (content space) inside the
    /// viewport minus `margin`. When the rect cannot fit, it is centered
    /// instead.
    pub fn pan_into_view(&mut self, rect: Rect, margin: f64) {
        let screen = self.image_rect_to_screen(rect);
        let dx = axis_adjust(screen.x0, screen.x1, self.viewport_size.width, margin);
        let dy = axis_adjust(screen.y0, screen.y1, self.viewport_size.height, margin);
        if dx != 0.0 || dy != 0.0 {
            self.pan_by(Vec2::new(dx, dy));
        }
    }
}

/// Shift needed along one axis to bring `[lo, hi]` inside
/// `[margin, view − margin]`, or to center it when it does not fit.
fn axis_adjust(lo: f64, hi: f64, view: f64, margin: f64) -> f64 {
    let view_lo = margin;
    let view_hi = view - margin;
    if hi - lo > view_hi - view_lo {
        view / 2.0 - (lo + hi) / 2.0
    } else if lo < view_lo {
        view_lo - lo
    } else if hi > view_hi {
        view_hi - hi
    } else {
        0.0
    }
}

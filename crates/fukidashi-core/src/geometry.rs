//! Bounding-box primitives shared by the document model and the editor.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An axis-aligned box in image-pixel coordinates.
///
/// Serialized with the canonical `x_min`/`y_min`/`x_max`/`y_max` names.
/// Legacy documents using `xMin`/`yMin`/`xMax`/`yMax` are accepted on input
/// and rewritten to the canonical names on the next save.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BBox {
    /// Create a box from its four edges.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Parse a box from loosely-typed JSON, accepting either field-naming
    /// convention. Returns `None` unless all four values parse as finite
    /// numbers.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |canonical: &str, legacy: &str| -> Option<f64> {
            let n = obj.get(canonical).or_else(|| obj.get(legacy))?.as_f64()?;
            n.is_finite().then_some(n)
        };
        Some(Self {
            x_min: field("x_min", "xMin")?,
            y_min: field("y_min", "yMin")?,
            x_max: field("x_max", "xMax")?,
            y_max: field("y_max", "yMax")?,
        })
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Center point of the box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Strict overlap test: the 1-D intervals must overlap by more than zero
    /// on both axes. Touching edges do not count.
    pub fn overlaps(&self, other: &BBox) -> bool {
        self.x_min < other.x_max
            && other.x_min < self.x_max
            && self.y_min < other.y_max
            && other.y_min < self.y_max
    }

    /// Whether `point` lies inside the box (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x_min
            && point.x <= self.x_max
            && point.y >= self.y_min
            && point.y <= self.y_max
    }

    /// View as a `kurbo::Rect` for viewport math.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x_min, self.y_min, self.x_max, self.y_max)
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_canonical() {
        let b = BBox::from_value(&json!({
            "x_min": 1.0, "y_min": 2.0, "x_max": 3.0, "y_max": 4.0
        }))
        .unwrap();
        assert_eq!(b, BBox::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_from_value_legacy_names() {
        let b = BBox::from_value(&json!({
            "xMin": 10, "yMin": 20, "xMax": 30, "yMax": 40
        }))
        .unwrap();
        assert_eq!(b, BBox::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_from_value_rejects_non_numbers() {
        assert!(BBox::from_value(&json!({
            "x_min": "1", "y_min": 2, "x_max": 3, "y_max": 4
        }))
        .is_none());
        assert!(BBox::from_value(&json!({
            "x_min": 1, "y_min": 2, "x_max": 3
        }))
        .is_none());
        assert!(BBox::from_value(&json!({
            "x_min": null, "y_min": 2, "x_max": 3, "y_max": 4
        }))
        .is_none());
        assert!(BBox::from_value(&json!(null)).is_none());
        assert!(BBox::from_value(&json!([1, 2, 3, 4])).is_none());
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let touching = BBox::new(10.0, 0.0, 20.0, 10.0);
        let overlapping = BBox::new(5.0, 5.0, 15.0, 15.0);
        let disjoint = BBox::new(20.0, 20.0, 30.0, 30.0);

        assert!(!a.overlaps(&touching));
        assert!(!touching.overlaps(&a));
        assert!(a.overlaps(&overlapping));
        assert!(overlapping.overlaps(&a));
        assert!(!a.overlaps(&disjoint));
    }

    #[test]
    fn test_center() {
        let b = BBox::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(b.center(), Point::new(5.0, 10.0));
    }

    #[test]
    fn test_rect_roundtrip() {
        let b = BBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(BBox::from_rect(b.rect()), b);
    }
}

//! Layout rectangles and intersection math used by the layout observer.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page coordinates (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlapping region of two rectangles, if any
    ///
    /// Edge-adjacent rectangles produce a zero-area intersection rather than
    /// `None`, mirroring how browsers report elements that touch the viewport.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }

        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Fraction of `target`'s area that lies inside `root`
///
/// Zero-area targets count as fully visible once they touch the root, so
/// empty placeholders still trigger their reveal.
pub fn intersection_ratio(target: &Rect, root: &Rect) -> f64 {
    let Some(overlap) = target.intersection(root) else {
        return 0.0;
    };

    let area = target.area();
    if area <= 0.0 {
        return 1.0;
    }

    (overlap.area() / area).clamp(0.0, 1.0)
}

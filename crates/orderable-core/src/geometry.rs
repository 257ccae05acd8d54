#![forbid(unsafe_code)]

//! Geometric primitives.

/// A point in page coordinates (viewport position plus scroll offset).
///
/// Pointer positions arrive in viewport coordinates and are converted with
/// [`Point::to_page`] before they are compared against centroids.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Translate a viewport position into page coordinates.
    #[inline]
    #[must_use]
    pub fn to_page(self, scroll: Point) -> Point {
        Point::new(self.x + scroll.x, self.y + scroll.y)
    }
}

/// A bounding box as reported by the platform.
///
/// Uses viewport coordinates (origin at the top-left of the visible area),
/// matching what a layout engine hands back for an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Midpoint in viewport coordinates.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.x + self.right()) / 2.0, (self.y + self.bottom()) / 2.0)
    }
}

/// Centroid of `bounds` in page coordinates.
///
/// Adding the scroll offset keeps the value stable while the viewport scrolls
/// during a drag.
#[inline]
pub fn centroid_of(bounds: Rect, scroll: Point) -> Point {
    bounds.center().to_page(scroll)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn center_is_midpoint() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(r.center(), Point::new(50.0, 25.0));
    }

    #[test]
    fn centroid_adds_scroll_offset() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(centroid_of(r, Point::ORIGIN), Point::new(20.0, 20.0));
        assert_eq!(
            centroid_of(r, Point::new(5.0, 300.0)),
            Point::new(25.0, 320.0)
        );
    }

    #[test]
    fn to_page_translates() {
        let p = Point::new(1.5, -2.0).to_page(Point::new(10.0, 10.0));
        assert_eq!(p, Point::new(11.5, 8.0));
    }

    #[test]
    fn distance_is_euclidean_and_symmetric() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(distance(b, a), 5.0);
        assert_eq!(distance(a, a), 0.0);
    }
}

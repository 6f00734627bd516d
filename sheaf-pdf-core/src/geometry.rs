//! Basic geometric types.
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! page and y growing downwards, matching the page canvas. The writer flips
//! them into PDF user space when it emits `/Rect` arrays.

/// A point in page space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0)
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    /// Create a rectangle from position and size
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle spanning two corner points in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Get the center point
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrinks the rectangle by `amount` on every side, never below zero size.
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - 2.0 * amount).max(0.0),
            height: (self.height - 2.0 * amount).max(0.0),
        }
    }

    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    /// `[llx lly urx ury]` in PDF user space for a page `page_height` tall.
    pub fn to_pdf_rect(&self, page_height: f64) -> [f64; 4] {
        [
            self.x,
            page_height - self.bottom(),
            self.right(),
            page_height - self.y,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);

        let origin = Point::origin();
        assert_eq!(origin.x, 0.0);
        assert_eq!(origin.y, 0.0);
    }

    #[test]
    fn test_rectangle() {
        let rect = Rectangle::new(10.0, 20.0, 100.0, 100.0);

        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 120.0);

        let center = rect.center();
        assert_eq!(center.x, 60.0);
        assert_eq!(center.y, 70.0);
    }

    #[test]
    fn test_from_corners() {
        let rect = Rectangle::from_corners(Point::new(60.0, 50.0), Point::new(10.0, 20.0));
        assert_eq!(rect, Rectangle::new(10.0, 20.0, 50.0, 30.0));
    }

    #[test]
    fn test_inset() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, 4.0).inset(3.0);
        assert_eq!(rect.x, 3.0);
        assert_eq!(rect.width, 4.0);
        assert_eq!(rect.height, 0.0);
    }

    #[test]
    fn test_to_pdf_rect_flips_y() {
        let rect = Rectangle::new(50.0, 100.0, 200.0, 20.0);
        assert_eq!(rect.to_pdf_rect(800.0), [50.0, 680.0, 250.0, 700.0]);
    }
}

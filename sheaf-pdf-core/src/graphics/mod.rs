//! Page drawing surface.
//!
//! Page content is painted onto a raster (one pixel per point) through the
//! [`Canvas`] trait. The writer embeds the finished raster as a single image
//! per page, so whatever is drawn here is exactly what the saved page shows.

mod color;
mod raster;

pub use color::Color;
pub use raster::RasterCanvas;

use crate::geometry::{Point, Rectangle};

/// Drawing operations available on a page.
///
/// Coordinates are in points, origin at the top-left, y growing downwards.
/// Every operation goes through the current transform.
pub trait Canvas {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Paints the whole surface, ignoring the transform.
    fn clear(&mut self, color: Color);

    fn draw_line(&mut self, from: Point, to: Point, color: Color);

    fn stroke_rect(&mut self, rect: Rectangle, color: Color);

    fn fill_rect(&mut self, rect: Rectangle, color: Color);

    /// Composites `color` over the rectangle with the given opacity (0.0-1.0).
    fn blend_rect(&mut self, rect: Rectangle, color: Color, opacity: f64);

    /// Ellipse inscribed in `bounds`.
    fn stroke_ellipse(&mut self, bounds: Rectangle, color: Color);

    fn fill_ellipse(&mut self, bounds: Rectangle, color: Color);

    fn stroke_polygon(&mut self, points: &[Point], color: Color);

    fn fill_polygon(&mut self, points: &[Point], color: Color);

    fn translate(&mut self, dx: f64, dy: f64);

    fn scale(&mut self, sx: f64, sy: f64);

    /// Rotates clockwise by `degrees` around the current origin.
    fn rotate(&mut self, degrees: f64);

    fn reset_transform(&mut self);
}

/// Affine transform `[a b c d e f]`, mapping `(x, y)` to
/// `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Applies `other` in local coordinates before this transform.
    pub fn pre_concat(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// True when the transform maps axis-aligned rectangles to axis-aligned
    /// rectangles.
    pub fn is_axis_aligned(&self) -> bool {
        self.b.abs() < 1e-9 && self.c.abs() < 1e-9
    }
}

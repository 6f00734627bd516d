use image::{Rgb, RgbImage};
use imageproc::point::Point as PixelPoint;
use imageproc::rect::Rect;

use super::{Canvas, Color, Transform};
use crate::geometry::{Point, Rectangle};

/// Segments used when an ellipse has to be drawn as a polygon.
const ELLIPSE_SEGMENTS: usize = 64;

/// RGB raster backing a page, one pixel per point.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: RgbImage,
    transform: Transform,
}

impl RasterCanvas {
    /// Creates a white canvas covering `width` x `height` points.
    pub fn new(width: f64, height: f64) -> Self {
        let image = RgbImage::from_pixel(pixels(width), pixels(height), Rgb([255, 255, 255]));
        Self {
            image,
            transform: Transform::identity(),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Pixel at `(x, y)`, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        (x < self.image.width() && y < self.image.height()).then(|| *self.image.get_pixel(x, y))
    }

    fn map(&self, p: Point) -> Point {
        self.transform.apply(p)
    }

    fn map_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.map(p)).collect()
    }

    /// Device-space rectangle when the transform keeps `rect` axis-aligned.
    fn device_rect(&self, rect: Rectangle) -> Option<Rectangle> {
        if !self.transform.is_axis_aligned() {
            return None;
        }
        let a = self.map(Point::new(rect.x, rect.y));
        let b = self.map(Point::new(rect.right(), rect.bottom()));
        Some(Rectangle::from_corners(a, b))
    }

    fn segment(&mut self, from: Point, to: Point, pixel: Rgb<u8>) {
        imageproc::drawing::draw_line_segment_mut(
            &mut self.image,
            (from.x as f32, from.y as f32),
            (to.x as f32, to.y as f32),
            pixel,
        );
    }

    fn outline(&mut self, device_points: &[Point], pixel: Rgb<u8>) {
        if device_points.len() < 2 {
            return;
        }
        for (i, &from) in device_points.iter().enumerate() {
            let to = device_points[(i + 1) % device_points.len()];
            self.segment(from, to, pixel);
        }
    }

    fn fill_device_polygon(&mut self, device_points: &[Point], pixel: Rgb<u8>) {
        let mut poly: Vec<PixelPoint<i32>> = Vec::with_capacity(device_points.len());
        for p in device_points {
            let q = PixelPoint::new(p.x.round() as i32, p.y.round() as i32);
            if poly.last() != Some(&q) {
                poly.push(q);
            }
        }
        while poly.len() > 1 && poly.first() == poly.last() {
            poly.pop();
        }

        if poly.len() < 3 {
            // Degenerate after rounding: a dot or a line.
            self.outline(device_points, pixel);
            return;
        }
        imageproc::drawing::draw_polygon_mut(&mut self.image, &poly, pixel);
    }

    fn ellipse_points(bounds: Rectangle) -> Vec<Point> {
        let center = bounds.center();
        let (rx, ry) = (bounds.width / 2.0, bounds.height / 2.0);
        (0..ELLIPSE_SEGMENTS)
            .map(|i| {
                let t = i as f64 / ELLIPSE_SEGMENTS as f64 * std::f64::consts::TAU;
                Point::new(center.x + rx * t.cos(), center.y + ry * t.sin())
            })
            .collect()
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, color: Color) {
        let pixel = color.to_pixel();
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        let (from, to) = (self.map(from), self.map(to));
        self.segment(from, to, color.to_pixel());
    }

    fn stroke_rect(&mut self, rect: Rectangle, color: Color) {
        let pixel = color.to_pixel();
        match self.device_rect(rect).and_then(to_pixel_rect) {
            Some(r) => imageproc::drawing::draw_hollow_rect_mut(&mut self.image, r, pixel),
            None => {
                let corners = self.map_all(&rect.corners());
                self.outline(&corners, pixel);
            }
        }
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        let pixel = color.to_pixel();
        match self.device_rect(rect) {
            Some(device) => {
                if let Some(r) = to_pixel_rect(device) {
                    imageproc::drawing::draw_filled_rect_mut(&mut self.image, r, pixel);
                }
            }
            None => {
                let corners = self.map_all(&rect.corners());
                self.fill_device_polygon(&corners, pixel);
            }
        }
    }

    fn blend_rect(&mut self, rect: Rectangle, color: Color, opacity: f64) {
        if !opacity.is_finite() {
            return;
        }
        let alpha = opacity.clamp(0.0, 1.0);
        if alpha == 0.0 {
            return;
        }

        let corners = self.map_all(&rect.corners());
        let (min_x, max_x) = span(corners.iter().map(|p| p.x));
        let (min_y, max_y) = span(corners.iter().map(|p| p.y));
        let (width, height) = self.image.dimensions();

        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = (max_x.ceil().max(0.0) as u32).min(width);
        let y1 = (max_y.ceil().max(0.0) as u32).min(height);
        let axis_aligned = self.transform.is_axis_aligned();
        let Rgb(src) = color.to_pixel();

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if !axis_aligned && !contains(&corners, center) {
                    continue;
                }
                let dst = self.image.get_pixel_mut(x, y);
                for (d, s) in dst.0.iter_mut().zip(src) {
                    let mixed = f64::from(s) * alpha + f64::from(*d) * (1.0 - alpha);
                    *d = mixed.round() as u8;
                }
            }
        }
    }

    fn stroke_ellipse(&mut self, bounds: Rectangle, color: Color) {
        let pixel = color.to_pixel();
        match self.device_rect(bounds) {
            Some(device) => {
                let (center, rx, ry) = ellipse_params(device);
                imageproc::drawing::draw_hollow_ellipse_mut(&mut self.image, center, rx, ry, pixel);
            }
            None => {
                let points = self.map_all(&Self::ellipse_points(bounds));
                self.outline(&points, pixel);
            }
        }
    }

    fn fill_ellipse(&mut self, bounds: Rectangle, color: Color) {
        let pixel = color.to_pixel();
        match self.device_rect(bounds) {
            Some(device) => {
                let (center, rx, ry) = ellipse_params(device);
                imageproc::drawing::draw_filled_ellipse_mut(&mut self.image, center, rx, ry, pixel);
            }
            None => {
                let points = self.map_all(&Self::ellipse_points(bounds));
                self.fill_device_polygon(&points, pixel);
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[Point], color: Color) {
        let mapped = self.map_all(points);
        self.outline(&mapped, color.to_pixel());
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.is_empty() {
            return;
        }
        let mapped = self.map_all(points);
        self.fill_device_polygon(&mapped, color.to_pixel());
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let step = Transform {
            e: dx,
            f: dy,
            ..Transform::identity()
        };
        self.transform = self.transform.pre_concat(&step);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        let step = Transform {
            a: sx,
            d: sy,
            ..Transform::identity()
        };
        self.transform = self.transform.pre_concat(&step);
    }

    fn rotate(&mut self, degrees: f64) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let step = Transform {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        };
        self.transform = self.transform.pre_concat(&step);
    }

    fn reset_transform(&mut self) {
        self.transform = Transform::identity();
    }
}

fn pixels(points: f64) -> u32 {
    if points.is_finite() {
        points.floor().max(1.0) as u32
    } else {
        1
    }
}

/// `None` when the rectangle rounds to zero pixels in either direction.
fn to_pixel_rect(device: Rectangle) -> Option<Rect> {
    let x0 = device.x.round() as i32;
    let y0 = device.y.round() as i32;
    let x1 = device.right().round() as i32;
    let y1 = device.bottom().round() as i32;
    let width = x1.saturating_sub(x0);
    let height = y1.saturating_sub(y0);
    (width > 0 && height > 0).then(|| Rect::at(x0, y0).of_size(width as u32, height as u32))
}

fn ellipse_params(device: Rectangle) -> ((i32, i32), i32, i32) {
    let center = device.center();
    (
        (center.x.round() as i32, center.y.round() as i32),
        (device.width / 2.0).round() as i32,
        (device.height / 2.0).round() as i32,
    )
}

fn span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Even-odd point-in-polygon test.
fn contains(polygon: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

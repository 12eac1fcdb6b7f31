//! Page-space geometry and the pan/zoom view transform
//!
//! Page space is the pixel grid of the rasterized preview: origin at the
//! top-left corner, y growing downwards. View space is the same plane as drawn
//! on screen, after panning and zooming.

use crate::constants::{MAX_ZOOM, MIN_ZOOM};
use crate::types::CropError;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp into `[0, size.width] x [0, size.height]`
    pub fn clamped(self, size: Size) -> Self {
        Self {
            x: self.x.max(0.0).min(size.width),
            y: self.y.max(0.0).min(size.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned crop rectangle in page space.
///
/// Always satisfies `left < right` and `top < bottom`; constructors return
/// `None` instead of building a degenerate rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "[f64; 4]", into = "[f64; 4]")
)]
pub struct CropRect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl CropRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Option<Self> {
        let finite = [left, top, right, bottom].iter().all(|v| v.is_finite());
        if finite && left < right && top < bottom {
            Some(Self {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Rectangle spanned by two opposite corners, in any order
    pub fn from_corners(a: Point, b: Point) -> Option<Self> {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Same size, moved so its top-left corner sits at `origin`
    pub fn moved_to(&self, origin: Point) -> Self {
        self.translated(origin.x - self.left, origin.y - self.top)
    }

    /// Intersection with `[0, size.width] x [0, size.height]`
    pub fn clipped_to(&self, size: Size) -> Option<Self> {
        Self::new(
            self.left.max(0.0),
            self.top.max(0.0),
            self.right.min(size.width),
            self.bottom.min(size.height),
        )
    }

    /// Move (not resize) the rectangle so it lies inside `size` where it fits
    pub fn shifted_into(&self, size: Size) -> Self {
        let dx = (-self.left).max(0.0).min(size.width - self.right).max(-self.left);
        let dy = (-self.top).max(0.0).min(size.height - self.bottom).max(-self.top);
        self.translated(dx, dy)
    }
}

impl TryFrom<[f64; 4]> for CropRect {
    type Error = CropError;

    fn try_from(edges: [f64; 4]) -> Result<Self, Self::Error> {
        let [left, top, right, bottom] = edges;
        Self::new(left, top, right, bottom).ok_or_else(|| {
            CropError::Config(format!(
                "degenerate rectangle [{left}, {top}, {right}, {bottom}]"
            ))
        })
    }
}

impl From<CropRect> for [f64; 4] {
    fn from(rect: CropRect) -> Self {
        [rect.left, rect.top, rect.right, rect.bottom]
    }
}

/// Pan/zoom mapping between page space and view space.
///
/// `view = pan + page * zoom`, so `pan` is where the page origin lands in
/// view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pan: Point,
    zoom: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pan: Point::default(),
            zoom: 1.0,
        }
    }
}

impl Transform {
    pub fn new(pan: Point, zoom: f64) -> Self {
        Self {
            pan,
            zoom: clamp_zoom(zoom),
        }
    }

    /// Fit `content` inside `viewport`, centered, preserving aspect ratio
    pub fn fit(content: Size, viewport: Size) -> Self {
        if content.is_empty() || viewport.is_empty() {
            return Self::default();
        }
        let zoom = clamp_zoom((viewport.width / content.width).min(viewport.height / content.height));
        let pan = Point::new(
            (viewport.width - content.width * zoom) / 2.0,
            (viewport.height - content.height * zoom) / 2.0,
        );
        Self { pan, zoom }
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn page_to_view(&self, p: Point) -> Point {
        Point::new(self.pan.x + p.x * self.zoom, self.pan.y + p.y * self.zoom)
    }

    pub fn view_to_page(&self, v: Point) -> Point {
        Point::new((v.x - self.pan.x) / self.zoom, (v.y - self.pan.y) / self.zoom)
    }

    /// Convert a view-space length into page units
    pub fn view_len_to_page(&self, len: f64) -> f64 {
        len / self.zoom
    }

    /// Corners (top-left, bottom-right) of a rectangle in view space
    pub fn rect_to_view(&self, rect: &CropRect) -> (Point, Point) {
        (
            self.page_to_view(rect.top_left()),
            self.page_to_view(rect.bottom_right()),
        )
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Zoom by `factor` keeping the page point under `anchor` (view space) fixed
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) {
        let fixed = self.view_to_page(anchor);
        self.zoom = clamp_zoom(self.zoom * factor);
        self.pan = Point::new(anchor.x - fixed.x * self.zoom, anchor.y - fixed.y * self.zoom);
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.max(MIN_ZOOM).min(MAX_ZOOM)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_rejects_degenerate() {
        assert!(CropRect::new(10.0, 10.0, 10.0, 20.0).is_none());
        assert!(CropRect::new(10.0, 20.0, 30.0, 20.0).is_none());
        assert!(CropRect::new(30.0, 10.0, 10.0, 20.0).is_none());
        assert!(CropRect::new(f64::NAN, 0.0, 1.0, 1.0).is_none());
        assert!(CropRect::new(0.0, 0.0, 1.0, 1.0).is_some());
    }

    #[test]
    fn test_from_corners_normalizes() {
        let rect = CropRect::from_corners(Point::new(50.0, 80.0), Point::new(10.0, 20.0)).unwrap();
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 50.0);
        assert_eq!(rect.bottom(), 80.0);
    }

    #[test]
    fn test_clipped_to_bounds() {
        let rect = CropRect::new(-10.0, 5.0, 120.0, 50.0).unwrap();
        let clipped = rect.clipped_to(Size::new(100.0, 100.0)).unwrap();
        assert_eq!(<[f64; 4]>::from(clipped), [0.0, 5.0, 100.0, 50.0]);

        let outside = CropRect::new(150.0, 150.0, 160.0, 160.0).unwrap();
        assert!(outside.clipped_to(Size::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn test_shifted_into_keeps_size() {
        let rect = CropRect::new(90.0, -5.0, 110.0, 15.0).unwrap();
        let shifted = rect.shifted_into(Size::new(100.0, 100.0));
        assert_eq!(<[f64; 4]>::from(shifted), [80.0, 0.0, 100.0, 20.0]);
    }

    #[test]
    fn test_fit_centers_content() {
        let t = Transform::fit(Size::new(100.0, 200.0), Size::new(400.0, 400.0));
        assert_eq!(t.zoom(), 2.0);
        assert_eq!(t.pan(), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_zoom_about_keeps_anchor_fixed() {
        let mut t = Transform::new(Point::new(12.0, -7.0), 1.3);
        let anchor = Point::new(200.0, 150.0);
        let before = t.view_to_page(anchor);
        t.zoom_about(anchor, 1.15);
        let after = t.view_to_page(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }
}

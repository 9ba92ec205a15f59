use fractal_lab_core::Rgb;

/// A point in surface pixel coordinates (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `distance` away along `direction` (radians, clockwise
    /// from +x in screen space).
    #[inline]
    pub fn advance(self, distance: f64, direction: f64) -> Self {
        Self {
            x: self.x + distance * direction.cos(),
            y: self.y + distance * direction.sin(),
        }
    }
}

/// How a single line segment is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgb,
    /// Global alpha in `0.0..=1.0`.
    pub opacity: f64,
    /// Stroke width in pixels.
    pub width: f64,
    /// Radius of the glow halo, tinted with `color`.
    pub glow_radius: f64,
}

/// A 2D target the tree renderer paints into.
///
/// The renderer never creates, resizes, or presents surfaces; the host owns
/// their lifecycle.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill an axis-aligned rectangle with an opaque color.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb);

    /// Stroke a straight segment from `from` to `to`.
    fn stroke_line(&mut self, from: Point, to: Point, style: &StrokeStyle);

    /// `false` when there is nothing to paint into.
    fn has_area(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

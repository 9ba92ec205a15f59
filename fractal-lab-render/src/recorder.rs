use fractal_lab_core::Rgb;

use crate::surface::{Point, StrokeStyle, Surface};

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintCall {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    StrokeLine {
        from: Point,
        to: Point,
        style: StrokeStyle,
    },
}

/// A surface that paints nothing and remembers every call, in order.
///
/// Used for headless inspection of what the renderer would draw.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<PaintCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[PaintCall] {
        &self.calls
    }

    /// Only the stroked segments, in paint order.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point, StrokeStyle)> + '_ {
        self.calls.iter().filter_map(|call| match *call {
            PaintCall::StrokeLine { from, to, style } => Some((from, to, style)),
            PaintCall::FillRect { .. } => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        self.calls.push(PaintCall::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        self.calls.push(PaintCall::StrokeLine {
            from,
            to,
            style: *style,
        });
    }
}

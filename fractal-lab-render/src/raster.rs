//! In-memory RGBA surface with anti-aliased strokes and a soft glow halo.
//!
//! Pixels are stored as straight (non-premultiplied) `f32` RGBA and composited
//! source-over, so thousands of overlapping translucent segments accumulate
//! without 8-bit banding. [`RasterSurface::to_buffer`] quantizes the result.

use rayon::prelude::*;

use fractal_lab_core::Rgb;

use crate::buffer::RenderBuffer;
use crate::surface::{Point, StrokeStyle, Surface};

/// Peak alpha of the glow halo right at the stroke edge.
const GLOW_STRENGTH: f64 = 0.35;

#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    data: Vec<[f32; 4]>,
}

impl RasterSurface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    /// Change dimensions, discarding the contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width as usize * height as usize, [0.0; 4]);
    }

    /// Quantized RGBA at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(quantize(self.data[self.index(x as usize, y as usize)]))
    }

    /// Quantize to an 8-bit RGBA buffer.
    pub fn to_buffer(&self) -> RenderBuffer {
        let mut pixels = vec![0u8; self.data.len() * 4];
        pixels
            .par_chunks_mut(4)
            .zip(self.data.par_iter())
            .for_each(|(pixel, &src)| pixel.copy_from_slice(&quantize(src)));
        RenderBuffer {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    /// Clamp `[lo, hi)` in pixel space to `0..limit`.
    fn span(lo: f64, hi: f64, limit: u32) -> Option<(usize, usize)> {
        let start = lo.floor().max(0.0);
        let end = hi.ceil().min(limit as f64);
        if !(start < end) {
            return None;
        }
        Some((start as usize, end as usize))
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::span(x.round(), (x + width).round(), self.width),
            Self::span(y.round(), (y + height).round(), self.height),
        ) else {
            return;
        };
        let [r, g, b] = color.to_unit();
        for py in y0..y1 {
            let row = self.index(x0, py)..self.index(x1, py);
            self.data[row].fill([r, g, b, 1.0]);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
            return;
        }
        let half = (style.width / 2.0).max(0.0);
        let glow = style.glow_radius.max(0.0);
        let opacity = style.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }

        let reach = half + glow + 1.0;
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::span(from.x.min(to.x) - reach, from.x.max(to.x) + reach, self.width),
            Self::span(from.y.min(to.y) - reach, from.y.max(to.y) + reach, self.height),
        ) else {
            return;
        };

        let src = style.color.to_unit();
        for py in y0..y1 {
            for px in x0..x1 {
                let center = Point::new(px as f64 + 0.5, py as f64 + 0.5);
                let d = distance_to_segment(center, from, to);

                let core = (half + 0.5 - d).clamp(0.0, 1.0);
                let halo = if glow > 0.0 {
                    let t = ((d - half).max(0.0) / glow).min(1.0);
                    GLOW_STRENGTH * (1.0 - t) * (1.0 - t)
                } else {
                    0.0
                };
                let coverage = core + (1.0 - core) * halo;
                if coverage <= 0.0 {
                    continue;
                }

                let idx = self.index(px, py);
                blend(&mut self.data[idx], src, (coverage * opacity) as f32);
            }
        }
    }
}

/// Euclidean distance from `p` to the closed segment `a`–`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// Source-over composite of `src` at alpha `a` onto straight-alpha `dst`.
#[inline]
fn blend(dst: &mut [f32; 4], src: [f32; 3], a: f32) {
    let keep = dst[3] * (1.0 - a);
    let out_a = a + keep;
    if out_a <= 0.0 {
        return;
    }
    for c in 0..3 {
        dst[c] = (src[c] * a + dst[c] * keep) / out_a;
    }
    dst[3] = out_a;
}

#[inline]
fn quantize(px: [f32; 4]) -> [u8; 4] {
    px.map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(color: Rgb, width: f64, glow: f64) -> StrokeStyle {
        StrokeStyle {
            color,
            opacity: 1.0,
            width,
            glow_radius: glow,
        }
    }

    #[test]
    fn new_surface_is_transparent() {
        let s = RasterSurface::new(3, 3);
        assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(s.pixel(3, 1), None);
    }

    #[test]
    fn fill_rect_covers_region_only() {
        let mut s = RasterSurface::new(8, 8);
        s.fill_rect(2.0, 2.0, 3.0, 3.0, Rgb::new(255, 0, 0));
        assert_eq!(s.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(s.pixel(4, 4), Some([255, 0, 0, 255]));
        assert_eq!(s.pixel(5, 5), Some([0, 0, 0, 0]));
        assert_eq!(s.pixel(1, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn fill_rect_outside_bounds_is_clipped() {
        let mut s = RasterSurface::new(4, 4);
        s.fill_rect(-10.0, -10.0, 100.0, 100.0, Rgb::new(1, 2, 3));
        assert_eq!(s.pixel(0, 0), Some([1, 2, 3, 255]));
        assert_eq!(s.pixel(3, 3), Some([1, 2, 3, 255]));
        s.fill_rect(10.0, 10.0, 5.0, 5.0, Rgb::new(9, 9, 9));
    }

    #[test]
    fn opaque_stroke_paints_its_color_on_the_centerline() {
        let mut s = RasterSurface::new(20, 20);
        s.fill_rect(0.0, 0.0, 20.0, 20.0, Rgb::new(0, 0, 0));
        s.stroke_line(
            Point::new(10.0, 2.0),
            Point::new(10.0, 18.0),
            &style(Rgb::new(0, 255, 0), 4.0, 0.0),
        );
        assert_eq!(s.pixel(10, 10), Some([0, 255, 0, 255]));
        assert_eq!(s.pixel(2, 10), Some([0, 0, 0, 255]));
    }

    #[test]
    fn glow_reaches_past_the_stroke_but_not_past_its_radius() {
        let mut s = RasterSurface::new(40, 40);
        s.fill_rect(0.0, 0.0, 40.0, 40.0, Rgb::new(0, 0, 0));
        s.stroke_line(
            Point::new(20.0, 5.0),
            Point::new(20.0, 35.0),
            &style(Rgb::new(255, 255, 255), 2.0, 8.0),
        );
        let near = s.pixel(24, 20).unwrap();
        assert!(near[0] > 0 && near[0] < 255, "halo should tint nearby pixels");
        assert_eq!(s.pixel(32, 20), Some([0, 0, 0, 255]));
    }

    #[test]
    fn translucent_stroke_blends_with_background() {
        let mut s = RasterSurface::new(10, 10);
        s.fill_rect(0.0, 0.0, 10.0, 10.0, Rgb::new(0, 0, 0));
        let mut st = style(Rgb::new(200, 200, 200), 4.0, 0.0);
        st.opacity = 0.5;
        s.stroke_line(Point::new(5.0, 0.0), Point::new(5.0, 10.0), &st);
        assert_eq!(s.pixel(5, 5), Some([100, 100, 100, 255]));
    }

    #[test]
    fn degenerate_and_offscreen_strokes_do_not_panic() {
        let mut s = RasterSurface::new(10, 10);
        let st = style(Rgb::new(255, 0, 0), 1.0, 3.0);
        s.stroke_line(Point::new(5.0, 5.0), Point::new(5.0, 5.0), &st);
        s.stroke_line(Point::new(-100.0, -100.0), Point::new(-50.0, -60.0), &st);
        s.stroke_line(Point::new(f64::NAN, 0.0), Point::new(1.0, 1.0), &st);
        assert!(s.pixel(5, 5).unwrap()[3] > 0);
    }

    #[test]
    fn to_buffer_matches_pixels_and_resize_clears() {
        let mut s = RasterSurface::new(5, 4);
        s.fill_rect(0.0, 0.0, 5.0, 4.0, Rgb::new(10, 20, 30));
        let buf = s.to_buffer();
        assert_eq!(buf.width, 5);
        assert_eq!(buf.height, 4);
        assert_eq!(buf.pixel(4, 3), Some([10, 20, 30, 255]));

        s.resize(2, 2);
        assert_eq!(s.width(), 2);
        assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(s.to_buffer().pixels.len(), 16);
    }

    #[test]
    fn distance_to_segment_cases() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Point::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Point::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Point::new(2.0, 0.0), a, a), 2.0);
    }
}

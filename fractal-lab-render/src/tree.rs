use std::time::{Duration, Instant};

use tracing::debug;

use fractal_lab_core::constants::{
    ALPHA_REDUCTION, BACKGROUND_COLOR, GLOW_BLUR_BASE, GLOW_BLUR_MULTIPLIER,
    INITIAL_DIRECTION, INITIAL_LENGTH_DIVISOR, LINE_WIDTH_MULTIPLIER, MIN_LINE_WIDTH,
    TREE_BASE_OFFSET,
};
use fractal_lab_core::{FractalParameters, Rgb};

use crate::surface::{Point, StrokeStyle, Surface};

// ---------------------------------------------------------------------------
// Branch geometry
// ---------------------------------------------------------------------------

/// One branch to draw: where it starts, how long it is, where it points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
    pub origin: Point,
    pub length: f64,
    /// Radians, clockwise from +x in screen space.
    pub direction: f64,
    pub level: u32,
}

impl Branch {
    /// The trunk for a `width`×`height` surface: bottom-centre, pointing up,
    /// one sixth of the shorter side long.
    pub fn root(width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self {
            origin: Point::new(w / 2.0, h - TREE_BASE_OFFSET),
            length: w.min(h) / INITIAL_LENGTH_DIVISOR,
            direction: INITIAL_DIRECTION,
            level: 0,
        }
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.origin.advance(self.length, self.direction)
    }

    /// The two children, left (counter-clockwise) first.
    #[inline]
    fn children(&self, angle_rad: f64, scale_factor: f64) -> [Branch; 2] {
        let origin = self.end();
        let length = self.length * scale_factor;
        let level = self.level + 1;
        [
            Branch {
                origin,
                length,
                direction: self.direction - angle_rad,
                level,
            },
            Branch {
                origin,
                length,
                direction: self.direction + angle_rad,
                level,
            },
        ]
    }
}

// ---------------------------------------------------------------------------
// Per-level styling
// ---------------------------------------------------------------------------

/// Fraction of the way from root to the (never drawn) level `depth`.
#[inline]
fn depth_fraction(level: u32, depth: u32) -> f64 {
    level as f64 / depth as f64
}

/// Gradient color for `level`. Level 0 is exactly `color_start`; the deepest
/// drawn level stops one step short of `color_end`.
pub fn branch_color(params: &FractalParameters, level: u32) -> Rgb {
    params
        .color_start
        .lerp(params.color_end, depth_fraction(level, params.depth))
}

/// Fades from fully opaque at the root to 70% at `depth`.
pub fn branch_opacity(level: u32, depth: u32) -> f64 {
    1.0 - depth_fraction(level, depth) * ALPHA_REDUCTION
}

/// Thins with each level, never below half a pixel.
pub fn branch_width(level: u32, depth: u32) -> f64 {
    (depth as f64 - level as f64 * LINE_WIDTH_MULTIPLIER).max(MIN_LINE_WIDTH)
}

/// Branches near the root glow more.
pub fn branch_glow(level: u32, depth: u32) -> f64 {
    GLOW_BLUR_BASE + (depth as f64 - level as f64) * GLOW_BLUR_MULTIPLIER
}

pub fn branch_style(params: &FractalParameters, level: u32) -> StrokeStyle {
    StrokeStyle {
        color: branch_color(params, level),
        opacity: branch_opacity(level, params.depth),
        width: branch_width(level, params.depth),
        glow_radius: branch_glow(level, params.depth),
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Paint `branch` and its whole subtree in pre-order (branch, left subtree,
/// right subtree). Returns the number of segments painted.
///
/// Branches at `level >= params.depth` are not drawn.
pub fn draw_branch<S: Surface + ?Sized>(
    surface: &mut S,
    params: &FractalParameters,
    branch: Branch,
) -> usize {
    draw_recursive(surface, params, params.branch_angle_radians(), branch)
}

fn draw_recursive<S: Surface + ?Sized>(
    surface: &mut S,
    params: &FractalParameters,
    angle_rad: f64,
    branch: Branch,
) -> usize {
    if branch.level >= params.depth {
        return 0;
    }

    let style = branch_style(params, branch.level);
    surface.stroke_line(branch.origin, branch.end(), &style);

    let [left, right] = branch.children(angle_rad, params.scale_factor);
    1 + draw_recursive(surface, params, angle_rad, left)
        + draw_recursive(surface, params, angle_rad, right)
}

// ---------------------------------------------------------------------------
// Full-frame render
// ---------------------------------------------------------------------------

/// Summary of one [`render_tree`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub segments: usize,
    pub elapsed: Duration,
    pub width: u32,
    pub height: u32,
}

/// Clear `surface` to the background color and draw the whole tree.
///
/// Deterministic: the same parameters on a surface of the same size always
/// issue the same paint calls in the same order. A zero-area surface is left
/// untouched and reports zero segments.
pub fn render_tree<S: Surface + ?Sized>(surface: &mut S, params: &FractalParameters) -> RenderStats {
    let start = Instant::now();
    let (width, height) = (surface.width(), surface.height());

    if !surface.has_area() {
        debug!(width, height, "Skipping render on empty surface");
        return RenderStats {
            segments: 0,
            elapsed: start.elapsed(),
            width,
            height,
        };
    }

    surface.fill_rect(0.0, 0.0, width as f64, height as f64, BACKGROUND_COLOR);
    let segments = draw_branch(surface, params, Branch::root(width, height));

    let elapsed = start.elapsed();
    debug!(
        segments,
        width,
        height,
        depth = params.depth,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Tree render complete"
    );

    RenderStats {
        segments,
        elapsed,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::recorder::{PaintCall, RecordingSurface};

    fn params_with_depth(depth: u32) -> FractalParameters {
        FractalParameters {
            depth,
            ..FractalParameters::default()
        }
    }

    #[test]
    fn root_branch_for_800_by_600() {
        let root = Branch::root(800, 600);
        assert_eq!(root.origin, Point::new(400.0, 550.0));
        assert_eq!(root.length, 100.0);
        assert_eq!(root.direction, -FRAC_PI_2);
        let end = root.end();
        assert!((end.x - 400.0).abs() < 1e-9);
        assert!((end.y - 450.0).abs() < 1e-9);
    }

    #[test]
    fn depth_five_draws_thirty_one_segments() {
        let params = params_with_depth(5);
        let mut surface = RecordingSurface::new(800, 600);
        let drawn = draw_branch(&mut surface, &params, Branch::root(800, 600));
        assert_eq!(drawn, 31);
        assert_eq!(surface.segments().count(), 31);
    }

    #[test]
    fn branch_at_depth_draws_nothing() {
        let params = params_with_depth(5);
        let mut surface = RecordingSurface::new(100, 100);
        let branch = Branch {
            level: 5,
            ..Branch::root(100, 100)
        };
        assert_eq!(draw_branch(&mut surface, &params, branch), 0);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn root_color_is_exact_and_deepest_falls_short_of_end() {
        let params = FractalParameters::default();
        assert_eq!(branch_color(&params, 0), params.color_start);
        let deepest = branch_color(&params, params.depth - 1);
        assert_ne!(deepest, params.color_end);
        // 39FF14 -> FF4500 at t = 0.9.
        assert_eq!(deepest, Rgb::new(0xEB, 0x58, 0x02));
    }

    #[test]
    fn style_constants_match_reference_values() {
        assert_eq!(branch_opacity(0, 10), 1.0);
        assert!((branch_opacity(5, 10) - 0.85).abs() < 1e-12);
        assert_eq!(branch_width(0, 10), 10.0);
        assert!((branch_width(3, 10) - 7.6).abs() < 1e-12);
        assert!((branch_width(14, 15) - 3.8).abs() < 1e-9);
        assert_eq!(branch_width(9, 5), 0.5);
        assert_eq!(branch_glow(0, 10), 35.0);
        assert_eq!(branch_glow(9, 10), 17.0);
    }

    #[test]
    fn render_clears_then_draws_in_preorder() {
        let params = params_with_depth(5);
        let mut surface = RecordingSurface::new(800, 600);
        let stats = render_tree(&mut surface, &params);
        assert_eq!(stats.segments, 31);

        let calls = surface.calls();
        assert!(matches!(
            calls[0],
            PaintCall::FillRect { color, width, height, .. }
                if color == BACKGROUND_COLOR && width == 800.0 && height == 600.0
        ));

        // Glow encodes level as 15 + (5 - level) * 2. Pre-order walks the
        // leftmost path to the leaves before backing up.
        let levels: Vec<u32> = surface
            .segments()
            .map(|(_, _, style)| 5 - ((style.glow_radius - 15.0) / 2.0).round() as u32)
            .collect();
        assert_eq!(levels.len(), 31);
        assert_eq!(&levels[..9], &[0, 1, 2, 3, 4, 4, 3, 4, 4]);
        assert_eq!(levels.iter().filter(|&&l| l == 4).count(), 16);
    }

    #[test]
    fn left_child_turns_counter_clockwise() {
        let params = params_with_depth(5);
        let mut surface = RecordingSurface::new(800, 600);
        render_tree(&mut surface, &params);
        let segs: Vec<_> = surface.segments().collect();
        let (_, root_end, _) = segs[0];
        let (left_start, left_end, _) = segs[1];
        assert_eq!(left_start, root_end);
        // Up-and-left: x decreases from the trunk top.
        assert!(left_end.x < root_end.x);
        assert!(left_end.y < root_end.y);
    }

    #[test]
    fn empty_surface_is_a_no_op() {
        let mut surface = RecordingSurface::new(0, 600);
        let stats = render_tree(&mut surface, &FractalParameters::default());
        assert_eq!(stats.segments, 0);
        assert!(surface.calls().is_empty());
    }
}

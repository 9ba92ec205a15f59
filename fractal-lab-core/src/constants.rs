//! Parameter constraints and rendering constants shared by every crate.
//!
//! The width, glow, and alpha constants are tuned for visual parity with
//! previously shared links; changing them changes how every tree looks.

use std::f64::consts::FRAC_PI_2;

use crate::color::Rgb;

// ---------------------------------------------------------------------------
// Parameter constraints
// ---------------------------------------------------------------------------

/// Inclusive range, slider step, and default for one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange<T> {
    pub min: T,
    pub max: T,
    pub step: T,
    pub default: T,
}

impl<T: PartialOrd + Copy> ParamRange<T> {
    /// `true` when `value` lies within `min..=max`. NaN is never contained.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Branch angle in degrees.
pub const ANGLE: ParamRange<f64> = ParamRange {
    min: 5.0,
    max: 60.0,
    step: 0.5,
    default: 25.0,
};

/// Per-level length shrink ratio.
pub const SCALE: ParamRange<f64> = ParamRange {
    min: 0.5,
    max: 0.9,
    step: 0.01,
    default: 0.7,
};

/// Recursion depth (exclusive upper bound on drawn levels).
pub const DEPTH: ParamRange<u32> = ParamRange {
    min: 5,
    max: 15,
    step: 1,
    default: 10,
};

pub const DEFAULT_COLOR_START: Rgb = Rgb::new(0x39, 0xFF, 0x14);
pub const DEFAULT_COLOR_END: Rgb = Rgb::new(0xFF, 0x45, 0x00);

// ---------------------------------------------------------------------------
// Canvas rendering
// ---------------------------------------------------------------------------

pub const BACKGROUND_COLOR: Rgb = Rgb::new(0x0A, 0x0A, 0x0A);
/// Distance from the bottom edge to the root of the trunk, in pixels.
pub const TREE_BASE_OFFSET: f64 = 50.0;
/// Root length is `min(width, height) / INITIAL_LENGTH_DIVISOR`.
pub const INITIAL_LENGTH_DIVISOR: f64 = 6.0;
/// Straight up in screen space (y grows downward).
pub const INITIAL_DIRECTION: f64 = -FRAC_PI_2;
pub const MIN_LINE_WIDTH: f64 = 0.5;
pub const LINE_WIDTH_MULTIPLIER: f64 = 0.8;
pub const GLOW_BLUR_BASE: f64 = 15.0;
pub const GLOW_BLUR_MULTIPLIER: f64 = 2.0;
/// Opacity lost between the root and the deepest level.
pub const ALPHA_REDUCTION: f64 = 0.3;

/// Renders slower than this are logged as a warning.
pub const SLOW_RENDER_MS: u64 = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_lie_within_ranges() {
        assert!(ANGLE.contains(ANGLE.default));
        assert!(SCALE.contains(SCALE.default));
        assert!(DEPTH.contains(DEPTH.default));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(ANGLE.contains(5.0));
        assert!(ANGLE.contains(60.0));
        assert!(!ANGLE.contains(60.5));
        assert!(!DEPTH.contains(4));
        assert!(DEPTH.contains(15));
        assert!(!DEPTH.contains(16));
    }

    #[test]
    fn nan_is_never_in_range() {
        assert!(!SCALE.contains(f64::NAN));
    }
}

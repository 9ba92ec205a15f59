use crate::color::Rgb;
use crate::constants::{self, ParamRange};
use crate::error::CoreError;

/// The five values that fully determine a fractal tree.
///
/// A plain `Copy` snapshot: the renderer takes one per frame and never
/// observes later mutations of the store it came from. Deserialization runs
/// through [`FractalParameters::new`] so parameter files cannot smuggle in
/// out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FractalParameters {
    /// Angular deviation of each child from its parent, in degrees.
    pub branch_angle_degrees: f64,
    /// Fraction of the parent's length kept by each child.
    pub scale_factor: f64,
    /// Number of levels drawn; level `depth` itself is never drawn.
    pub depth: u32,
    /// Color of the root branch.
    pub color_start: Rgb,
    /// Color approached by the deepest branches.
    pub color_end: Rgb,
}

impl<'de> serde::Deserialize<'de> for FractalParameters {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            branch_angle_degrees: f64,
            scale_factor: f64,
            depth: u32,
            color_start: Rgb,
            color_end: Rgb,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(
            raw.branch_angle_degrees,
            raw.scale_factor,
            raw.depth,
            raw.color_start,
            raw.color_end,
        )
        .map_err(serde::de::Error::custom)
    }
}

impl FractalParameters {
    pub fn new(
        branch_angle_degrees: f64,
        scale_factor: f64,
        depth: u32,
        color_start: Rgb,
        color_end: Rgb,
    ) -> crate::Result<Self> {
        check_range("branch angle", branch_angle_degrees, &constants::ANGLE)?;
        check_range("scale factor", scale_factor, &constants::SCALE)?;
        if !constants::DEPTH.contains(depth) {
            return Err(CoreError::OutOfRange {
                field: "depth",
                value: depth as f64,
                min: constants::DEPTH.min as f64,
                max: constants::DEPTH.max as f64,
            });
        }
        Ok(Self {
            branch_angle_degrees,
            scale_factor,
            depth,
            color_start,
            color_end,
        })
    }

    /// Branch angle converted to radians.
    #[inline]
    pub fn branch_angle_radians(&self) -> f64 {
        self.branch_angle_degrees.to_radians()
    }

    /// Number of segments a full render paints: `2^depth - 1`.
    #[inline]
    pub fn segment_count(&self) -> usize {
        (1usize << self.depth) - 1
    }
}

impl Default for FractalParameters {
    fn default() -> Self {
        Self {
            branch_angle_degrees: constants::ANGLE.default,
            scale_factor: constants::SCALE.default,
            depth: constants::DEPTH.default,
            color_start: constants::DEFAULT_COLOR_START,
            color_end: constants::DEFAULT_COLOR_END,
        }
    }
}

fn check_range(field: &'static str, value: f64, range: &ParamRange<f64>) -> crate::Result<()> {
    if range.contains(value) {
        Ok(())
    } else {
        Err(CoreError::OutOfRange {
            field,
            value,
            min: range.min,
            max: range.max,
        })
    }
}

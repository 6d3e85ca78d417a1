//! Height-to-color ramp.

use crate::cancel::{CancelToken, Cancelled};
use crate::heightmap::HeightGrid;

/// Linear RGB, each channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From 8-bit channels.
    pub fn from_u8(rgb: [u8; 3]) -> Self {
        Self::new(
            f32::from(rgb[0]) / 255.0,
            f32::from(rgb[1]) / 255.0,
            f32::from(rgb[2]) / 255.0,
        )
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// A ramp entry: heights at or above `height` start from `color`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStep {
    pub height: f32,
    pub color: Rgb,
}

impl ColorStep {
    pub const fn new(height: f32, color: Rgb) -> Self {
        Self { height, color }
    }
}

/// Color for `height` on a ramp sorted by ascending height.
///
/// Below the first step the first color is returned as is. Between two steps
/// the colors blend linearly. At a step's exact height, or at or above the
/// last step, that step's color is returned unblended. An empty ramp yields
/// black.
pub fn calc_color(steps: &[ColorStep], height: f32) -> Rgb {
    let Some(first) = steps.first() else {
        return Rgb::BLACK;
    };
    if height < first.height {
        return first.color;
    }

    // Last step whose threshold is at or below `height`.
    let i = steps
        .partition_point(|step| step.height <= height)
        .saturating_sub(1);
    let low = steps[i];
    let Some(high) = steps.get(i + 1) else {
        return low.color;
    };
    if height == low.height {
        return low.color;
    }

    let t = (height - low.height) / (high.height - low.height);
    low.color.lerp(high.color, t)
}

/// Ramp colors for every sample of a height grid, in the grid's order.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorGrid {
    size_x: u32,
    colors: Vec<Rgb>,
}

impl ColorGrid {
    #[inline]
    pub fn get(&self, x: u32, z: u32) -> Rgb {
        self.colors[z as usize * (self.size_x as usize + 1) + x as usize]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

/// Apply [`calc_color`] to every height sample. Checks `cancel` once per row.
pub fn build_color_grid(
    steps: &[ColorStep],
    heights: &HeightGrid,
    cancel: &CancelToken,
) -> Result<ColorGrid, Cancelled> {
    let row = heights.size_x() as usize + 1;
    let mut colors = Vec::with_capacity(heights.samples().len());
    for samples in heights.samples().chunks(row) {
        cancel.check()?;
        colors.extend(samples.iter().map(|&h| calc_color(steps, h)));
    }
    Ok(ColorGrid {
        size_x: heights.size_x(),
        colors,
    })
}

//! Programmable shading seam
//!
//! The rasterizer only knows about the fragment half of a shader. The vertex
//! half (turning a face corner into a clip-space position and filling the
//! varyings) is driven by the caller before each triangle is submitted.

use super::math::{Vec2, Vec3};
use super::types::{Color, Image};

/// Per-pixel shading logic.
///
/// `fragment` may be called concurrently for different pixels of the same
/// triangle, hence `&self` and the `Sync` bound.
pub trait Shader: Sync {
    /// Shade one pixel from its perspective-corrected barycentric weights.
    ///
    /// Return `None` to discard the fragment: neither the color nor the
    /// depth buffer is written.
    fn fragment(&self, bar: Vec3) -> Option<Color>;
}

/// Nearest-texel lookup at normalized `uv`
pub fn sample2d(img: &Image, uv: Vec2) -> Color {
    img.sample(uv.x(), uv.y())
}

/// Fills every covered pixel with one color
#[derive(Debug, Clone, Copy)]
pub struct FlatShader {
    pub color: Color,
}

impl Shader for FlatShader {
    fn fragment(&self, _bar: Vec3) -> Option<Color> {
        Some(self.color)
    }
}

//! Software rasterization pipeline
//!
//! Features:
//! - Const-generic vectors and matrices with cofactor-expansion inverse
//! - Look-at / pinhole projection / viewport transforms
//! - Perspective-correct barycentric interpolation
//! - Z-buffer with strictly-closer-wins depth test
//! - Pluggable fragment shaders, rows shaded in parallel

mod math;
mod matrix;
mod render;
mod shader;
mod transform;
mod types;

pub use math::*;
pub use matrix::*;
pub use render::*;
pub use shader::*;
pub use transform::*;
pub use types::*;

//! Bonnie GL: a small programmable software rasterizer
//!
//! Everything runs on the CPU:
//! - Fixed-size vector/matrix math with cofactor-expansion inverse
//! - Look-at camera, pinhole projection and viewport transforms
//! - Perspective-correct triangle rasterization with a depth buffer
//! - Pluggable fragment shaders
//! - OBJ models with diffuse, normal and specular maps

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod model;
pub mod rasterizer;
pub mod shading;

pub use error::{RenderError, Result};

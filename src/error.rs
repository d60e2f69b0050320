//! Error types for loading models, textures and scene files.
//!
//! The rasterizer core itself never fails; everything here comes from the
//! file-facing layers around it.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Scene file could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Scene could not be written as RON.
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// Image decode or encode failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Malformed OBJ record.
    #[error("OBJ line {line}: {message}")]
    Obj { line: usize, message: String },

    /// Model file had no triangles.
    #[error("model has no faces")]
    Empty,

    /// Pixel buffer does not match its stated size.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, RenderError>;

//! Camera, projection and viewport matrices
//!
//! The three matrices are built once per frame into a [`FrameTransforms`]
//! and handed by reference to the vertex stage and the rasterizer.

use super::math::{cross, Vec3};
use super::matrix::Mat4;

/// World-to-eye matrix with the eye at the origin looking down +Z.
///
/// `up` must not be parallel to `center - eye`.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let z = (center - eye).normalized();
    let x = cross(up, z).normalized();
    let y = cross(z, x).normalized();

    let rotation = Mat4::from([
        [x.x(), x.y(), x.z(), 0.0],
        [y.x(), y.y(), y.z(), 0.0],
        [z.x(), z.y(), z.z(), 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    let translation = Mat4::from([
        [1.0, 0.0, 0.0, -eye.x()],
        [0.0, 1.0, 0.0, -eye.y()],
        [0.0, 0.0, 1.0, -eye.z()],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    rotation * translation
}

/// Pinhole projection with focal distance `f`.
///
/// Flips Y to match the raster's top-down rows and passes Z through so it
/// can be interpolated as depth.
pub fn projection(f: f64) -> Mat4 {
    Mat4::from([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, -1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, -1.0 / f, 0.0],
    ])
}

/// Map the [-1, 1] square onto the pixel rectangle `[x, x+w] x [y, y+h]`
pub fn viewport(x: f64, y: f64, w: f64, h: f64) -> Mat4 {
    Mat4::from([
        [w / 2.0, 0.0, 0.0, x + w / 2.0],
        [0.0, h / 2.0, 0.0, y + h / 2.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Look-at camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self { eye, center, up }
    }

    pub fn view(&self) -> Mat4 {
        look_at(self.eye, self.center, self.up)
    }

    /// Eye-to-target distance, used as the projection's focal distance
    pub fn distance(&self) -> f64 {
        (self.eye - self.center).norm()
    }
}

/// Pixel rectangle the clip-space square lands on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport covering a whole `width` x `height` raster
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    pub fn matrix(&self) -> Mat4 {
        viewport(self.x, self.y, self.width, self.height)
    }
}

/// Per-frame transform state, read-only while the frame is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub model_view: Mat4,
    pub projection: Mat4,
    pub viewport: Mat4,
}

impl FrameTransforms {
    pub fn new(camera: &Camera, viewport: &Viewport) -> Self {
        let frame = Self {
            model_view: camera.view(),
            projection: projection(camera.distance()),
            viewport: viewport.matrix(),
        };
        log::debug!(
            "Frame setup: eye ({}) center ({}) viewport {}x{} at ({}, {})",
            camera.eye,
            camera.center,
            viewport.width,
            viewport.height,
            viewport.x,
            viewport.y
        );
        frame
    }

    /// Identity model-view and projection; clip space equals NDC
    pub fn screen_space(viewport: &Viewport) -> Self {
        Self {
            model_view: Mat4::identity(),
            projection: Mat4::identity(),
            viewport: viewport.matrix(),
        }
    }
}

//! Core rendering functions
//! Triangle scan with perspective-correct interpolation and depth testing

use rayon::prelude::*;

use super::math::{embed, proj, Vec2, Vec3, Vec4};
use super::matrix::Mat3;
use super::shader::Shader;
use super::transform::FrameTransforms;
use super::types::Image;

/// Triangles whose doubled screen area is below this are not drawn
pub const DEGENERATE_AREA: f64 = 1e-3;

/// Nearest depth seen so far, one entry per pixel
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl DepthBuffer {
    /// Every entry starts at the farthest possible depth
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![f64::MAX; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }
}

/// Inclusive pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelBox {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
}

/// Integer pixels inside the triangle's screen AABB, clamped to the raster
fn bounding_box(tri: &[Vec2; 3], width: usize, height: usize) -> Option<PixelBox> {
    if width == 0 || height == 0 {
        return None;
    }

    let mut lo = [f64::MAX; 2];
    let mut hi = [f64::MIN; 2];
    for v in tri {
        for axis in 0..2 {
            lo[axis] = lo[axis].min(v[axis]);
            hi[axis] = hi[axis].max(v[axis]);
        }
    }

    let limits = [(width - 1) as f64, (height - 1) as f64];
    let mut range = [(0usize, 0usize); 2];
    for axis in 0..2 {
        if !lo[axis].is_finite() || !hi[axis].is_finite() {
            return None;
        }
        let first = lo[axis].ceil().max(0.0);
        let last = hi[axis].floor().min(limits[axis]);
        if first > last {
            return None;
        }
        range[axis] = (first as usize, last as usize);
    }

    Some(PixelBox {
        x0: range[0].0,
        x1: range[0].1,
        y0: range[1].0,
        y1: range[1].1,
    })
}

/// Triangle corners as homogeneous rows; its determinant is twice the signed area
fn screen_matrix(tri: &[Vec2; 3]) -> Mat3 {
    Mat3::from_rows([embed(tri[0], 1.0), embed(tri[1], 1.0), embed(tri[2], 1.0)])
}

/// Barycentric weights of `p` with respect to the screen triangle `tri`.
///
/// A degenerate triangle yields `(-1, 1, 1)`, which every containment check
/// rejects.
pub fn barycentric(tri: &[Vec2; 3], p: Vec2) -> Vec3 {
    let abc = screen_matrix(tri);
    if abc.det().abs() < DEGENERATE_AREA {
        return Vec3::new(-1.0, 1.0, 1.0);
    }
    abc.invert_transpose() * embed::<3, 2>(p, 1.0)
}

/// Turn screen-linear weights into clip-space weights.
///
/// Each weight is divided by its vertex's clip W and the result renormalized
/// to sum to one.
pub fn perspective_correct(bar: Vec3, w: Vec3) -> Vec3 {
    let bc = Vec3::new(bar.x() / w.x(), bar.y() / w.y(), bar.z() / w.z());
    bc / bc.sum()
}

/// Rasterize one clip-space triangle into `target` and `depth`.
///
/// Pixels whose interpolated clip Z is strictly closer than the stored depth
/// are handed to `shader`; ties keep the existing pixel. Rows of the bounding
/// box are shaded in parallel, each row by a single worker.
///
/// Panics if `target` and `depth` differ in size.
pub fn rasterize_triangle(
    frame: &FrameTransforms,
    clip: &[Vec4; 3],
    shader: &dyn Shader,
    target: &mut Image,
    depth: &mut DepthBuffer,
) {
    assert!(
        target.width() == depth.width && target.height() == depth.height,
        "render target is {}x{} but depth buffer is {}x{}",
        target.width(),
        target.height(),
        depth.width,
        depth.height
    );

    if clip.iter().any(|v| !v.w().is_finite() || v.w().abs() < f64::EPSILON) {
        log::trace!("Skipping triangle with degenerate clip w");
        return;
    }

    // Screen coordinates before and after the perspective divide
    let pre_divide = clip.map(|v| frame.viewport * v);
    let screen: [Vec2; 3] = pre_divide.map(|v| proj(v / v.w()));

    let abc = screen_matrix(&screen);
    if abc.det().abs() < DEGENERATE_AREA {
        log::trace!("Skipping degenerate triangle");
        return;
    }

    let Some(bbox) = bounding_box(&screen, target.width(), target.height()) else {
        return;
    };

    let to_bar = abc.invert_transpose();
    let w = Vec3::new(pre_divide[0].w(), pre_divide[1].w(), pre_divide[2].w());
    let z = Vec3::new(clip[0].z(), clip[1].z(), clip[2].z());

    let width = target.width();
    let rows = bbox.y0 * width..(bbox.y1 + 1) * width;

    target.pixels_mut()[rows.clone()]
        .par_chunks_mut(width)
        .zip(depth.values[rows].par_chunks_mut(width))
        .enumerate()
        .for_each(|(row, (pixels, depths))| {
            let y = (bbox.y0 + row) as f64;
            for x in bbox.x0..=bbox.x1 {
                // Sample point is the integer pixel coordinate, not its center
                let bar = to_bar * Vec3::new(x as f64, y, 1.0);
                if bar.x() < 0.0 || bar.y() < 0.0 || bar.z() < 0.0 {
                    continue;
                }

                let bar_clip = perspective_correct(bar, w);
                let frag_depth = z * bar_clip;
                if !(frag_depth < depths[x]) {
                    continue;
                }

                // The shader can discard the fragment
                let Some(color) = shader.fragment(bar_clip) else {
                    continue;
                };

                depths[x] = frag_depth;
                pixels[x] = color;
            }
        });
}

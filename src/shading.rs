//! Tangent-space normal mapping shader
//!
//! Diffuse + specular lighting with a small ambient floor. The vertex stage
//! fills per-triangle varyings; the fragment stage interpolates them with the
//! rasterizer's perspective-corrected weights.

use serde::{Deserialize, Serialize};

use crate::model::Model;
use crate::rasterizer::{
    embed, proj, rasterize_triangle, sample2d, Color, DepthBuffer, FrameTransforms, Image, Mat3,
    Mat4, Matrix, Shader, Vec3, Vec4,
};

/// Light intensity parameters applied per color channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    /// Added to every channel before clamping
    pub ambient: f64,
    /// Upper clamp for a channel
    pub max_channel: f64,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 10.0,
            max_channel: 255.0,
        }
    }
}

pub struct NormalMapShader<'a> {
    model: &'a Model,
    model_view: Mat4,
    projection: Mat4,
    /// Inverse transpose of the model-view, for normals
    normal_matrix: Mat4,
    /// Light direction in view space
    light: Vec3,
    lighting: Lighting,
    // Per-vertex data as columns, written by vertex(), read by fragment()
    varying_uv: Matrix<2, 3>,
    varying_nrm: Mat3,
    view_tri: Mat3,
}

impl<'a> NormalMapShader<'a> {
    pub fn new(model: &'a Model, frame: &FrameTransforms, light_dir: Vec3, lighting: Lighting) -> Self {
        let light = proj::<3, 4>(frame.model_view * embed::<4, 3>(light_dir, 0.0)).normalized();

        Self {
            model,
            model_view: frame.model_view,
            projection: frame.projection,
            normal_matrix: frame.model_view.invert_transpose(),
            light,
            lighting,
            varying_uv: Matrix::zero(),
            varying_nrm: Mat3::zero(),
            view_tri: Mat3::zero(),
        }
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    /// Vertex stage: clip-space position of corner `nthvert` of face `iface`
    pub fn vertex(&mut self, iface: usize, nthvert: usize) -> Vec4 {
        let normal = self.model.normal(iface, nthvert);
        self.varying_uv.set_col(nthvert, self.model.uv(iface, nthvert));
        self.varying_nrm
            .set_col(nthvert, proj(self.normal_matrix * embed::<4, 3>(normal, 0.0)));

        let view_pos = self.model_view * embed::<4, 3>(self.model.vert_at(iface, nthvert), 1.0);
        self.view_tri.set_col(nthvert, proj(view_pos));
        self.projection * view_pos
    }
}

impl Shader for NormalMapShader<'_> {
    fn fragment(&self, bar: Vec3) -> Option<Color> {
        let bn = (self.varying_nrm * bar).normalized();
        let uv = self.varying_uv * bar;

        // Darboux frame from the view-space edges and their uv deltas
        let edges = Mat3::from_rows([
            self.view_tri.col(1) - self.view_tri.col(0),
            self.view_tri.col(2) - self.view_tri.col(0),
            bn,
        ])
        .invert();
        let du = self.varying_uv.row(0);
        let dv = self.varying_uv.row(1);
        let i = edges * Vec3::new(du[1] - du[0], du[2] - du[0], 0.0);
        let j = edges * Vec3::new(dv[1] - dv[0], dv[2] - dv[0], 0.0);
        let tbn = Mat3::from_rows([i.normalized(), j.normalized(), bn]).transpose();

        let n = (tbn * self.model.normal_at(uv)).normalized();
        let l = self.light;
        let diff = (n * l).max(0.0);
        // Reflected light; the camera looks down view-space Z
        let r = (n * (n * l) * 2.0 - l).normalized();
        let spec = (-r.z()).max(0.0).powf(5.0 + sample2d(self.model.specular(), uv).r as f64);

        let c = sample2d(self.model.diffuse(), uv);
        let channel = |v: u8| {
            (self.lighting.ambient + v as f64 * (diff + spec)).min(self.lighting.max_channel) as u8
        };
        Some(Color::new(channel(c.r), channel(c.g), channel(c.b)))
    }
}

/// Run the vertex stage and rasterize every face of the shader's model.
///
/// `on_face` is called after each face, e.g. to drive a progress bar.
pub fn draw_model(
    shader: &mut NormalMapShader<'_>,
    frame: &FrameTransforms,
    target: &mut Image,
    depth: &mut DepthBuffer,
    mut on_face: impl FnMut(usize),
) {
    let nfaces = shader.model().nfaces();
    for iface in 0..nfaces {
        let clip = [
            shader.vertex(iface, 0),
            shader.vertex(iface, 1),
            shader.vertex(iface, 2),
        ];
        rasterize_triangle(frame, &clip, &*shader, target, depth);
        on_face(iface);
    }
    log::debug!("Drew {} faces", nfaces);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Camera, Viewport};
    use approx::assert_abs_diff_eq;

    const TRI: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";

    fn frame() -> FrameTransforms {
        let camera = Camera::new(
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
        );
        FrameTransforms::new(&camera, &Viewport::full(32, 32))
    }

    /// Load TRI from disk with uniform texture maps, keyed by file suffix
    fn load_tri(maps: &[(&str, Color)]) -> Model {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, TRI).unwrap();
        for (suffix, color) in maps {
            Image::filled(2, 2, *color)
                .save(dir.path().join(format!("tri{}", suffix)))
                .unwrap();
        }
        Model::from_file(&path).unwrap()
    }

    fn shade_center(light_dir: Vec3, lighting: Lighting) -> Color {
        let model = Model::from_obj_str(TRI).unwrap();
        shade_model_center(&model, light_dir, lighting)
    }

    fn shade_model_center(model: &Model, light_dir: Vec3, lighting: Lighting) -> Color {
        let frame = frame();
        let mut shader = NormalMapShader::new(model, &frame, light_dir, lighting);
        for nthvert in 0..3 {
            shader.vertex(0, nthvert);
        }
        shader
            .fragment(Vec3::new(1.0, 1.0, 1.0) / 3.0)
            .unwrap()
    }

    #[test]
    fn test_vertex_stage_projects_corners() {
        let model = Model::from_obj_str(TRI).unwrap();
        let frame = frame();
        let mut shader = NormalMapShader::new(&model, &frame, Vec3::new(0.0, 0.0, 1.0), Lighting::default());

        let clip = shader.vertex(0, 1);
        let screen = frame.viewport * clip / clip.w();
        assert_abs_diff_eq!(screen.x(), 32.0, epsilon = 1e-9);
        assert_abs_diff_eq!(screen.y(), 16.0, epsilon = 1e-9);
        assert_abs_diff_eq!(clip.z(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lit_face_saturates() {
        let c = shade_center(Vec3::new(0.0, 0.0, 1.0), Lighting::default());
        assert_eq!(c, Color::WHITE);
    }

    #[test]
    fn test_back_lit_face_gets_ambient_only() {
        let c = shade_center(Vec3::new(0.0, 0.0, -1.0), Lighting::default());
        assert_eq!(c, Color::new(10, 10, 10));

        let lighting = Lighting {
            ambient: 42.0,
            max_channel: 255.0,
        };
        let c = shade_center(Vec3::new(0.0, 0.0, -1.0), lighting);
        assert_eq!(c, Color::new(42, 42, 42));
    }

    #[test]
    fn test_max_channel_clamps() {
        let lighting = Lighting {
            ambient: 10.0,
            max_channel: 100.0,
        };
        let c = shade_center(Vec3::new(0.0, 0.0, 1.0), lighting);
        assert_eq!(c, Color::new(100, 100, 100));
    }

    #[test]
    fn test_normal_map_tilts_along_u() {
        // Tangent-space +X: the u axis, which runs along world +X for TRI
        let model = load_tri(&[("_nm_tangent.tga", Color::new(255, 128, 128))]);

        let c = shade_model_center(&model, Vec3::new(1.0, 0.0, 0.0), Lighting::default());
        assert_eq!(c, Color::WHITE);
        let c = shade_model_center(&model, Vec3::new(-1.0, 0.0, 0.0), Lighting::default());
        assert_eq!(c, Color::new(10, 10, 10));
        let c = shade_model_center(&model, Vec3::new(0.0, 1.0, 0.0), Lighting::default());
        assert_eq!(c, Color::new(10, 10, 10));
    }

    #[test]
    fn test_normal_map_tilts_along_v() {
        // Tangent-space +Y: the v axis, world +Y for TRI
        let model = load_tri(&[("_nm_tangent.tga", Color::new(128, 255, 128))]);

        let c = shade_model_center(&model, Vec3::new(0.0, 1.0, 0.0), Lighting::default());
        assert_eq!(c, Color::WHITE);
        let c = shade_model_center(&model, Vec3::new(1.0, 0.0, 0.0), Lighting::default());
        assert_eq!(c, Color::new(10, 10, 10));
    }

    #[test]
    fn test_flat_normal_map_faces_camera() {
        let model = load_tri(&[("_nm_tangent.tga", Color::new(128, 128, 255))]);
        let c = shade_model_center(&model, Vec3::new(1.0, 0.0, 0.0), Lighting::default());
        assert_eq!(c, Color::new(10, 10, 10));
    }

    #[test]
    fn test_specular_map_sharpens_highlight() {
        // Light at 45 degrees: the highlight term is 0.71^(5 + spec)
        let light = Vec3::new(1.0, 0.0, 1.0);
        let grey = Color::new(40, 40, 40);

        let dull = load_tri(&[("_diffuse.tga", grey)]);
        let c = shade_model_center(&dull, light, Lighting::default());
        // 10 + 40 * (0.71 + 0.18)
        assert!((44..=46).contains(&c.r), "got {:?}", c);
        assert_eq!((c.r, c.r), (c.g, c.b));

        let shiny = load_tri(&[("_diffuse.tga", grey), ("_spec.tga", Color::new(15, 15, 15))]);
        let s = shade_model_center(&shiny, light, Lighting::default());
        // 10 + 40 * (0.71 + 0.001)
        assert!((37..=39).contains(&s.r), "got {:?}", s);
        assert!(s.r < c.r);
    }

    #[test]
    fn test_draw_model() {
        let model = Model::from_obj_str(TRI).unwrap();
        let frame = frame();
        let mut shader = NormalMapShader::new(&model, &frame, Vec3::new(0.0, 0.0, 1.0), Lighting::default());
        let mut img = Image::new(32, 32);
        let mut depth = DepthBuffer::new(32, 32);
        let mut faces = Vec::new();

        draw_model(&mut shader, &frame, &mut img, &mut depth, |i| faces.push(i));

        assert_eq!(faces, vec![0]);
        assert_eq!(img.get(20, 20), Color::WHITE);
        assert_abs_diff_eq!(depth.get(20, 20), 3.0, epsilon = 1e-9);
        assert_eq!(img.get(5, 5), Color::BLACK);
        assert_eq!(depth.get(5, 5), f64::MAX);
    }
}

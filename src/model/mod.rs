//! Triangle models with texture maps
//!
//! A model is an OBJ mesh plus three optional maps stored next to it:
//! - `<name>_diffuse.tga`: base color
//! - `<name>_nm_tangent.tga`: tangent-space normal map
//! - `<name>_spec.tga`: specular exponent (red channel)
//!
//! Missing maps fall back to neutral 1x1 textures so any mesh can be drawn.

pub mod obj;

use std::path::Path;

use crate::error::{RenderError, Result};
use crate::rasterizer::{cross, sample2d, Color, Image, Vec2, Vec3};
use obj::{Corner, ObjGeometry};

pub struct Model {
    verts: Vec<Vec3>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    faces: Vec<[Corner; 3]>,
    diffuse: Image,
    normal_map: Image,
    specular: Image,
}

impl Model {
    /// Load an OBJ file and the texture maps that sit beside it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut model = Self::from_obj_str(&contents)?;

        model.diffuse = load_texture(path, "_diffuse.tga").unwrap_or_else(default_diffuse);
        model.normal_map = load_texture(path, "_nm_tangent.tga").unwrap_or_else(default_normal_map);
        model.specular = load_texture(path, "_spec.tga").unwrap_or_else(default_specular);

        log::info!(
            "Loaded model {}: {} vertices, {} faces",
            path.display(),
            model.nverts(),
            model.nfaces()
        );
        Ok(model)
    }

    /// Build a model from OBJ text with default texture maps
    pub fn from_obj_str(contents: &str) -> Result<Self> {
        Self::from_geometry(obj::parse(contents)?)
    }

    pub fn from_geometry(geometry: ObjGeometry) -> Result<Self> {
        if geometry.faces.is_empty() {
            return Err(RenderError::Empty);
        }

        Ok(Self {
            verts: geometry.positions,
            uvs: geometry.uvs,
            normals: geometry.normals,
            faces: geometry.faces,
            diffuse: default_diffuse(),
            normal_map: default_normal_map(),
            specular: default_specular(),
        })
    }

    pub fn nverts(&self) -> usize {
        self.verts.len()
    }

    pub fn nfaces(&self) -> usize {
        self.faces.len()
    }

    pub fn vert(&self, i: usize) -> Vec3 {
        self.verts[i]
    }

    /// Position of corner `nthvert` (0..3) of face `iface`
    pub fn vert_at(&self, iface: usize, nthvert: usize) -> Vec3 {
        self.verts[self.faces[iface][nthvert].vert]
    }

    /// Texture coordinate of a face corner, or (0, 0) if the file had none
    pub fn uv(&self, iface: usize, nthvert: usize) -> Vec2 {
        self.faces[iface][nthvert]
            .uv
            .map(|i| self.uvs[i])
            .unwrap_or(Vec2::ZERO)
    }

    /// Normal of a face corner.
    ///
    /// Corners without a normal get the face's geometric normal.
    pub fn normal(&self, iface: usize, nthvert: usize) -> Vec3 {
        match self.faces[iface][nthvert].normal {
            Some(i) => self.normals[i],
            None => {
                let a = self.vert_at(iface, 0);
                let b = self.vert_at(iface, 1);
                let c = self.vert_at(iface, 2);
                cross(b - a, c - a).normalized()
            }
        }
    }

    /// Tangent-space normal from the normal map at `uv`
    pub fn normal_at(&self, uv: Vec2) -> Vec3 {
        let c = sample2d(&self.normal_map, uv);
        Vec3::new(c.r as f64, c.g as f64, c.b as f64) * 2.0 / 255.0 - Vec3::new(1.0, 1.0, 1.0)
    }

    pub fn diffuse(&self) -> &Image {
        &self.diffuse
    }

    pub fn specular(&self) -> &Image {
        &self.specular
    }
}

/// Load `<stem><suffix>` from the model's directory, flipped so v = 0 is the bottom row
fn load_texture(model_path: &Path, suffix: &str) -> Option<Image> {
    let stem = model_path.file_stem()?.to_string_lossy();
    let texture_path = model_path.with_file_name(format!("{}{}", stem, suffix));

    match Image::from_file(&texture_path) {
        Ok(mut img) => {
            img.flip_vertically();
            log::info!(
                "Loaded texture: {} ({}x{})",
                texture_path.display(),
                img.width(),
                img.height()
            );
            Some(img)
        }
        Err(e) => {
            log::warn!("Texture {} not loaded: {}", texture_path.display(), e);
            None
        }
    }
}

fn default_diffuse() -> Image {
    Image::filled(1, 1, Color::WHITE)
}

/// Encodes the unperturbed tangent-space normal (0, 0, 1)
fn default_normal_map() -> Image {
    Image::filled(1, 1, Color::new(128, 128, 255))
}

fn default_specular() -> Image {
    Image::filled(1, 1, Color::BLACK)
}

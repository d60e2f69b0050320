//! Scene configuration
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files. Every
//! field has a default, so a file only needs the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rasterizer::{Camera, Color, FrameTransforms, Vec3, Viewport};
use crate::shading::Lighting;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f64; 3],
    pub center: [f64; 3],
    pub up: [f64; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [1.0, 1.0, 3.0],
            center: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Output raster size in pixels
    pub width: usize,
    pub height: usize,
    pub camera: CameraConfig,
    /// Direction towards the light, in world space
    pub light_dir: [f64; 3],
    pub lighting: Lighting,
    /// Clear color, RGB
    pub background: [u8; 3],
    /// Output image path; the format follows the extension
    pub output: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            camera: CameraConfig::default(),
            light_dir: [1.0, 1.0, 1.0],
            lighting: Lighting::default(),
            background: [0, 0, 0],
            output: PathBuf::from("render_target.tga"),
        }
    }
}

impl SceneConfig {
    pub fn camera(&self) -> Camera {
        Camera::new(
            Vec3::from(self.camera.eye),
            Vec3::from(self.camera.center),
            Vec3::from(self.camera.up),
        )
    }

    /// Centered viewport covering three quarters of the raster
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            (self.width / 8) as f64,
            (self.height / 8) as f64,
            (self.width * 3 / 4) as f64,
            (self.height * 3 / 4) as f64,
        )
    }

    pub fn frame_transforms(&self) -> FrameTransforms {
        FrameTransforms::new(&self.camera(), &self.viewport())
    }

    pub fn light_dir(&self) -> Vec3 {
        Vec3::from(self.light_dir)
    }

    pub fn background(&self) -> Color {
        let [r, g, b] = self.background;
        Color::new(r, g, b)
    }
}

/// Load a scene from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SceneConfig> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_config_from_str(s: &str) -> Result<SceneConfig> {
    Ok(ron::from_str(s)?)
}

/// Save a scene to a RON file
pub fn save_config<P: AsRef<Path>>(config: &SceneConfig, path: P) -> Result<()> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

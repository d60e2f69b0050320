//! Pixel types shared by the rasterizer, shaders and model textures

use std::ops::Index;
use std::path::Path;

use crate::error::{RenderError, Result};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to [u8; 4] for image encoding
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Channel access in RGBA order
impl Index<usize> for Color {
    type Output = u8;
    fn index(&self, i: usize) -> &u8 {
        match i {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            3 => &self.a,
            _ => panic!("color channel {} out of range", i),
        }
    }
}

/// Pixel-addressable RGBA image.
///
/// Used both as the render target and for model textures. Row 0 is the top
/// row in memory and in encoded files.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Image {
    /// Create an image filled with opaque black
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Color::BLACK)
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Load an image from any format the `image` crate was built with
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path.as_ref())?;
        Ok(Self::from_rgba(img.to_rgba8()))
    }

    fn from_rgba(rgba: image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
        }
    }

    /// Encode to a file; the format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes: Vec<u8> = self.pixels.iter().flat_map(|c| c.to_bytes()).collect();
        let rgba = image::RgbaImage::from_raw(self.width as u32, self.height as u32, bytes)
            .ok_or(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;

        // TGA and JPEG writers are picky about alpha; store plain RGB
        image::DynamicImage::ImageRgba8(rgba).to_rgb8().save(path.as_ref())?;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at (x, y), or transparent black outside the image
    pub fn get(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::default()
        }
    }

    /// Set pixel at (x, y); writes outside the image are ignored
    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Swap rows top to bottom
    pub fn flip_vertically(&mut self) {
        let w = self.width;
        for y in 0..self.height / 2 {
            let (top, bottom) = self.pixels.split_at_mut((self.height - 1 - y) * w);
            top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
        }
    }

    /// Sample at normalized UV coordinates (nearest texel, clamped to edge)
    pub fn sample(&self, u: f64, v: f64) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::default();
        }
        let tx = ((u * self.width as f64).max(0.0) as usize).min(self.width - 1);
        let ty = ((v * self.height as f64).max(0.0) as usize).min(self.height - 1);
        self.pixels[ty * self.width + tx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_bounds() {
        let mut img = Image::new(3, 2);
        img.set(2, 1, Color::RED);
        img.set(3, 0, Color::GREEN);
        assert_eq!(img.get(2, 1), Color::RED);
        assert_eq!(img.get(0, 0), Color::BLACK);
        assert_eq!(img.get(5, 5), Color::default());
        assert!(img.pixels().iter().all(|&c| c != Color::GREEN));
    }

    #[test]
    fn test_flip_vertically() {
        let mut img = Image::new(2, 3);
        img.set(0, 0, Color::RED);
        img.set(1, 1, Color::GREEN);
        img.set(1, 2, Color::BLUE);
        img.flip_vertically();
        assert_eq!(img.get(0, 2), Color::RED);
        assert_eq!(img.get(1, 1), Color::GREEN);
        assert_eq!(img.get(1, 0), Color::BLUE);
    }

    #[test]
    fn test_sample_clamps() {
        let mut img = Image::new(2, 2);
        img.set(1, 1, Color::WHITE);
        assert_eq!(img.sample(1.0, 1.0), Color::WHITE);
        assert_eq!(img.sample(0.75, 0.75), Color::WHITE);
        assert_eq!(img.sample(-0.5, 0.0), Color::BLACK);
    }

    #[test]
    fn test_color_channels() {
        let c = Color::with_alpha(1, 2, 3, 4);
        assert_eq!([c[0], c[1], c[2], c[3]], c.to_bytes());
    }

    #[test]
    fn test_save_and_reload_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut img = Image::new(4, 3);
        img.set(1, 2, Color::new(10, 20, 30));
        img.save(&path).unwrap();

        let loaded = Image::from_file(&path).unwrap();
        assert_eq!(loaded.width(), 4);
        assert_eq!(loaded.height(), 3);
        assert_eq!(loaded.get(1, 2), Color::new(10, 20, 30));
        assert_eq!(loaded.get(0, 0), Color::BLACK);
    }
}

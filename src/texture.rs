//! Table surface texture
//!
//! Decodes an image file to RGBA8, or paints the default rink markings
//! procedurally so the game runs without any asset on disk.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{AirHockeyError, Result};

/// Side length of the procedural texture
pub const DEFAULT_TEXTURE_SIZE: u32 = 512;

/// Where the table surface comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureSource {
    Procedural { size: u32 },
    File { path: PathBuf },
}

impl Default for TextureSource {
    fn default() -> Self {
        TextureSource::Procedural {
            size: DEFAULT_TEXTURE_SIZE,
        }
    }
}

impl TextureSource {
    pub fn load(&self) -> Result<TextureImage> {
        match self {
            TextureSource::Procedural { size } => Ok(TextureImage::rink(*size)),
            TextureSource::File { path } => TextureImage::open(path),
        }
    }
}

/// Tightly packed RGBA8 pixels, rows top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl From<RgbaImage> for TextureImage {
    fn from(img: RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            rgba: img.into_raw(),
        }
    }
}

impl TextureImage {
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|source| AirHockeyError::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "Loaded texture {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        Ok(img.to_rgba8().into())
    }

    /// Paint rink markings in the table's texture space
    ///
    /// The table maps t = 0.1 at the far end and t = 0.9 at the near end, so
    /// markings are laid out within that band.
    pub fn rink(size: u32) -> Self {
        const ICE: Rgba<u8> = Rgba([235, 240, 250, 255]);
        const RED: Rgba<u8> = Rgba([200, 30, 30, 255]);
        const BLUE: Rgba<u8> = Rgba([40, 60, 200, 255]);
        const BORDER: Rgba<u8> = Rgba([60, 60, 70, 255]);

        let size = size.max(1);
        let line = 0.008;
        let img = RgbaImage::from_fn(size, size, |x, y| {
            let s = (x as f32 + 0.5) / size as f32;
            let t = (y as f32 + 0.5) / size as f32;

            if s < 0.02 || s > 0.98 || t < 0.12 || t > 0.88 {
                return BORDER;
            }
            if (t - 0.5).abs() < line {
                return RED;
            }
            if (t - 0.3).abs() < line || (t - 0.7).abs() < line {
                return BLUE;
            }
            // Center circle, circular in world space (t spans 1.6 units per 0.8)
            let dx = s - 0.5;
            let dy = (t - 0.5) * 2.0;
            let r = (dx * dx + dy * dy).sqrt();
            if (r - 0.15).abs() < line {
                return RED;
            }
            // Goal creases at each end
            for goal_t in [0.12, 0.88] {
                let dy = (t - goal_t) * 2.0;
                if ((dx * dx + dy * dy).sqrt() - 0.12).abs() < line {
                    return RED;
                }
            }
            ICE
        });
        img.into()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.rgba
            .get(i..i + 4)
            .and_then(|p| p.try_into().ok())
    }
}

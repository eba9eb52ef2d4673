//! Game settings
//!
//! Persisted as JSON next to the executable. Missing fields fall back to
//! their defaults so older files keep loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MESH_POINTS;
use crate::error::Result;
use crate::objects::vertex::colors;
use crate::texture::TextureSource;

/// Default settings file name
pub const SETTINGS_FILE: &str = "air_hockey_settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Table surface image
    pub texture: TextureSource,

    /// Color the frame is cleared to before drawing
    pub clear_color: [f32; 4],

    /// Segments around mallets and puck
    pub mesh_points: u32,

    /// Render target size when running without a window
    pub headless_size: (u32, u32),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            texture: TextureSource::default(),
            clear_color: colors::BACKGROUND,
            mesh_points: MESH_POINTS,
            headless_size: (800, 480),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("Using default settings");
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.sanitized())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Clamp values that would produce degenerate meshes
    fn sanitized(mut self) -> Self {
        self.mesh_points = self.mesh_points.max(3);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("air_hockey_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(&temp_path("missing.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save.json");
        let settings = Settings {
            texture: TextureSource::File {
                path: PathBuf::from("surface.png"),
            },
            mesh_points: 12,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial.json");
        std::fs::write(&path, r#"{ "mesh_points": 1 }"#).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.mesh_points, 3);
        assert_eq!(loaded.texture, TextureSource::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let path = temp_path("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            result,
            Err(crate::error::AirHockeyError::Settings(_))
        ));
    }
}

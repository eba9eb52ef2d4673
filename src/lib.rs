//! Air Hockey - a 3D air hockey table with touch picking
//!
//! Core modules:
//! - `scene`: Camera pipeline, per-frame draw sequence and touch picking
//! - `objects`: Table, mallet and puck meshes
//! - `renderer`: wgpu backend that replays recorded frames
//! - `geometry` / `matrix`: Ray, sphere and 4x4 matrix helpers
//! - `settings`: JSON configuration

pub mod error;
pub mod geometry;
pub mod matrix;
pub mod objects;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod texture;

pub use error::{AirHockeyError, Result};
pub use scene::{AirHockeyRenderer, Frame, PickState, SceneState};
pub use settings::Settings;

/// Scene configuration constants
pub mod consts {
    use glam::Vec3;

    /// Vertical field of view of the projection, in degrees
    pub const FIELD_OF_VIEW_DEGREES: f32 = 45.0;
    pub const NEAR_PLANE: f32 = 1.0;
    pub const FAR_PLANE: f32 = 10.0;

    /// Fixed camera: above and behind the near end of the table
    pub const EYE: Vec3 = Vec3::new(0.0, 1.2, 2.2);
    pub const LOOK_TARGET: Vec3 = Vec3::ZERO;
    pub const UP: Vec3 = Vec3::Y;

    /// Mallet dimensions (world units, table is 1.0 x 1.6)
    pub const MALLET_RADIUS: f32 = 0.08;
    pub const MALLET_HEIGHT: f32 = 0.15;
    /// Distance of each mallet's rest position from the center line
    pub const MALLET_OFFSET_Z: f32 = 0.4;

    /// Puck dimensions
    pub const PUCK_RADIUS: f32 = 0.06;
    pub const PUCK_HEIGHT: f32 = 0.02;

    /// Segments around each circle/cylinder
    pub const MESH_POINTS: u32 = 32;

    /// The table is modeled upright in XY and laid flat by this rotation about X
    pub const TABLE_ROTATION_DEGREES: f32 = -90.0;
}

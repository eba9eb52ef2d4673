//! Error types shared across the crate

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AirHockeyError>;

#[derive(Debug, Error)]
pub enum AirHockeyError {
    /// Viewport with a zero dimension; aspect ratio would be undefined.
    #[error("viewport {width}x{height} has a zero dimension")]
    ZeroViewport { width: u32, height: u32 },

    /// View-projection matrix could not be inverted.
    #[error("matrix is singular (determinant {determinant})")]
    SingularMatrix { determinant: f32 },

    /// Homogeneous point came back with w == 0 after unprojection.
    #[error("cannot divide by w: point is at infinity")]
    DegenerateW,

    /// Touch arrived while no valid inverse view-projection was available.
    #[error("picking unavailable: no valid inverse view-projection this frame")]
    PickingUnavailable,

    /// Draw issued against an incomplete program/uniform/mesh binding.
    #[error("invalid draw state: {0}")]
    DrawState(&'static str),

    #[error("failed to load texture {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

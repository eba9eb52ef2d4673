//! Touch-to-ray conversion and press detection

use glam::{Mat4, Vec3, Vec4};

use super::camera::SceneState;
use crate::error::{AirHockeyError, Result};
use crate::geometry::{self, Ray, Sphere};
use crate::matrix;

/// Whether the player's mallet is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickState {
    #[default]
    NotPressed,
    Pressed,
}

impl PickState {
    pub fn is_pressed(&self) -> bool {
        matches!(self, PickState::Pressed)
    }
}

impl From<bool> for PickState {
    fn from(hit: bool) -> Self {
        if hit {
            PickState::Pressed
        } else {
            PickState::NotPressed
        }
    }
}

/// Unproject an NDC point on the near and far planes into a world-space ray
///
/// The direction runs from the near-plane point to the far-plane point and
/// is left unnormalized.
pub fn build_pick_ray(
    inverted_view_projection: &Mat4,
    normalized_x: f32,
    normalized_y: f32,
) -> Result<Ray> {
    let near_ndc = Vec4::new(normalized_x, normalized_y, -1.0, 1.0);
    let far_ndc = Vec4::new(normalized_x, normalized_y, 1.0, 1.0);

    let near = matrix::divide_by_w(*inverted_view_projection * near_ndc)?;
    let far = matrix::divide_by_w(*inverted_view_projection * far_ndc)?;

    Ok(Ray::new(near, geometry::vector_between(near, far)))
}

/// Bounding sphere for a mallet resting at `position`
pub fn mallet_bounding_sphere(position: Vec3, mallet_height: f32) -> Sphere {
    Sphere::new(position, mallet_height / 2.0)
}

/// Map a pixel position (origin top-left, y down) to NDC (y up)
pub fn normalized_touch(x: f32, y: f32, width: u32, height: u32) -> (f32, f32) {
    let nx = (x / width.max(1) as f32) * 2.0 - 1.0;
    let ny = -((y / height.max(1) as f32) * 2.0 - 1.0);
    (nx, ny)
}

impl SceneState {
    /// World-space pick ray for this frame's camera
    pub fn pick_ray(&self, normalized_x: f32, normalized_y: f32) -> Result<Ray> {
        let inverse = self
            .inverted_view_projection()
            .ok_or(AirHockeyError::PickingUnavailable)?;
        build_pick_ray(inverse, normalized_x, normalized_y)
    }

    /// Test a touch against a bounding sphere
    pub fn pick(&self, normalized_x: f32, normalized_y: f32, target: &Sphere) -> Result<bool> {
        let ray = self.pick_ray(normalized_x, normalized_y)?;
        Ok(geometry::intersects(target, &ray))
    }
}

//! Camera and per-draw matrix pipeline
//!
//! Projection changes only on resize and the view is fixed for the session.
//! View-projection and its inverse are rebuilt from those two at the start of
//! every frame and dropped whenever either input changes, so a stale inverse
//! can never reach picking.

use glam::{Mat4, Vec3};

use crate::consts::*;
use crate::error::{AirHockeyError, Result};
use crate::matrix;

/// Optional model rotation, applied before translation in matrix order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub axis: Vec3,
    pub degrees: f32,
}

impl Rotation {
    pub fn new(axis: Vec3, degrees: f32) -> Self {
        Self { axis, degrees }
    }
}

#[derive(Debug, Clone)]
pub struct SceneState {
    projection: Mat4,
    view: Mat4,
    view_projection: Mat4,
    inverted_view_projection: Option<Mat4>,
    model: Mat4,
    model_view_projection: Mat4,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    /// Identity projection and the fixed view; call [`resize`](Self::resize)
    /// before the first frame.
    pub fn new() -> Self {
        let mut state = Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            inverted_view_projection: None,
            model: Mat4::IDENTITY,
            model_view_projection: Mat4::IDENTITY,
        };
        state.init_view();
        state
    }

    /// Rebuild the projection for a new viewport
    ///
    /// A zero dimension is rejected and the previous projection is kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(AirHockeyError::ZeroViewport { width, height });
        }
        self.projection = matrix::perspective(
            FIELD_OF_VIEW_DEGREES,
            width as f32 / height as f32,
            NEAR_PLANE,
            FAR_PLANE,
        );
        self.inverted_view_projection = None;
        Ok(())
    }

    /// Fixed camera looking at the table center
    pub fn init_view(&mut self) {
        self.view = matrix::look_at(EYE, LOOK_TARGET, UP);
        self.inverted_view_projection = None;
    }

    /// Derive view-projection and its inverse for this frame
    ///
    /// On a singular product the inverse is cleared and the error returned;
    /// drawing can proceed, picking cannot.
    pub fn begin_frame(&mut self) -> Result<()> {
        self.view_projection = self.projection * self.view;
        match matrix::try_invert(&self.view_projection) {
            Ok(inverse) => {
                self.inverted_view_projection = Some(inverse);
                Ok(())
            }
            Err(e) => {
                self.inverted_view_projection = None;
                Err(e)
            }
        }
    }

    /// Place an object and compose its model-view-projection matrix
    ///
    /// The model starts from identity, is optionally rotated, then translated.
    /// The result is `view_projection * model`.
    pub fn position_and_compose(&mut self, position: Vec3, rotation: Option<Rotation>) -> Mat4 {
        let mut model = Mat4::IDENTITY;
        if let Some(rotation) = rotation {
            model = matrix::rotate(model, rotation.degrees, rotation.axis);
        }
        self.model = matrix::translate(model, position);
        self.model_view_projection = self.view_projection * self.model;
        self.model_view_projection
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn view_projection(&self) -> &Mat4 {
        &self.view_projection
    }

    /// `None` until the first successful [`begin_frame`](Self::begin_frame)
    /// after any projection or view change
    pub fn inverted_view_projection(&self) -> Option<&Mat4> {
        self.inverted_view_projection.as_ref()
    }

    pub fn model(&self) -> &Mat4 {
        &self.model
    }

    pub fn model_view_projection(&self) -> &Mat4 {
        &self.model_view_projection
    }

    #[cfg(test)]
    pub(crate) fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.inverted_view_projection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use proptest::prelude::*;

    #[test]
    fn test_resize_matches_reference_projection() {
        let mut state = SceneState::new();
        state.resize(800, 480).unwrap();
        let reference = matrix::perspective(45.0, 800.0 / 480.0, 1.0, 10.0);
        assert_eq!(*state.projection(), reference);

        let (fov, aspect) = matrix::perspective_params(state.projection());
        assert!((fov - 45.0).abs() < 1e-3);
        assert!((aspect - 800.0 / 480.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_height_rejected_and_projection_kept() {
        let mut state = SceneState::new();
        state.resize(800, 480).unwrap();
        let before = *state.projection();
        assert!(matches!(
            state.resize(800, 0),
            Err(AirHockeyError::ZeroViewport {
                width: 800,
                height: 0
            })
        ));
        assert_eq!(*state.projection(), before);
    }

    #[test]
    fn test_view_looks_at_origin_from_eye() {
        let state = SceneState::new();
        // Eye maps to the view-space origin, target straight down -Z
        let eye = state.view().transform_point3(EYE);
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-5));
        let target = state.view().transform_point3(Vec3::ZERO);
        assert!(target.x.abs() < 1e-5 && target.y.abs() < 1e-5 && target.z < 0.0);
    }

    #[test]
    fn test_begin_frame_derives_inverse() {
        let mut state = SceneState::new();
        state.resize(1080, 1920).unwrap();
        assert!(state.inverted_view_projection().is_none());

        state.begin_frame().unwrap();
        let vp = *state.view_projection();
        assert_eq!(vp, *state.projection() * *state.view());
        let inv = state.inverted_view_projection().unwrap();
        assert!((*inv * vp).abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn test_resize_invalidates_inverse_until_next_frame() {
        let mut state = SceneState::new();
        state.resize(800, 480).unwrap();
        state.begin_frame().unwrap();
        state.resize(480, 800).unwrap();
        assert!(state.inverted_view_projection().is_none());
        state.begin_frame().unwrap();
        assert!(state.inverted_view_projection().is_some());
    }

    #[test]
    fn test_singular_projection_clears_inverse() {
        let mut state = SceneState::new();
        state.resize(800, 480).unwrap();
        state.begin_frame().unwrap();
        state.set_projection(Mat4::ZERO);
        assert!(matches!(
            state.begin_frame(),
            Err(AirHockeyError::SingularMatrix { .. })
        ));
        assert!(state.inverted_view_projection().is_none());
    }

    #[test]
    fn test_compose_order_is_view_projection_times_model() {
        let mut state = SceneState::new();
        state.resize(800, 480).unwrap();
        state.begin_frame().unwrap();

        let position = Vec3::new(0.0, MALLET_HEIGHT / 2.0, MALLET_OFFSET_Z);
        let mvp = state.position_and_compose(position, None);
        let expected = *state.view_projection() * Mat4::from_translation(position);
        assert!(mvp.abs_diff_eq(expected, 1e-6));

        // Object origin lands where the view-projection puts the position
        let a = mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let b = *state.view_projection() * position.extend(1.0);
        assert!(a.abs_diff_eq(b, 1e-6));
    }

    #[test]
    fn test_table_rotation_lays_table_flat() {
        let mut state = SceneState::new();
        state.resize(800, 480).unwrap();
        state.begin_frame().unwrap();
        state.position_and_compose(
            Vec3::ZERO,
            Some(Rotation::new(Vec3::X, TABLE_ROTATION_DEGREES)),
        );
        let corner = state.model().transform_point3(Vec3::new(-0.5, -0.8, 0.0));
        assert!(corner.abs_diff_eq(Vec3::new(-0.5, 0.0, 0.8), 1e-6));
    }

    proptest! {
        #[test]
        fn prop_resize_sets_fov_and_aspect(width in 1u32..8192, height in 1u32..8192) {
            let mut state = SceneState::new();
            state.resize(width, height).unwrap();
            let (fov, aspect) = matrix::perspective_params(state.projection());
            let expected = width as f32 / height as f32;
            prop_assert!((fov - FIELD_OF_VIEW_DEGREES).abs() < 1e-3);
            prop_assert!(((aspect - expected) / expected).abs() < 1e-5);
        }
    }
}

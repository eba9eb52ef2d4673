//! Matrix helpers
//!
//! Column-major `glam::Mat4` with OpenGL clip conventions (right-handed view
//! space, clip z in [-w, w]). Transform helpers post-multiply, so
//! `translate(rotate(identity, ..), ..)` applies the translation first to a
//! vertex and the rotation second.

use glam::{Mat4, Vec3, Vec4};

use crate::error::{AirHockeyError, Result};

/// Determinants at or below this magnitude are treated as singular
pub const MIN_DETERMINANT: f32 = 1e-8;

/// Perspective projection from a vertical field of view in degrees
///
/// Maps view-space depth `-near..-far` to clip z `-1..1`.
pub fn perspective(y_fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let angle = y_fov_degrees.to_radians();
    let a = 1.0 / (angle / 2.0).tan();
    let depth = far - near;

    Mat4::from_cols(
        Vec4::new(a / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, a, 0.0, 0.0),
        Vec4::new(0.0, 0.0, -((far + near) / depth), -1.0),
        Vec4::new(0.0, 0.0, -((2.0 * far * near) / depth), 0.0),
    )
}

/// Camera view transform looking from `eye` toward `center`
#[inline]
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, center, up)
}

/// `m * T(offset)`
#[inline]
pub fn translate(m: Mat4, offset: Vec3) -> Mat4 {
    m * Mat4::from_translation(offset)
}

/// `m * R(axis, degrees)`; the axis need not be normalized
#[inline]
pub fn rotate(m: Mat4, degrees: f32, axis: Vec3) -> Mat4 {
    m * Mat4::from_axis_angle(axis.normalize_or_zero(), degrees.to_radians())
}

/// General 4x4 inverse, rejecting singular or non-finite input
pub fn try_invert(m: &Mat4) -> Result<Mat4> {
    let determinant = m.determinant();
    if !determinant.is_finite() || determinant.abs() <= MIN_DETERMINANT {
        return Err(AirHockeyError::SingularMatrix { determinant });
    }
    let inverse = m.inverse();
    if !inverse.is_finite() {
        return Err(AirHockeyError::SingularMatrix { determinant });
    }
    Ok(inverse)
}

/// Perspective division of a homogeneous point
pub fn divide_by_w(v: Vec4) -> Result<Vec3> {
    if v.w.abs() <= f32::EPSILON || !v.w.is_finite() {
        return Err(AirHockeyError::DegenerateW);
    }
    Ok(v.truncate() / v.w)
}

/// Recover (vertical fov in degrees, aspect) from a projection built by [`perspective`]
pub fn perspective_params(projection: &Mat4) -> (f32, f32) {
    let a = projection.y_axis.y;
    let fov = 2.0 * (1.0 / a).atan();
    (fov.to_degrees(), a / projection.x_axis.x)
}

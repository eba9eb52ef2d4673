//! Geometry primitives for picking and mesh building
//!
//! Points and vectors are plain `glam::Vec3` values. A point is a position, a
//! vector is a direction; the distinction is kept in names, not types.

use glam::Vec3;

/// Half-line used for picking: `origin + t * direction`, t >= 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Not normalized; only its direction matters for intersection.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter t along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Bounding volume for pickable objects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Flat circle lying in the XZ plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec3,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Upright open cylinder, centered on `center`, extending height/2 up and down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub center: Vec3,
    pub radius: f32,
    pub height: f32,
}

impl Cylinder {
    pub fn new(center: Vec3, radius: f32, height: f32) -> Self {
        Self {
            center,
            radius,
            height,
        }
    }
}

/// Vector pointing from `from` to `to`
#[inline]
pub fn vector_between(from: Vec3, to: Vec3) -> Vec3 {
    to - from
}

/// Shortest distance from a point to the infinite line carrying the ray
///
/// Uses the area of the triangle formed by the point and two points on the
/// ray: |(p - a) x (p - b)| / |b - a|.
pub fn distance_between(point: Vec3, ray: &Ray) -> f32 {
    let len = ray.direction.length();
    if len <= f32::EPSILON {
        return vector_between(ray.origin, point).length();
    }
    let p1_to_point = vector_between(ray.origin, point);
    let p2_to_point = vector_between(ray.at(1.0), point);
    p1_to_point.cross(p2_to_point).length() / len
}

/// True when the ray's line passes within the sphere's radius of its center
#[inline]
pub fn intersects(sphere: &Sphere, ray: &Ray) -> bool {
    distance_between(sphere.center, ray) < sphere.radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_between() {
        let v = vector_between(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 0.0, 3.0));
        assert_eq!(v, Vec3::new(3.0, -2.0, 0.0));
    }

    #[test]
    fn test_distance_ignores_direction_length() {
        let point = Vec3::new(0.0, 2.0, 0.0);
        let short = Ray::new(Vec3::ZERO, Vec3::X * 0.01);
        let long = Ray::new(Vec3::ZERO, Vec3::X * 100.0);
        assert!((distance_between(point, &short) - 2.0).abs() < 1e-4);
        assert!((distance_between(point, &long) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_through_center_hits() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.075, 0.4), 0.075);
        let origin = Vec3::new(0.3, 1.0, 2.0);
        let ray = Ray::new(origin, vector_between(origin, sphere.center));
        assert!(intersects(&sphere, &ray));
    }

    #[test]
    fn test_ray_just_outside_radius_misses() {
        let sphere = Sphere::new(Vec3::ZERO, 0.5);
        let ray = Ray::new(Vec3::new(-5.0, 0.5 + 1e-3, 0.0), Vec3::X);
        assert!(!intersects(&sphere, &ray));

        let ray = Ray::new(Vec3::new(-5.0, 0.5 - 1e-3, 0.0), Vec3::X);
        assert!(intersects(&sphere, &ray));
    }

    #[test]
    fn test_degenerate_ray_uses_origin_distance() {
        let ray = Ray::new(Vec3::new(0.0, 0.1, 0.0), Vec3::ZERO);
        let sphere = Sphere::new(Vec3::ZERO, 0.2);
        assert!(intersects(&sphere, &ray));
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ONE, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(ray.at(0.5), Vec3::new(1.0, 2.0, 1.0));
    }
}

//! Triangle-list mesh generation for round objects
//!
//! Circles lie in the XZ plane facing +Y; cylinders are open tubes around the
//! Y axis. Every shape is emitted as a plain triangle list.

use glam::Vec3;
use std::f32::consts::TAU;

use super::Mesh;
use super::vertex::Vertex;
use crate::geometry::{Circle, Cylinder};

/// Vertices needed for a circle of `points` segments
#[inline]
pub fn circle_vertex_count(points: u32) -> usize {
    points as usize * 3
}

/// Vertices needed for an open cylinder of `points` segments
#[inline]
pub fn open_cylinder_vertex_count(points: u32) -> usize {
    points as usize * 6
}

#[inline]
fn rim_point(center: Vec3, radius: f32, i: u32, points: u32) -> Vec3 {
    let theta = (i as f32 / points as f32) * TAU;
    center + Vec3::new(radius * theta.cos(), 0.0, radius * theta.sin())
}

pub struct ObjectBuilder {
    vertices: Vec<Vertex>,
}

impl ObjectBuilder {
    fn with_capacity(vertex_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
        }
    }

    fn push(&mut self, p: Vec3) {
        self.vertices.push(Vertex::new(p.x, p.y, p.z));
    }

    /// Flat disc: one triangle from the center to each rim edge
    fn append_circle(&mut self, circle: &Circle, points: u32) {
        for i in 0..points {
            let p1 = rim_point(circle.center, circle.radius, i, points);
            let p2 = rim_point(circle.center, circle.radius, i + 1, points);
            // Counter-clockwise seen from above
            self.push(circle.center);
            self.push(p2);
            self.push(p1);
        }
    }

    /// Tube side: two triangles per segment between the top and bottom rims
    fn append_open_cylinder(&mut self, cylinder: &Cylinder, points: u32) {
        let half = cylinder.height / 2.0;
        let top = cylinder.center + Vec3::Y * half;
        let bottom = cylinder.center - Vec3::Y * half;

        for i in 0..points {
            let t1 = rim_point(top, cylinder.radius, i, points);
            let t2 = rim_point(top, cylinder.radius, i + 1, points);
            let b1 = rim_point(bottom, cylinder.radius, i, points);
            let b2 = rim_point(bottom, cylinder.radius, i + 1, points);

            self.push(t1);
            self.push(b1);
            self.push(t2);

            self.push(t2);
            self.push(b1);
            self.push(b2);
        }
    }

    fn build(self) -> Mesh {
        Mesh::new(self.vertices)
    }

    /// Puck: an open cylinder capped on top
    pub fn create_puck(puck: &Cylinder, points: u32) -> Mesh {
        let mut builder = Self::with_capacity(
            circle_vertex_count(points) + open_cylinder_vertex_count(points),
        );

        let top = Circle::new(puck.center + Vec3::Y * (puck.height / 2.0), puck.radius);
        builder.append_circle(&top, points);
        builder.append_open_cylinder(puck, points);
        builder.build()
    }

    /// Mallet: a wide short base under a narrow tall handle
    ///
    /// The base takes the bottom quarter of the height at full radius; the
    /// handle takes the rest at a third of the radius. The whole mallet spans
    /// `center.y - height/2 ..= center.y + height/2`.
    pub fn create_mallet(center: Vec3, radius: f32, height: f32, points: u32) -> Mesh {
        let mut builder = Self::with_capacity(
            (circle_vertex_count(points) + open_cylinder_vertex_count(points)) * 2,
        );

        let base_height = height * 0.25;
        let base_circle = Circle::new(center - Vec3::Y * base_height, radius);
        let base_cylinder = Cylinder::new(
            base_circle.center - Vec3::Y * (base_height / 2.0),
            radius,
            base_height,
        );
        builder.append_circle(&base_circle, points);
        builder.append_open_cylinder(&base_cylinder, points);

        let handle_height = height * 0.75;
        let handle_radius = radius / 3.0;
        let handle_circle = Circle::new(center + Vec3::Y * (height * 0.5), handle_radius);
        let handle_cylinder = Cylinder::new(
            handle_circle.center - Vec3::Y * (handle_height / 2.0),
            handle_radius,
            handle_height,
        );
        builder.append_circle(&handle_circle, points);
        builder.append_open_cylinder(&handle_cylinder, points);

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puck_vertex_count_and_bounds() {
        let mesh = ObjectBuilder::create_puck(&Cylinder::new(Vec3::ZERO, 0.06, 0.02), 32);
        assert_eq!(mesh.vertex_count(), 32 * 3 + 32 * 6);

        let (min, max) = mesh.bounds();
        assert!((min.y + 0.01).abs() < 1e-6);
        assert!((max.y - 0.01).abs() < 1e-6);
        assert!((max.x - 0.06).abs() < 1e-6);
        assert!((min.x + 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_mallet_spans_its_height() {
        let mesh = ObjectBuilder::create_mallet(Vec3::ZERO, 0.08, 0.15, 32);
        assert_eq!(mesh.vertex_count(), (32 * 3 + 32 * 6) * 2);

        let (min, max) = mesh.bounds();
        assert!((min.y + 0.075).abs() < 1e-6);
        assert!((max.y - 0.075).abs() < 1e-6);
        assert!((max.x - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_mallet_handle_is_narrow() {
        let mesh = ObjectBuilder::create_mallet(Vec3::ZERO, 0.09, 0.15, 16);
        // Everything above the base top sits within the handle radius
        let base_top = -0.15 * 0.25;
        for v in mesh.vertices() {
            let p = Vec3::from(v.position);
            if p.y > base_top + 1e-6 {
                assert!(Vec3::new(p.x, 0.0, p.z).length() <= 0.03 + 1e-6);
            }
        }
    }

    #[test]
    fn test_circle_faces_up() {
        let mut builder = ObjectBuilder::with_capacity(circle_vertex_count(8));
        builder.append_circle(&Circle::new(Vec3::ZERO, 1.0), 8);
        let mesh = builder.build();
        for tri in mesh.vertices().chunks(3) {
            let a = Vec3::from(tri[0].position);
            let b = Vec3::from(tri[1].position);
            let c = Vec3::from(tri[2].position);
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }
}

use glam::Vec3;

use super::builder::ObjectBuilder;
use super::{Drawable, Mesh};
use crate::geometry::Cylinder;
use crate::scene::MeshKind;

/// A capped puck centered on the origin
#[derive(Debug, Clone)]
pub struct Puck {
    pub radius: f32,
    pub height: f32,
    mesh: Mesh,
}

impl Puck {
    pub fn new(radius: f32, height: f32, points: u32) -> Self {
        Self {
            radius,
            height,
            mesh: ObjectBuilder::create_puck(&Cylinder::new(Vec3::ZERO, radius, height), points),
        }
    }
}

impl Drawable for Puck {
    fn mesh_kind(&self) -> MeshKind {
        MeshKind::Puck
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

use glam::Vec3;

use super::builder::ObjectBuilder;
use super::{Drawable, Mesh};
use crate::scene::MeshKind;

/// A mallet centered on the origin, spanning `-height/2 ..= height/2`
#[derive(Debug, Clone)]
pub struct Mallet {
    pub radius: f32,
    pub height: f32,
    mesh: Mesh,
}

impl Mallet {
    pub fn new(radius: f32, height: f32, points: u32) -> Self {
        Self {
            radius,
            height,
            mesh: ObjectBuilder::create_mallet(Vec3::ZERO, radius, height, points),
        }
    }
}

impl Drawable for Mallet {
    fn mesh_kind(&self) -> MeshKind {
        MeshKind::Mallet
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

//! Drawable scene objects
//!
//! Each object owns its mesh in object space. Drawing is two steps, as in a
//! GL-style pipeline: `bind_data` attaches the mesh to a program's vertex
//! layout, then `draw` issues the call with whatever uniforms are current.

pub mod builder;
pub mod mallet;
pub mod puck;
pub mod table;
pub mod vertex;

pub use builder::ObjectBuilder;
pub use mallet::Mallet;
pub use puck::Puck;
pub use table::Table;
pub use vertex::Vertex;

use glam::Vec3;

use crate::error::Result;
use crate::scene::{Frame, MeshKind, ShaderProgram};

/// Triangle-list vertex data
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Axis-aligned (min, max) corners; both zero for an empty mesh
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut iter = self.vertices.iter().map(|v| Vec3::from(v.position));
        let Some(first) = iter.next() else {
            return (Vec3::ZERO, Vec3::ZERO);
        };
        iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)))
    }
}

/// An object with a mesh that can be bound to a program and drawn
pub trait Drawable {
    fn mesh_kind(&self) -> MeshKind;

    fn mesh(&self) -> &Mesh;

    fn bind_data(&self, frame: &mut Frame, program: &dyn ShaderProgram) {
        frame.bind_mesh(self.mesh_kind(), program.kind(), self.mesh().vertex_count());
    }

    fn draw(&self, frame: &mut Frame) -> Result<()> {
        frame.draw(self.mesh_kind())
    }
}

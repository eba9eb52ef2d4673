//! The table surface

use super::vertex::Vertex;
use super::{Drawable, Mesh};
use crate::scene::MeshKind;

/// Fan around the center (x, y, s, t). The texture's top and bottom tenth are
/// cropped so the square image fits the 1.0 x 1.6 table.
const FAN: [[f32; 4]; 6] = [
    [0.0, 0.0, 0.5, 0.5],
    [-0.5, -0.8, 0.0, 0.9],
    [0.5, -0.8, 1.0, 0.9],
    [0.5, 0.8, 1.0, 0.1],
    [-0.5, 0.8, 0.0, 0.1],
    [-0.5, -0.8, 0.0, 0.9],
];

/// Textured rectangle modeled upright in the XY plane
#[derive(Debug, Clone)]
pub struct Table {
    mesh: Mesh,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    pub fn new() -> Self {
        let vertex = |[x, y, s, t]: [f32; 4]| Vertex::textured(x, y, 0.0, s, t);
        let center = vertex(FAN[0]);

        let vertices = FAN[1..]
            .windows(2)
            .flat_map(|edge| [center, vertex(edge[0]), vertex(edge[1])])
            .collect();

        Self {
            mesh: Mesh::new(vertices),
        }
    }
}

impl Drawable for Table {
    fn mesh_kind(&self) -> MeshKind {
        MeshKind::Table
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

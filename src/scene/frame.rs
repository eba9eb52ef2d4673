//! Recorded draw sequence for one frame
//!
//! `Frame` mirrors a GL-style state machine: a program is made current,
//! uniforms are set on it, a mesh is bound against its vertex layout, and each
//! `draw` snapshots that state into an immutable [`DrawCall`]. Uniforms stay
//! attached to their program across program switches, so a program only needs
//! new uniforms when something changes.

use glam::{Mat4, Vec3};

use crate::error::{AirHockeyError, Result};

/// Which shader program a draw goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    Color,
    Texture,
}

/// Which uploaded mesh a draw reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Table,
    Mallet,
    Puck,
}

/// Handle returned by a backend for an uploaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Per-draw uniform values, one variant per program
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniforms {
    Color { mvp: Mat4, color: Vec3 },
    Texture { mvp: Mat4, texture: TextureId },
}

impl Uniforms {
    pub fn program(&self) -> ProgramKind {
        match self {
            Uniforms::Color { .. } => ProgramKind::Color,
            Uniforms::Texture { .. } => ProgramKind::Texture,
        }
    }

    pub fn mvp(&self) -> &Mat4 {
        match self {
            Uniforms::Color { mvp, .. } | Uniforms::Texture { mvp, .. } => mvp,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: ProgramKind,
    pub mesh: MeshKind,
    pub uniforms: Uniforms,
    pub vertex_count: u32,
}

#[derive(Debug, Clone, Copy)]
struct BoundMesh {
    mesh: MeshKind,
    program: ProgramKind,
    vertex_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Frame {
    clear_color: Option<[f32; 4]>,
    draws: Vec<DrawCall>,
    program: Option<ProgramKind>,
    color_uniforms: Option<Uniforms>,
    texture_uniforms: Option<Uniforms>,
    bound: Option<BoundMesh>,
    picking_available: bool,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = Some(color);
        self.draws.clear();
    }

    pub fn use_program(&mut self, program: ProgramKind) {
        self.program = Some(program);
    }

    /// Set uniforms on the current program; the variant must match it
    pub fn set_uniforms(&mut self, uniforms: Uniforms) -> Result<()> {
        if self.program != Some(uniforms.program()) {
            return Err(AirHockeyError::DrawState(
                "uniforms set for a program that is not in use",
            ));
        }
        match uniforms.program() {
            ProgramKind::Color => self.color_uniforms = Some(uniforms),
            ProgramKind::Texture => self.texture_uniforms = Some(uniforms),
        }
        Ok(())
    }

    pub fn bind_mesh(&mut self, mesh: MeshKind, program: ProgramKind, vertex_count: u32) {
        self.bound = Some(BoundMesh {
            mesh,
            program,
            vertex_count,
        });
    }

    pub fn draw(&mut self, mesh: MeshKind) -> Result<()> {
        let program = self
            .program
            .ok_or(AirHockeyError::DrawState("no program in use"))?;
        let bound = self
            .bound
            .filter(|b| b.mesh == mesh)
            .ok_or(AirHockeyError::DrawState("mesh is not bound"))?;
        if bound.program != program {
            return Err(AirHockeyError::DrawState(
                "mesh is bound to a different program",
            ));
        }
        let uniforms = match program {
            ProgramKind::Color => self.color_uniforms,
            ProgramKind::Texture => self.texture_uniforms,
        }
        .ok_or(AirHockeyError::DrawState("no uniforms set for program"))?;

        self.draws.push(DrawCall {
            program,
            mesh,
            uniforms,
            vertex_count: bound.vertex_count,
        });
        Ok(())
    }

    pub fn clear_color(&self) -> Option<[f32; 4]> {
        self.clear_color
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Whether touch picking had a valid inverse view-projection this frame
    pub fn picking_available(&self) -> bool {
        self.picking_available
    }

    pub(crate) fn set_picking_available(&mut self, available: bool) {
        self.picking_available = available;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(mvp: Mat4) -> Uniforms {
        Uniforms::Color {
            mvp,
            color: Vec3::ONE,
        }
    }

    #[test]
    fn test_draw_snapshots_state() {
        let mut frame = Frame::new();
        frame.use_program(ProgramKind::Color);
        frame.set_uniforms(color(Mat4::IDENTITY)).unwrap();
        frame.bind_mesh(MeshKind::Mallet, ProgramKind::Color, 10);
        frame.draw(MeshKind::Mallet).unwrap();

        let moved = Mat4::from_translation(Vec3::X);
        frame.set_uniforms(color(moved)).unwrap();
        frame.draw(MeshKind::Mallet).unwrap();

        let draws = frame.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(*draws[0].uniforms.mvp(), Mat4::IDENTITY);
        assert_eq!(*draws[1].uniforms.mvp(), moved);
        assert_eq!(draws[1].vertex_count, 10);
    }

    #[test]
    fn test_draw_without_program_fails() {
        let mut frame = Frame::new();
        frame.bind_mesh(MeshKind::Puck, ProgramKind::Color, 3);
        assert!(matches!(
            frame.draw(MeshKind::Puck),
            Err(AirHockeyError::DrawState(_))
        ));
    }

    #[test]
    fn test_draw_unbound_mesh_fails() {
        let mut frame = Frame::new();
        frame.use_program(ProgramKind::Color);
        frame.set_uniforms(color(Mat4::IDENTITY)).unwrap();
        frame.bind_mesh(MeshKind::Mallet, ProgramKind::Color, 3);
        assert!(frame.draw(MeshKind::Puck).is_err());
    }

    #[test]
    fn test_mismatched_uniforms_rejected() {
        let mut frame = Frame::new();
        frame.use_program(ProgramKind::Texture);
        assert!(frame.set_uniforms(color(Mat4::IDENTITY)).is_err());
    }

    #[test]
    fn test_uniforms_survive_program_switch() {
        let mut frame = Frame::new();
        frame.use_program(ProgramKind::Color);
        frame.set_uniforms(color(Mat4::IDENTITY)).unwrap();
        frame.use_program(ProgramKind::Texture);
        frame.use_program(ProgramKind::Color);
        frame.bind_mesh(MeshKind::Puck, ProgramKind::Color, 6);
        assert!(frame.draw(MeshKind::Puck).is_ok());
    }

    #[test]
    fn test_mesh_bound_for_other_program_fails() {
        let mut frame = Frame::new();
        frame.use_program(ProgramKind::Texture);
        frame
            .set_uniforms(Uniforms::Texture {
                mvp: Mat4::IDENTITY,
                texture: TextureId(0),
            })
            .unwrap();
        frame.bind_mesh(MeshKind::Table, ProgramKind::Color, 12);
        assert!(frame.draw(MeshKind::Table).is_err());
    }
}

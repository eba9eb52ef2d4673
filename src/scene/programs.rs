//! Shader program handles
//!
//! Programs here are draw-time contracts: they select a pipeline and carry
//! the uniforms that pipeline reads. The backend owns the compiled shaders.

use glam::{Mat4, Vec3};

use super::frame::{Frame, ProgramKind, TextureId, Uniforms};
use crate::error::Result;

pub trait ShaderProgram {
    fn kind(&self) -> ProgramKind;

    fn use_program(&self, frame: &mut Frame) {
        frame.use_program(self.kind());
    }
}

/// Flat color, one RGB value per draw
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorShaderProgram;

impl ColorShaderProgram {
    pub fn set_uniforms(&self, frame: &mut Frame, mvp: Mat4, r: f32, g: f32, b: f32) -> Result<()> {
        frame.set_uniforms(Uniforms::Color {
            mvp,
            color: Vec3::new(r, g, b),
        })
    }
}

impl ShaderProgram for ColorShaderProgram {
    fn kind(&self) -> ProgramKind {
        ProgramKind::Color
    }
}

/// Samples a single texture
#[derive(Debug, Default, Clone, Copy)]
pub struct TextureShaderProgram;

impl TextureShaderProgram {
    pub fn set_uniforms(&self, frame: &mut Frame, mvp: Mat4, texture: TextureId) -> Result<()> {
        frame.set_uniforms(Uniforms::Texture { mvp, texture })
    }
}

impl ShaderProgram for TextureShaderProgram {
    fn kind(&self) -> ProgramKind {
        ProgramKind::Texture
    }
}

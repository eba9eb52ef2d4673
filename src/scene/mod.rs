//! Scene renderer
//!
//! Owns the camera matrices and the per-frame draw sequence, and turns touch
//! presses into mallet picks. Host callbacks arrive strictly in sequence:
//! surface created, surface changed, then frames and touches interleaved.

pub mod camera;
pub mod frame;
pub mod picking;
pub mod programs;

pub use camera::{Rotation, SceneState};
pub use frame::{DrawCall, Frame, MeshKind, ProgramKind, TextureId, Uniforms};
pub use picking::{PickState, build_pick_ray, mallet_bounding_sphere, normalized_touch};
pub use programs::{ColorShaderProgram, ShaderProgram, TextureShaderProgram};

use glam::Vec3;

use crate::consts::*;
use crate::error::{AirHockeyError, Result};
use crate::objects::vertex::colors;
use crate::objects::{Drawable, Mallet, Mesh, Puck, Table};
use crate::settings::Settings;
use crate::texture::{TextureImage, TextureSource};

/// GPU-side resources the scene needs created once per surface
pub trait RenderResources {
    fn load_texture(&mut self, image: &TextureImage) -> Result<TextureId>;

    fn upload_mesh(&mut self, kind: MeshKind, mesh: &Mesh) -> Result<()>;
}

/// Resources kept in memory only, for running the scene without a GPU
#[derive(Debug, Default)]
pub struct CpuResources {
    pub textures: Vec<(u32, u32)>,
    pub meshes: Vec<(MeshKind, u32)>,
}

impl RenderResources for CpuResources {
    fn load_texture(&mut self, image: &TextureImage) -> Result<TextureId> {
        self.textures.push((image.width, image.height));
        Ok(TextureId(self.textures.len() as u32 - 1))
    }

    fn upload_mesh(&mut self, kind: MeshKind, mesh: &Mesh) -> Result<()> {
        self.meshes.push((kind, mesh.vertex_count()));
        Ok(())
    }
}

/// Everything created with the surface
struct SceneObjects {
    table: Table,
    mallet: Mallet,
    puck: Puck,
    texture_program: TextureShaderProgram,
    color_program: ColorShaderProgram,
    texture: TextureId,
    blue_mallet_position: Vec3,
}

pub struct AirHockeyRenderer {
    clear_color: [f32; 4],
    texture_source: TextureSource,
    mesh_points: u32,
    scene: SceneState,
    objects: Option<SceneObjects>,
    pick_state: PickState,
}

impl AirHockeyRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            clear_color: settings.clear_color,
            texture_source: settings.texture.clone(),
            mesh_points: settings.mesh_points,
            scene: SceneState::new(),
            objects: None,
            pick_state: PickState::NotPressed,
        }
    }

    /// Build meshes and programs, upload them and load the table texture
    ///
    /// A texture that fails to load aborts surface creation.
    pub fn on_surface_created(&mut self, resources: &mut impl RenderResources) -> Result<()> {
        let table = Table::new();
        let mallet = Mallet::new(MALLET_RADIUS, MALLET_HEIGHT, self.mesh_points);
        let puck = Puck::new(PUCK_RADIUS, PUCK_HEIGHT, self.mesh_points);

        resources.upload_mesh(MeshKind::Table, table.mesh())?;
        resources.upload_mesh(MeshKind::Mallet, mallet.mesh())?;
        resources.upload_mesh(MeshKind::Puck, puck.mesh())?;

        let image = self.texture_source.load()?;
        let texture = resources.load_texture(&image)?;

        let blue_mallet_position = Vec3::new(0.0, mallet.height / 2.0, MALLET_OFFSET_Z);

        self.objects = Some(SceneObjects {
            table,
            mallet,
            puck,
            texture_program: TextureShaderProgram,
            color_program: ColorShaderProgram,
            texture,
            blue_mallet_position,
        });
        self.pick_state = PickState::NotPressed;
        log::info!("Surface created ({} mesh points)", self.mesh_points);
        Ok(())
    }

    /// Rebuild the projection for the new viewport; the view stays fixed
    pub fn on_surface_changed(&mut self, width: u32, height: u32) -> Result<()> {
        self.scene.resize(width, height)?;
        self.scene.init_view();
        log::info!("Surface changed to {}x{}", width, height);
        Ok(())
    }

    /// Record this frame's draw sequence
    ///
    /// A singular view-projection only disables picking for the frame.
    pub fn on_draw_frame(&mut self) -> Result<Frame> {
        let objects = self
            .objects
            .as_ref()
            .ok_or(AirHockeyError::DrawState("surface not created"))?;
        let scene = &mut self.scene;

        let mut frame = Frame::new();
        frame.clear(self.clear_color);

        match scene.begin_frame() {
            Ok(()) => frame.set_picking_available(true),
            Err(e) => log::warn!("Picking disabled this frame: {}", e),
        }

        // Table
        let mvp = scene.position_and_compose(
            Vec3::ZERO,
            Some(Rotation::new(Vec3::X, TABLE_ROTATION_DEGREES)),
        );
        objects.texture_program.use_program(&mut frame);
        objects
            .texture_program
            .set_uniforms(&mut frame, mvp, objects.texture)?;
        objects.table.bind_data(&mut frame, &objects.texture_program);
        objects.table.draw(&mut frame)?;

        // Far mallet
        let mallet_y = objects.mallet.height / 2.0;
        let mvp = scene.position_and_compose(Vec3::new(0.0, mallet_y, -MALLET_OFFSET_Z), None);
        let c = colors::FAR_MALLET;
        objects.color_program.use_program(&mut frame);
        objects
            .color_program
            .set_uniforms(&mut frame, mvp, c.x, c.y, c.z)?;
        objects.mallet.bind_data(&mut frame, &objects.color_program);
        objects.mallet.draw(&mut frame)?;

        // Near (player) mallet reuses the bound mesh
        let mvp = scene.position_and_compose(objects.blue_mallet_position, None);
        let c = colors::NEAR_MALLET;
        objects
            .color_program
            .set_uniforms(&mut frame, mvp, c.x, c.y, c.z)?;
        objects.mallet.draw(&mut frame)?;

        // Puck
        let mvp = scene.position_and_compose(Vec3::new(0.0, objects.puck.height / 2.0, 0.0), None);
        let c = colors::PUCK;
        objects
            .color_program
            .set_uniforms(&mut frame, mvp, c.x, c.y, c.z)?;
        objects.puck.bind_data(&mut frame, &objects.color_program);
        objects.puck.draw(&mut frame)?;

        Ok(frame)
    }

    /// Test a press against the player mallet and record the result
    ///
    /// Without a valid camera inverse the press is dropped and the mallet
    /// counts as not pressed.
    pub fn handle_touch_press(
        &mut self,
        normalized_x: f32,
        normalized_y: f32,
    ) -> Result<PickState> {
        let Some(objects) = self.objects.as_ref() else {
            self.pick_state = PickState::NotPressed;
            return Err(AirHockeyError::PickingUnavailable);
        };
        let sphere = mallet_bounding_sphere(objects.blue_mallet_position, objects.mallet.height);

        match self.scene.pick(normalized_x, normalized_y, &sphere) {
            Ok(hit) => {
                self.pick_state = hit.into();
                log::debug!(
                    "Touch press at ({:.3}, {:.3}): {:?}",
                    normalized_x,
                    normalized_y,
                    self.pick_state
                );
                Ok(self.pick_state)
            }
            Err(e) => {
                log::warn!("Touch press ignored: {}", e);
                self.pick_state = PickState::NotPressed;
                Err(e)
            }
        }
    }

    /// Drag input is accepted but moves nothing; pick state is unchanged
    pub fn handle_touch_drag(&mut self, normalized_x: f32, normalized_y: f32) {
        log::trace!(
            "Touch drag at ({:.3}, {:.3}) while {:?}",
            normalized_x,
            normalized_y,
            self.pick_state
        );
    }

    pub fn pick_state(&self) -> PickState {
        self.pick_state
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    /// Where the player's mallet rests, once the surface exists
    pub fn player_mallet_position(&self) -> Option<Vec3> {
        self.objects.as_ref().map(|o| o.blue_mallet_position)
    }
}

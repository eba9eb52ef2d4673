//! Air Hockey entry point
//!
//! Runs the scene headless: builds the surface, records a frame, replays it
//! on the GPU when one is available and exercises touch picking.

use std::path::Path;

use air_hockey::renderer::{GpuRenderer, OffscreenTarget, request_headless_adapter};
use air_hockey::scene::CpuResources;
use air_hockey::settings::SETTINGS_FILE;
use air_hockey::{AirHockeyRenderer, Result, Settings, matrix};

fn run() -> Result<()> {
    let path = Path::new(SETTINGS_FILE);
    let settings = Settings::load(path)?;
    if !path.exists() {
        // Leave an editable copy of the defaults behind
        if let Err(e) = settings.save(path) {
            log::warn!("Could not write {}: {}", path.display(), e);
        }
    }
    let (width, height) = settings.headless_size;
    let mut renderer = AirHockeyRenderer::new(&settings);

    let gpu = match pollster::block_on(async {
        let adapter = request_headless_adapter().await?;
        GpuRenderer::new(&adapter, wgpu::TextureFormat::Rgba8UnormSrgb).await
    }) {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            log::warn!("No GPU available, recording frames only: {}", e);
            None
        }
    };

    let mut gpu = match gpu {
        Some(mut gpu) => {
            renderer.on_surface_created(&mut gpu)?;
            Some(gpu)
        }
        None => {
            let mut resources = CpuResources::default();
            renderer.on_surface_created(&mut resources)?;
            None
        }
    };
    renderer.on_surface_changed(width, height)?;

    let frame = renderer.on_draw_frame()?;
    log::info!(
        "Recorded {} draw calls (picking {})",
        frame.draws().len(),
        if frame.picking_available() { "on" } else { "off" }
    );

    if let Some(gpu) = gpu.as_mut() {
        let target = OffscreenTarget::new(&gpu.device, width, height, gpu.format);
        gpu.render(&frame, &target.view);
        log::info!("Rendered frame to {}x{} offscreen target", target.size.0, target.size.1);
    }

    // Press on the player's mallet, then somewhere far from it
    if let Some(center) = renderer.player_mallet_position() {
        let ndc = matrix::divide_by_w(*renderer.scene().view_projection() * center.extend(1.0))?;
        let state = renderer.handle_touch_press(ndc.x, ndc.y)?;
        log::info!("Press at ({:.3}, {:.3}): {:?}", ndc.x, ndc.y, state);
    }
    let state = renderer.handle_touch_press(0.9, 0.9)?;
    log::info!("Press at (0.900, 0.900): {:?}", state);
    renderer.handle_touch_drag(0.5, 0.5);

    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Air Hockey (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

//! Interactive window driven by the macroquad backend.

use anyhow::{Context, Result};
use lifegrid_core::{CellCoord, Viewport};
use lifegrid_rendering::{FrameRenderer, Presentation, RenderingBackend, Scene};
use lifegrid_rendering_macroquad::MacroquadBackend;
use lifegrid_system_playback::TickScheduler;
use lifegrid_system_session::Session;
use tracing::info;

use crate::{
    config::Settings,
    controls::{apply_input, plant_seeds, status_of},
};

/// Backend switches taken from the command line.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WindowOptions {
    pub(crate) show_fps: bool,
    pub(crate) show_guide: bool,
    pub(crate) vsync: Option<bool>,
}

/// Opens the window and runs the session until the user quits.
pub(crate) fn run(
    settings: Settings,
    viewport: Viewport,
    alive: &[CellCoord],
    options: WindowOptions,
) -> Result<()> {
    let mut session = Session::new(
        &settings.simulation,
        viewport,
        TickScheduler::new(),
        FrameRenderer::new(settings.palette),
    )
    .context("window is too small for a single cell")?;
    info!(
        width = session.grid().width(),
        height = session.grid().height(),
        seeds = alive.len(),
        "opening window"
    );

    let scene = Scene {
        frame: session.renderer_mut().take_frame().unwrap_or_default(),
        status: status_of(&session),
    };
    let presentation = Presentation::new("Lifegrid", viewport, settings.palette.background, scene);

    let mut backend = MacroquadBackend::new()
        .with_show_fps(options.show_fps)
        .with_guide(options.show_guide);
    if let Some(vsync) = options.vsync {
        backend = backend.with_vsync(vsync);
    }

    // The window may open at a different size than requested, which re-creates
    // the grid on the first frame.
    let mut pending_seeds = Some(alive.to_vec());
    backend.run(presentation, move |dt, input, scene| {
        apply_input(&mut session, &input);
        if let Some(seeds) = pending_seeds.take() {
            plant_seeds(&mut session, &seeds);
        }
        let _ = session.advance(dt);
        if let Some(frame) = session.renderer_mut().take_frame() {
            scene.frame = frame;
        }
        scene.status = status_of(&session);
    })
}

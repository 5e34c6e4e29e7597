use std::time::Instant;

use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};
use plotters::prelude::*;
use tracing::{debug, info};

use crate::config::AnimationConfig;
use crate::draw::{PixelMap, Renderer};
use crate::error::{Error, Result};
use crate::interaction::{ClickDetector, TrailHighlight};
use crate::playback::{Playback, Tick};
use crate::scene::{FrameState, Scene};
use crate::table::TrajectoryTable;

/// On-screen playback. Click toggles pause, hovering a trail highlights it,
/// Escape or closing the window ends the run.
pub struct Viewer<'a> {
    config: &'a AnimationConfig,
    scene: Scene<'a>,
    renderer: Renderer<'a>,
    playback: Playback,
    highlight: TrailHighlight,
    clicks: ClickDetector,
}

impl<'a> Viewer<'a> {
    pub fn new(table: &'a TrajectoryTable, config: &'a AnimationConfig) -> Result<Self> {
        Ok(Viewer {
            config,
            scene: Scene::new(table),
            renderer: Renderer::new(config, table),
            playback: Playback::from_config(table.num_frames(), config)?,
            highlight: TrailHighlight::new(config.line_alpha, config.pick_radius),
            clicks: ClickDetector::default(),
        })
    }

    pub fn run(mut self) -> Result<()> {
        let (w, h) = self.config.size;
        let (width, height) = (w as usize, h as usize);
        let title = self.config.title.as_deref().unwrap_or("robots");

        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::Viewer(e.to_string()))?;
        window.set_target_fps(60);

        let mut rgb = vec![0u8; width * height * 3];
        let mut argb = vec![0u32; width * height];
        let mut state: Option<FrameState> = None;
        let mut map: Option<PixelMap> = None;

        info!(frames = self.scene.num_frames(), "animating robots");
        while window.is_open() && !window.is_key_down(Key::Escape) {
            let now = Instant::now();
            let mut dirty = false;

            if self.clicks.update(window.get_mouse_down(MouseButton::Left)) {
                let paused = self.playback.toggle_pause(now);
                debug!(paused, "toggled playback");
            }

            if let Tick::Frame(frame) = self.playback.tick(now) {
                state = Some(self.scene.render(frame)?);
                dirty = true;
            }

            if let (Some(pointer), Some(map), Some(state)) =
                (window.get_mouse_pos(MouseMode::Discard), &map, &state)
            {
                let trails = map.trail_pixels(state);
                let pointer = (pointer.0 as f64, pointer.1 as f64);
                if self
                    .highlight
                    .hover(pointer, trails.iter().map(|(id, t)| (*id, t.as_slice())))
                {
                    dirty = true;
                }
            }

            if let (true, Some(state)) = (dirty, &state) {
                let root = BitMapBackend::with_buffer(&mut rgb, (w, h)).into_drawing_area();
                map = Some(self.renderer.draw(&root, state, &self.highlight)?);
                root.present()?;
                drop(root);
                to_argb(&rgb, &mut argb);
            }

            window
                .update_with_buffer(&argb, width, height)
                .map_err(|e| Error::Viewer(e.to_string()))?;
        }

        Ok(())
    }
}

// Convert a plotters RGB buffer to a minifb buffer (u32 0RGB).
fn to_argb(rgb: &[u8], out: &mut [u32]) {
    rgb.chunks_exact(3).zip(out.iter_mut()).for_each(|(p, o)| {
        *o = (255u32 << 24) | ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32;
    });
}

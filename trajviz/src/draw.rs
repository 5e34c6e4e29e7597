use std::ops::Range;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::AnimationConfig;
use crate::error::Result;
use crate::interaction::TrailHighlight;
use crate::plotters_ext::DashedPath;
use crate::scene::{Bounds, ColorState, FrameState};
use crate::table::TrajectoryTable;

pub const DEFAULT_ROBOT_COLOR: RGBColor = RGBColor(65, 105, 225);
pub const COLLIDED_ROBOT_COLOR: RGBColor = RGBColor(255, 0, 0);

pub const TRAIL_PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const MARGIN: u32 = 10;
const X_LABEL_AREA: u32 = 30;
const Y_LABEL_AREA: u32 = 40;
const CAPTION_AREA: u32 = 30;
const DASH: u32 = 6;
const GAP: u32 = 4;

pub fn robot_color(state: ColorState) -> RGBColor {
    match state {
        ColorState::Default => DEFAULT_ROBOT_COLOR,
        ColorState::Collided => COLLIDED_ROBOT_COLOR,
    }
}

pub fn trail_color(robot_id: usize) -> RGBColor {
    TRAIL_PALETTE[robot_id % TRAIL_PALETTE.len()]
}

/// Data-to-pixel mapping of the plotting area drawn last.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelMap {
    bounds: Bounds,
    x_pixels: Range<i32>,
    y_pixels: Range<i32>,
}

impl PixelMap {
    pub fn new(bounds: Bounds, x_pixels: Range<i32>, y_pixels: Range<i32>) -> Self {
        PixelMap {
            bounds,
            x_pixels,
            y_pixels,
        }
    }

    pub fn to_pixel(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let b = &self.bounds;
        let px = self.x_pixels.start as f64
            + (x - b.x.0) / b.width() * (self.x_pixels.end - self.x_pixels.start) as f64;
        let py = self.y_pixels.end as f64
            - (y - b.y.0) / b.height() * (self.y_pixels.end - self.y_pixels.start) as f64;
        (px, py)
    }

    /// Every trail of the frame in pixel coordinates, keyed by robot id.
    pub fn trail_pixels(&self, state: &FrameState) -> Vec<(usize, Vec<(f64, f64)>)> {
        state
            .robots
            .iter()
            .map(|r| {
                let pixels = r.trail.iter().map(|p| self.to_pixel(*p)).collect();
                (r.robot_id, pixels)
            })
            .collect()
    }
}

pub struct Renderer<'a> {
    config: &'a AnimationConfig,
    bounds: Bounds,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a AnimationConfig, table: &TrajectoryTable) -> Self {
        let (width, height) = Self::plot_size(config);
        let bounds = config.axis.resolve(table).with_aspect(width, height);
        Renderer { config, bounds }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    // Nominal plotting area once margins, label areas and caption are taken out.
    fn plot_size(config: &AnimationConfig) -> (u32, u32) {
        let (mut width, mut height) = config.size;
        width = width.saturating_sub(2 * MARGIN);
        height = height.saturating_sub(2 * MARGIN);
        if config.labels {
            width = width.saturating_sub(Y_LABEL_AREA);
            height = height.saturating_sub(X_LABEL_AREA);
            if config.title.is_some() {
                height = height.saturating_sub(CAPTION_AREA);
            }
        }
        (width, height)
    }

    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        state: &FrameState,
        highlight: &TrailHighlight,
    ) -> Result<PixelMap> {
        root.fill(&WHITE)?;

        let b = self.bounds;
        let mut builder = ChartBuilder::on(root);
        builder.margin(MARGIN);
        if self.config.labels {
            if let Some(title) = &self.config.title {
                builder.caption(title, ("sans-serif", 20));
            }
            builder
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_LABEL_AREA);
        }
        let mut chart = builder.build_cartesian_2d(b.x.0..b.x.1, b.y.0..b.y.1)?;

        if self.config.labels {
            chart
                .configure_mesh()
                .x_desc("x [m]")
                .y_desc("y [m]")
                .axis_desc_style(("sans-serif", 15))
                .draw()?;
        }

        for robot in &state.robots {
            let style = trail_color(robot.robot_id)
                .mix(highlight.alpha(robot.robot_id))
                .stroke_width(1);
            chart.draw_series(std::iter::once(DashedPath::new(
                robot.trail.clone(),
                DASH,
                GAP,
                style,
            )))?;
        }

        let origin = chart.backend_coord(&(b.x.0, b.y.0));
        let edge = chart.backend_coord(&(b.x.0 + self.config.robot_radius, b.y.0));
        let radius = (edge.0 - origin.0).abs().max(1);

        chart.draw_series(state.robots.iter().map(|r| {
            Circle::new(r.position, radius, robot_color(r.color_state()).filled())
        }))?;
        chart.draw_series(
            state
                .robots
                .iter()
                .map(|r| Circle::new(r.position, radius, BLACK.stroke_width(1))),
        )?;

        let plotting_area = chart.plotting_area();
        if self.config.labels {
            let (x, y) = plotting_area.dim_in_pixel();
            let (xpos, ypos) = ((x as f32 / 10.0) as i32, (y as f32 / 10.0) as i32);
            plotting_area.strip_coord_spec().draw(&Text::new(
                format!("frame {}", state.frame),
                (xpos, ypos),
                ("sans-serif", 15),
            ))?;
        }

        let (x_pixels, y_pixels) = plotting_area.get_pixel_range();
        Ok(PixelMap::new(b, x_pixels, y_pixels))
    }
}

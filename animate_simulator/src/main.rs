use std::env;

use anyhow::{Context, Result};
use trajviz::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const ROBOT_POS_PATH: &str = "../robot_pos_2.2.csv";
const GIF_OUTPUT_PATH: &str = "robot_anim_2.2.gif";
const PLAY_BACK_SPEED: f64 = 0.25;
const FIELD_HALF_WIDTH: f64 = 3.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let input = args.next().unwrap_or_else(|| ROBOT_POS_PATH.to_string());
    let output = args.next().unwrap_or_else(|| GIF_OUTPUT_PATH.to_string());

    let options = LoadOptions::default().set_layout(TableLayout::Interleaved);
    let table = load_table(&input, &options)
        .with_context(|| format!("could not load robot positions from {}", input))?;

    let config = AnimationConfig::default()
        .set_speed(PLAY_BACK_SPEED)
        .set_axis(AxisMode::Fixed(Bounds::square(FIELD_HALF_WIDTH)));

    info!("Animating robots from {}", input);
    show(&table, &config)?;

    export_gif(&table, &output, &config)
        .with_context(|| format!("could not save gif to {}", output))?;
    Ok(())
}

#[cfg(feature = "viewer")]
fn show(table: &TrajectoryTable, config: &AnimationConfig) -> Result<()> {
    Viewer::new(table, config)?.run().context("viewer failed")
}

#[cfg(not(feature = "viewer"))]
fn show(_table: &TrajectoryTable, _config: &AnimationConfig) -> Result<()> {
    info!("built without the `viewer` feature, skipping on-screen playback");
    Ok(())
}

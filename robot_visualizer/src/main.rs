use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use trajviz::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const FILE_NAME: &str = "2_robot_pos";
const PLAY_BACK_SPEED: f64 = 1.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let input = args
        .next()
        .unwrap_or_else(|| format!("visualizer/data/{}.csv", FILE_NAME));
    let output = args
        .next()
        .unwrap_or_else(|| format!("visualizer/gif/{}.gif", FILE_NAME));

    let table = load_table(&input, &LoadOptions::default())
        .with_context(|| format!("could not load robot positions from {}", input))?;

    let config = AnimationConfig::default()
        .set_speed(PLAY_BACK_SPEED)
        .set_axis(AxisMode::Fit)
        .set_title(format!("{} robots", table.num_robots()));

    info!("Animating robots from {}", input);
    show(&table, &config)?;

    if let Some(dir) = Path::new(&output).parent() {
        fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;
    }
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

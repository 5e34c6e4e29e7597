use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::config::AnimationConfig;
use crate::draw::Renderer;
use crate::error::{Error, Result};
use crate::interaction::TrailHighlight;
use crate::scene::Scene;
use crate::table::TrajectoryTable;

/// Encodes every frame of the table, in order, at `config.gif_frame_rate`.
pub fn export_gif<P: AsRef<Path>>(
    table: &TrajectoryTable,
    path: P,
    config: &AnimationConfig,
) -> Result<()> {
    let path = path.as_ref();
    info!(path = %path.display(), frames = table.num_frames(), "saving gif of robots");

    let delay = config.gif_frame_delay_ms()?;
    let root = BitMapBackend::gif(path, config.size, delay)
        .map_err(|e| Error::Drawing(e.to_string()))?
        .into_drawing_area();

    let scene = Scene::new(table);
    let renderer = Renderer::new(config, table);
    let highlight = TrailHighlight::new(config.line_alpha, config.pick_radius);

    for frame in 0..scene.num_frames() {
        let state = scene.render(frame)?;
        renderer.draw(&root, &state, &highlight)?;
        root.present()?;
    }

    info!(path = %path.display(), "saved gif of robots");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{AxisMode, Bounds};
    use crate::table::{MissingRecordPolicy, RobotRecord};

    #[test]
    fn test_export_gif() {
        let records = (0..5)
            .flat_map(|frame| {
                let t = frame as f64 * 0.2;
                vec![
                    RobotRecord::new(frame, 0, (t, 0.0)),
                    RobotRecord::new(frame, 1, (0.0, t)),
                ]
            })
            .collect::<Vec<_>>();
        let table =
            TrajectoryTable::from_records(records, Vec::new(), MissingRecordPolicy::Error).unwrap();
        let config = AnimationConfig::default()
            .set_size(120, 90)
            .set_axis(AxisMode::Fixed(Bounds::square(1.5)))
            .set_labels(false);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("robot_anim.gif");
        export_gif(&table, &path, &config).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_export_gif_rejects_zero_frame_rate() {
        let records = vec![RobotRecord::new(0, 0, (0.0, 0.0))];
        let table =
            TrajectoryTable::from_records(records, Vec::new(), MissingRecordPolicy::Error).unwrap();
        let config = AnimationConfig::default()
            .set_gif_frame_rate(0.0)
            .set_labels(false);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("robot_anim.gif");
        let err = export_gif(&table, &path, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidGifRate(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_gif_to_missing_directory() {
        let records = vec![RobotRecord::new(0, 0, (0.0, 0.0))];
        let table =
            TrajectoryTable::from_records(records, Vec::new(), MissingRecordPolicy::Error).unwrap();
        let config = AnimationConfig::default().set_labels(false);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("robot_anim.gif");
        assert!(export_gif(&table, &path, &config).is_err());
    }
}

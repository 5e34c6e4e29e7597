use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::table::TrajectoryTable;

const PAD_FRACTION: f64 = 1.0 / 8.0;
const MIN_PAD: f64 = 1.0;

/// Axis-aligned plot limits in data units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Bounds {
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        Bounds { x, y }
    }

    pub fn square(half_width: f64) -> Self {
        Bounds::new((-half_width, half_width), (-half_width, half_width))
    }

    pub fn width(&self) -> f64 {
        self.x.1 - self.x.0
    }

    pub fn height(&self) -> f64 {
        self.y.1 - self.y.0
    }

    /// Grows each axis by an eighth of its span on both sides, never by less than one unit.
    pub fn padded(&self) -> Self {
        let x_offset = (PAD_FRACTION * self.width()).max(MIN_PAD);
        let y_offset = (PAD_FRACTION * self.height()).max(MIN_PAD);
        Bounds::new(
            (self.x.0 - x_offset, self.x.1 + x_offset),
            (self.y.0 - y_offset, self.y.1 + y_offset),
        )
    }

    /// Widens the shorter axis around its center so one data unit spans the
    /// same number of pixels horizontally and vertically.
    pub fn with_aspect(&self, pixel_width: u32, pixel_height: u32) -> Self {
        if pixel_width == 0 || pixel_height == 0 || self.width() <= 0.0 || self.height() <= 0.0 {
            return *self;
        }

        let target = pixel_width as f64 / pixel_height as f64;
        let current = self.width() / self.height();
        if current < target {
            let half = self.height() * target / 2.0;
            let center = (self.x.0 + self.x.1) / 2.0;
            Bounds::new((center - half, center + half), self.y)
        } else {
            let half = self.width() / target / 2.0;
            let center = (self.y.0 + self.y.1) / 2.0;
            Bounds::new(self.x, (center - half, center + half))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisMode {
    Fixed(Bounds),
    /// Data bounds with padding.
    Fit,
}

impl AxisMode {
    pub fn resolve(&self, table: &TrajectoryTable) -> Bounds {
        match self {
            AxisMode::Fixed(bounds) => *bounds,
            AxisMode::Fit => table.bounds().padded(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorState {
    Default,
    Collided,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RobotState {
    pub robot_id: usize,
    pub position: (f64, f64),
    /// Every recorded position up to and including the rendered frame.
    pub trail: Vec<(f64, f64)>,
    pub collided_with: Option<usize>,
    /// Position carried over from an earlier frame.
    pub held: bool,
}

impl RobotState {
    pub fn color_state(&self) -> ColorState {
        match self.collided_with {
            Some(_) => ColorState::Collided,
            None => ColorState::Default,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionReport {
    pub frame: usize,
    pub robot_id: usize,
    pub other_id: usize,
    pub relative_speed: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    pub frame: usize,
    pub robots: Vec<RobotState>,
    pub collisions: Vec<CollisionReport>,
}

pub fn relative_speed(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dvx = b.0 - a.0;
    let dvy = b.1 - a.1;
    (dvx.powi(2) + dvy.powi(2)).sqrt()
}

pub struct Scene<'a> {
    table: &'a TrajectoryTable,
}

impl<'a> Scene<'a> {
    pub fn new(table: &'a TrajectoryTable) -> Self {
        Scene { table }
    }

    pub fn table(&self) -> &'a TrajectoryTable {
        self.table
    }

    pub fn num_frames(&self) -> usize {
        self.table.num_frames()
    }

    pub fn render(&self, frame: usize) -> Result<FrameState> {
        if frame >= self.table.num_frames() {
            return Err(Error::FrameOutOfRange {
                frame,
                num_frames: self.table.num_frames(),
            });
        }

        let mut robots = Vec::with_capacity(self.table.num_robots());
        let mut collisions = Vec::new();

        for robot_id in 0..self.table.num_robots() {
            let path = self.table.path(robot_id);
            let upto = path.partition_point(|r| r.frame <= frame);
            let current = match upto.checked_sub(1).map(|i| &path[i]) {
                Some(record) => record,
                None => continue,
            };

            let held = current.frame != frame;
            if held {
                debug!(robot_id, frame, from = current.frame, "holding last position");
            }
            let collided_with = if held { None } else { current.collided_with };

            if let Some(other_id) = collided_with.filter(|other| *other > robot_id) {
                let speed = self.table.record(frame, other_id).and_then(|other| {
                    current
                        .velocity
                        .zip(other.velocity)
                        .map(|(a, b)| relative_speed(a, b))
                });
                match speed {
                    Some(speed) => info!(
                        frame,
                        "robot {} and robot {} have collided with a relative velocity of {:.3}m/s",
                        robot_id,
                        other_id,
                        speed
                    ),
                    None => info!(frame, "robot {} and robot {} have collided", robot_id, other_id),
                }
                collisions.push(CollisionReport {
                    frame,
                    robot_id,
                    other_id,
                    relative_speed: speed,
                });
            }

            robots.push(RobotState {
                robot_id,
                position: current.position,
                trail: path[..upto].iter().map(|r| r.position).collect(),
                collided_with,
                held,
            });
        }

        Ok(FrameState {
            frame,
            robots,
            collisions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{MissingRecordPolicy, RobotRecord};

    fn crossing_robots() -> TrajectoryTable {
        let mut records = Vec::new();
        for frame in 0..4 {
            let t = frame as f64;
            let mut a = RobotRecord::new(frame, 0, (t, 0.0)).set_velocity((1.0, 0.0));
            let mut b = RobotRecord::new(frame, 1, (3.0 - t, 1.0)).set_velocity((-2.0, 0.0));
            if frame == 2 {
                a = a.set_collided_with(1);
                b = b.set_collided_with(0);
            }
            records.push(a);
            records.push(b);
        }
        TrajectoryTable::from_records(records, Vec::new(), MissingRecordPolicy::Error).unwrap()
    }

    #[test]
    fn test_render_positions_match_frame_rows() {
        let table = crossing_robots();
        let scene = Scene::new(&table);

        for frame in 0..table.num_frames() {
            let state = scene.render(frame).unwrap();
            assert_eq!(state.frame, frame);
            assert_eq!(state.robots.len(), 2);
            for robot in &state.robots {
                let record = table.record(frame, robot.robot_id).unwrap();
                assert_eq!(robot.position, record.position);
                assert!(!robot.held);
            }
        }
    }

    #[test]
    fn test_trail_includes_current_frame() {
        let table = crossing_robots();
        let scene = Scene::new(&table);

        let state = scene.render(2).unwrap();
        assert_eq!(state.robots[0].trail, vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(state.robots[1].trail, vec![(3.0, 1.0), (2.0, 1.0), (1.0, 1.0)]);

        let first = scene.render(0).unwrap();
        assert_eq!(first.robots[0].trail, vec![(0.0, 0.0)]);
    }

    #[test]
    fn test_collision_color_follows_indicator() {
        let table = crossing_robots();
        let scene = Scene::new(&table);

        for frame in 0..table.num_frames() {
            let state = scene.render(frame).unwrap();
            let expected = if frame == 2 {
                ColorState::Collided
            } else {
                ColorState::Default
            };
            for robot in &state.robots {
                assert_eq!(robot.color_state(), expected);
            }
        }
    }

    #[test]
    fn test_collision_reported_once_per_pair() {
        let table = crossing_robots();
        let scene = Scene::new(&table);

        let state = scene.render(2).unwrap();
        assert_eq!(state.collisions.len(), 1);
        let report = state.collisions[0];
        assert_eq!((report.robot_id, report.other_id), (0, 1));
        assert_eq!(report.relative_speed, Some(3.0));

        assert!(scene.render(1).unwrap().collisions.is_empty());
    }

    #[test]
    fn test_collision_without_velocity() {
        let records = vec![
            RobotRecord::new(0, 0, (0.0, 0.0)).set_collided_with(1),
            RobotRecord::new(0, 1, (0.1, 0.0)).set_collided_with(0),
        ];
        let table =
            TrajectoryTable::from_records(records, Vec::new(), MissingRecordPolicy::Error).unwrap();
        let state = Scene::new(&table).render(0).unwrap();
        assert_eq!(state.collisions[0].relative_speed, None);
    }

    #[test]
    fn test_relative_speed() {
        assert_eq!(relative_speed((1.0, 2.0), (4.0, 6.0)), 5.0);
        assert_eq!(relative_speed((0.5, 0.5), (0.5, 0.5)), 0.0);
    }

    #[test]
    fn test_frame_out_of_range() {
        let table = crossing_robots();
        let err = Scene::new(&table).render(4).unwrap_err();
        assert!(matches!(err, Error::FrameOutOfRange { frame: 4, num_frames: 4 }));
    }

    #[test]
    fn test_hold_last_position() {
        let records = vec![
            RobotRecord::new(0, 0, (0.0, 0.0)),
            RobotRecord::new(1, 0, (1.0, 0.0)).set_collided_with(1),
            RobotRecord::new(1, 1, (5.0, 5.0)).set_collided_with(0),
            RobotRecord::new(3, 0, (3.0, 0.0)),
        ];
        let table =
            TrajectoryTable::from_records(records, Vec::new(), MissingRecordPolicy::HoldLast)
                .unwrap();
        let scene = Scene::new(&table);

        // robot 1 has not appeared yet
        let first = scene.render(0).unwrap();
        assert_eq!(first.robots.len(), 1);
        assert_eq!(first.robots[0].robot_id, 0);

        let held = scene.render(2).unwrap();
        let robot0 = &held.robots[0];
        assert!(robot0.held);
        assert_eq!(robot0.position, (1.0, 0.0));
        assert_eq!(robot0.color_state(), ColorState::Default);
        assert_eq!(robot0.trail, vec![(0.0, 0.0), (1.0, 0.0)]);
        assert!(held.collisions.is_empty());

        let last = scene.render(3).unwrap();
        assert_eq!(last.robots[1].position, (5.0, 5.0));
        assert!(last.robots[1].held);
        assert!(!last.robots[0].held);
    }

    #[test]
    fn test_padding() {
        let small = Bounds::new((0.0, 2.0), (-1.0, 1.0)).padded();
        assert_eq!(small, Bounds::new((-1.0, 3.0), (-2.0, 2.0)));

        let large = Bounds::new((0.0, 16.0), (0.0, 8.0)).padded();
        assert_eq!(large, Bounds::new((-2.0, 18.0), (-1.0, 9.0)));
    }

    #[test]
    fn test_aspect() {
        let wide = Bounds::new((0.0, 4.0), (0.0, 4.0)).with_aspect(200, 100);
        assert_eq!(wide, Bounds::new((-2.0, 6.0), (0.0, 4.0)));

        let tall = Bounds::new((0.0, 4.0), (0.0, 1.0)).with_aspect(100, 100);
        assert_eq!(tall, Bounds::new((0.0, 4.0), (-1.5, 2.5)));
    }

    #[test]
    fn test_axis_mode() {
        let table = crossing_robots();
        assert_eq!(
            AxisMode::Fixed(Bounds::square(3.0)).resolve(&table),
            Bounds::new((-3.0, 3.0), (-3.0, 3.0))
        );
        assert_eq!(
            AxisMode::Fit.resolve(&table),
            Bounds::new((-1.0, 4.0), (-1.0, 2.0))
        );
    }
}

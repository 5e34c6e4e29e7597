use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::error::{Error, Result};
use crate::scene::Bounds;

/// Lines of simulator preamble before the csv header row.
pub const DEFAULT_SKIP_ROWS: usize = 3;

/// `has_collided` value for a robot that touched nobody.
pub const NO_COLLISION: i64 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableLayout {
    /// One record per row: `frame, robot_id, x, y[, velocity_x, velocity_y][, has_collided]`.
    Tidy,
    /// One column per robot, rows alternating x and y for each frame.
    Interleaved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingRecordPolicy {
    /// Refuse to load a table with a gap.
    Error,
    /// Draw a robot at its last known position until its next record.
    HoldLast,
}

#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub layout: TableLayout,
    pub skip_rows: usize,
    pub missing: MissingRecordPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            layout: TableLayout::Tidy,
            skip_rows: DEFAULT_SKIP_ROWS,
            missing: MissingRecordPolicy::Error,
        }
    }
}

impl LoadOptions {
    pub fn set_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn set_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn set_missing(mut self, missing: MissingRecordPolicy) -> Self {
        self.missing = missing;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobotRecord {
    pub frame: usize,
    pub robot_id: usize,
    pub position: (f64, f64),
    pub velocity: Option<(f64, f64)>,
    pub collided_with: Option<usize>,
}

impl RobotRecord {
    pub fn new(frame: usize, robot_id: usize, position: (f64, f64)) -> Self {
        RobotRecord {
            frame,
            robot_id,
            position,
            velocity: None,
            collided_with: None,
        }
    }

    pub fn set_velocity(mut self, velocity: (f64, f64)) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn set_collided_with(mut self, other: usize) -> Self {
        self.collided_with = Some(other);
        self
    }
}

/// Every robot position of one recorded run, grouped by robot and ordered by frame.
#[derive(Clone, Debug)]
pub struct TrajectoryTable {
    paths: Vec<Vec<RobotRecord>>,
    names: Vec<String>,
    num_frames: usize,
    missing: MissingRecordPolicy,
}

impl TrajectoryTable {
    /// Builds a table from loose records, checking ids, duplicates and gaps.
    pub fn from_records(
        records: Vec<RobotRecord>,
        names: Vec<String>,
        missing: MissingRecordPolicy,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyTable);
        }

        let num_frames = records.iter().map(|r| r.frame).max().unwrap_or(0) + 1;
        let max_id = records.iter().map(|r| r.robot_id).max().unwrap_or(0);
        // ids are dense, so every robot owns at least one record
        if max_id >= records.len() {
            return Err(Error::SparseRobotIds {
                max_id,
                records: records.len(),
            });
        }
        let num_robots = max_id + 1;

        let mut paths: Vec<Vec<RobotRecord>> = vec![Vec::new(); num_robots];
        for record in records {
            if let Some(other) = record.collided_with {
                if other >= num_robots {
                    return Err(Error::UnknownCollisionPartner {
                        frame: record.frame,
                        robot: record.robot_id,
                        other,
                    });
                }
            }
            paths[record.robot_id].push(record);
        }

        for (robot, path) in paths.iter_mut().enumerate() {
            path.sort_by_key(|r| r.frame);
            if let Some(pair) = path.windows(2).find(|w| w[0].frame == w[1].frame) {
                return Err(Error::DuplicateRecord {
                    frame: pair[0].frame,
                    robot,
                });
            }

            if missing == MissingRecordPolicy::Error && path.len() < num_frames {
                let frame = path
                    .iter()
                    .enumerate()
                    .find(|(expected, r)| r.frame != *expected)
                    .map(|(expected, _)| expected)
                    .unwrap_or(path.len());
                return Err(Error::MissingRecord { frame, robot });
            }
        }

        let mut names = names;
        names.truncate(num_robots);
        while names.len() < num_robots {
            names.push(format!("robot {}", names.len()));
        }

        Ok(TrajectoryTable {
            paths,
            names,
            num_frames,
            missing,
        })
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn num_robots(&self) -> usize {
        self.paths.len()
    }

    pub fn missing_policy(&self) -> MissingRecordPolicy {
        self.missing
    }

    pub fn robot_name(&self, robot: usize) -> Option<&str> {
        self.names.get(robot).map(String::as_str)
    }

    /// The robot's records in frame order.
    pub fn path(&self, robot: usize) -> &[RobotRecord] {
        self.paths.get(robot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn record(&self, frame: usize, robot: usize) -> Option<&RobotRecord> {
        let path = self.path(robot);
        path.binary_search_by_key(&frame, |r| r.frame)
            .ok()
            .map(|i| &path[i])
    }

    /// All records ordered by `(frame, robot_id)`.
    pub fn records(&self) -> Vec<&RobotRecord> {
        let mut records = self.paths.iter().flatten().collect::<Vec<_>>();
        records.sort_by_key(|r| (r.frame, r.robot_id));
        records
    }

    pub fn bounds(&self) -> Bounds {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        self.paths.iter().flatten().for_each(|r| {
            x = (x.0.min(r.position.0), x.1.max(r.position.0));
            y = (y.0.min(r.position.1), y.1.max(r.position.1));
        });
        Bounds::new(x, y)
    }
}

pub fn load_table<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<TrajectoryTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let df = csv_options(options)
        .into_reader_with_file_handle(file)
        .finish()?;
    let table = lower(&df, options)?;

    info!(
        path = %path.display(),
        frames = table.num_frames(),
        robots = table.num_robots(),
        "loaded trajectory table"
    );
    Ok(table)
}

pub fn read_table(bytes: &[u8], options: &LoadOptions) -> Result<TrajectoryTable> {
    let df = csv_options(options)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    lower(&df, options)
}

fn csv_options(options: &LoadOptions) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(options.skip_rows)
}

fn lower(df: &DataFrame, options: &LoadOptions) -> Result<TrajectoryTable> {
    match options.layout {
        TableLayout::Tidy => {
            TrajectoryTable::from_records(tidy_records(df)?, Vec::new(), options.missing)
        }
        TableLayout::Interleaved => {
            let (records, names) = interleaved_records(df)?;
            TrajectoryTable::from_records(records, names, options.missing)
        }
    }
}

fn tidy_records(df: &DataFrame) -> Result<Vec<RobotRecord>> {
    let frames = index_column(df, "frame")?;
    let robots = index_column(df, "robot_id")?;
    let xs = float_column(df, "x")?;
    let ys = float_column(df, "y")?;

    let velocities = if has_column(df, "velocity_x") && has_column(df, "velocity_y") {
        let vx = float_column(df, "velocity_x")?;
        let vy = float_column(df, "velocity_y")?;
        Some(vx.into_iter().zip(vy).collect::<Vec<_>>())
    } else {
        None
    };

    let collided = if has_column(df, "has_collided") {
        Some(collision_column(df, "has_collided")?)
    } else {
        None
    };

    let records = (0..df.height())
        .map(|row| RobotRecord {
            frame: frames[row],
            robot_id: robots[row],
            position: (xs[row], ys[row]),
            velocity: velocities.as_ref().map(|v| v[row]),
            collided_with: collided.as_ref().and_then(|c| c[row]),
        })
        .collect();

    Ok(records)
}

fn interleaved_records(df: &DataFrame) -> Result<(Vec<RobotRecord>, Vec<String>)> {
    let height = df.height();
    if height % 2 != 0 {
        return Err(Error::OddInterleavedRows(height));
    }

    let mut records = Vec::with_capacity(height / 2 * df.width());
    let mut names = Vec::with_capacity(df.width());
    for (robot_id, series) in df.get_columns().iter().enumerate() {
        let name = series.name().to_string();
        let values = float_values(series, &name)?;
        values.chunks_exact(2).enumerate().for_each(|(frame, xy)| {
            records.push(RobotRecord::new(frame, robot_id, (xy[0], xy[1])));
        });
        names.push(name);
    }

    Ok((records, names))
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map_err(|_| Error::MissingColumn(name.to_string()))
}

fn float_values(series: &Series, name: &str) -> Result<Vec<f64>> {
    let casted = series.cast(&DataType::Float64)?;
    casted
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.filter(|v| v.is_finite()).ok_or_else(|| Error::MissingValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    float_values(column(df, name)?, name)
}

fn int_column(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    float_column(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
                return Err(Error::NonIntegral {
                    column: name.to_string(),
                    row,
                    value,
                });
            }
            Ok(value as i64)
        })
        .collect()
}

fn index_column(df: &DataFrame, name: &str) -> Result<Vec<usize>> {
    int_column(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            usize::try_from(value).map_err(|_| Error::NegativeIndex {
                column: name.to_string(),
                row,
                value,
            })
        })
        .collect()
}

fn collision_column(df: &DataFrame, name: &str) -> Result<Vec<Option<usize>>> {
    int_column(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            NO_COLLISION => Ok(None),
            v if v >= 0 => Ok(Some(v as usize)),
            v => Err(Error::NegativeIndex {
                column: name.to_string(),
                row,
                value: v,
            }),
        })
        .collect()
}

use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse trajectory csv: {0}")]
    Csv(#[from] PolarsError),

    #[error("column `{0}` not found")]
    MissingColumn(String),

    #[error("column `{column}` has no numeric value at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("column `{column}` has negative value {value} at row {row}")]
    NegativeIndex {
        column: String,
        row: usize,
        value: i64,
    },

    #[error("column `{column}` has non-integral value {value} at row {row}")]
    NonIntegral {
        column: String,
        row: usize,
        value: f64,
    },

    #[error("robot id {max_id} is out of range for a table of {records} records")]
    SparseRobotIds { max_id: usize, records: usize },

    #[error("robot {robot} has more than one record in frame {frame}")]
    DuplicateRecord { frame: usize, robot: usize },

    #[error("robot {robot} has no record in frame {frame}")]
    MissingRecord { frame: usize, robot: usize },

    #[error("robot {robot} in frame {frame} collided with unknown robot {other}")]
    UnknownCollisionPartner {
        frame: usize,
        robot: usize,
        other: usize,
    },

    #[error("interleaved table needs an even number of rows, got {0}")]
    OddInterleavedRows(usize),

    #[error("trajectory table is empty")]
    EmptyTable,

    #[error("frame {frame} is out of range (table has {num_frames} frames)")]
    FrameOutOfRange { frame: usize, num_frames: usize },

    #[error("invalid playback rate: frame rate {frame_rate}, speed {speed}")]
    InvalidRate { frame_rate: f64, speed: f64 },

    #[error("invalid gif frame rate {0}")]
    InvalidGifRate(f64),

    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("viewer failed: {0}")]
    Viewer(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Error::Drawing(err.to_string())
    }
}

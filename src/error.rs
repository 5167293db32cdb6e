use std::path::PathBuf;

use thiserror::Error;

use crate::detected_points::PointIdentifier;

pub type Result<T> = std::result::Result<T, FeaturePointError>;

#[derive(Error, Debug)]
pub enum FeaturePointError {
    #[error("identifier {0} appears more than once in a single point cloud")]
    DuplicateIdentifier(PointIdentifier),

    #[error("point cloud has {identifiers} identifiers but {points} points")]
    LengthMismatch { identifiers: usize, points: usize },

    #[error("more than one recorded frame at time {0}")]
    DuplicateTimestamp(i64),

    #[error("recorded frame file name is not a timestamp: {0}")]
    InvalidTimestamp(PathBuf),

    #[error("File IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rerun recording error: {0}")]
    Rerun(#[from] rerun::RecordingStreamError),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

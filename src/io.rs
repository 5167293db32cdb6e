use std::io::Write;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::session::SessionStats;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize, P: AsRef<Path>>(output_path: P, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(j.as_bytes())?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned, P: AsRef<Path>>(file_path: P) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Summary of a replayed session.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub source: String,
    pub max_points: usize,
    pub rejected_frames: usize,
    pub final_tracked: usize,
    pub mean_removed_per_frame: f64,
    #[serde(flatten)]
    pub stats: SessionStats,
}

impl ReplayReport {
    pub fn new(
        source: &str,
        max_points: usize,
        rejected_frames: usize,
        final_tracked: usize,
        stats: &SessionStats,
    ) -> ReplayReport {
        let applied = stats.frames.saturating_sub(stats.no_data_frames);
        let mean_removed_per_frame = if applied == 0 {
            0.0
        } else {
            stats.removed_total as f64 / applied as f64
        };
        ReplayReport {
            source: source.to_string(),
            max_points,
            rejected_frames,
            final_tracked,
            mean_removed_per_frame,
            stats: stats.clone(),
        }
    }
}

pub fn write_report<P: AsRef<Path>>(output_path: P, report: &ReplayReport) -> Result<()> {
    object_to_json(output_path, report)
}

use std::path::{Path, PathBuf};

use glob::glob;
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::detected_points::RecordedFrame;
use crate::error::{FeaturePointError, Result};
use crate::io::{object_from_json, object_to_json};

/// Parses the timestamp from a file path.
///
/// Assumes the filename (without extension) is a timestamp in nanoseconds.
fn path_to_timestamp(path: &Path) -> Result<i64> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| FeaturePointError::InvalidTimestamp(path.to_path_buf()))
}

fn json_filter(rp: glob::GlobResult) -> Option<PathBuf> {
    match rp {
        Ok(p) if p.is_file() => Some(p),
        _ => None,
    }
}

/// Loads a recorded session: one `<time_ns>.json` file per frame.
///
/// Files are decoded in parallel and returned in timestamp order. The
/// timestamp in the file name wins over the one stored in the file.
pub fn load_recorded_session<P: AsRef<Path>>(root_folder: P) -> Result<Vec<RecordedFrame>> {
    let root = root_folder.as_ref();
    if !root.is_dir() {
        return Err(FeaturePointError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", root.display()),
        )));
    }
    let pattern = format!(
        "{}/*.json",
        glob::Pattern::escape(root.to_string_lossy().as_ref())
    );
    let mut sorted_path: Vec<PathBuf> = glob(&pattern)?.filter_map(json_filter).collect();
    sorted_path.sort();
    log::trace!("loading {} frames from {}", sorted_path.len(), root.display());

    let mut frames = sorted_path
        .par_iter()
        .progress_count(sorted_path.len() as u64)
        .map(|path| -> Result<RecordedFrame> {
            let time_ns = path_to_timestamp(path)?;
            let mut frame: RecordedFrame = object_from_json(path)?;
            if frame.time_ns != time_ns {
                log::warn!(
                    "{} stores time {} but is named {}",
                    path.display(),
                    frame.time_ns,
                    time_ns
                );
                frame.time_ns = time_ns;
            }
            Ok(frame)
        })
        .collect::<Result<Vec<_>>>()?;
    frames.sort_by_key(|f| f.time_ns);
    Ok(frames)
}

/// Writes frames as `<time_ns>.json` files under `output_folder`.
///
/// Each frame needs its own timestamp, otherwise nothing is written.
pub fn save_recorded_session<P: AsRef<Path>>(
    output_folder: P,
    frames: &[RecordedFrame],
) -> Result<()> {
    let mut times: Vec<i64> = frames.iter().map(|f| f.time_ns).collect();
    times.sort_unstable();
    if let Some(pair) = times.windows(2).find(|w| w[0] == w[1]) {
        return Err(FeaturePointError::DuplicateTimestamp(pair[0]));
    }

    let root = output_folder.as_ref();
    std::fs::create_dir_all(root)?;
    frames.par_iter().try_for_each(|frame| {
        object_to_json(root.join(format!("{}.json", frame.time_ns)), frame)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_from_file_stem() {
        assert_eq!(
            path_to_timestamp(Path::new("/tmp/session/1500000000.json")).unwrap(),
            1500000000
        );
        assert!(matches!(
            path_to_timestamp(Path::new("/tmp/session/notes.json")),
            Err(FeaturePointError::InvalidTimestamp(_))
        ));
    }
}

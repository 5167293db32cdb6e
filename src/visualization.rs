use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rerun::{RecordingStream, TimeCell};

use crate::detected_points::{Point3D, PointIdentifier};
use crate::feature_points::TrackedPointSet;
use crate::renderer::NodeRenderer;

/// Stable pseudo-random color for an identifier.
pub fn id_to_color(id: PointIdentifier) -> [u8; 4] {
    let mut rng = ChaCha8Rng::seed_from_u64(id);
    let color_num = rng.random_range(0..2u32.pow(24));
    [
        ((color_num >> 16) % 256) as u8,
        ((color_num >> 8) % 256) as u8,
        (color_num % 256) as u8,
        255,
    ]
}

pub fn set_frame_time(recording: &RecordingStream, time_ns: i64) {
    recording.set_time(
        "stable",
        TimeCell::from_timestamp_nanos_since_epoch(time_ns),
    );
}

/// Logs the whole tracked set as a single point cloud entity.
pub fn log_tracked_points(
    recording: &RecordingStream,
    topic: &str,
    points: &TrackedPointSet,
) -> rerun::RecordingStreamResult<()> {
    let (positions, colors_labels): (Vec<_>, Vec<_>) = points
        .iter()
        .map(|(id, p)| (p.to_array(), (id_to_color(id), id.to_string())))
        .unzip();
    let (colors, labels): (Vec<_>, Vec<_>) = colors_labels.into_iter().unzip();

    recording.log(
        format!("{}/cloud", topic),
        &rerun::Points3D::new(positions)
            .with_colors(colors)
            .with_labels(labels)
            .with_radii([rerun::Radius::new_ui_points(3.0)]),
    )
}

pub fn point_entity_path(topic: &str, id: PointIdentifier) -> String {
    format!("{}/points/{}", topic, id)
}

pub fn points_root_path(topic: &str) -> String {
    format!("{}/points", topic)
}

/// Renders every tracked point as its own entity `<topic>/points/<id>`, so
/// removals map onto `Clear` of that entity.
pub struct RerunPointRenderer {
    recording: RecordingStream,
    topic: String,
    failed_logs: usize,
}

impl RerunPointRenderer {
    pub fn new(recording: RecordingStream, topic: &str) -> RerunPointRenderer {
        RerunPointRenderer {
            recording,
            topic: topic.to_string(),
            failed_logs: 0,
        }
    }

    /// Number of log calls the recording stream refused.
    pub fn failed_logs(&self) -> usize {
        self.failed_logs
    }

    fn log_or_count<AS: ?Sized + rerun::AsComponents>(&mut self, path: String, archetype: &AS) {
        if let Err(e) = self.recording.log(path.as_str(), archetype) {
            log::warn!("failed to log {}: {}", path, e);
            self.failed_logs += 1;
        }
    }
}

impl NodeRenderer for RerunPointRenderer {
    fn remove_node(&mut self, id: PointIdentifier) {
        let path = point_entity_path(&self.topic, id);
        self.log_or_count(path, &rerun::Clear::flat());
    }

    fn upsert_node(&mut self, id: PointIdentifier, position: Point3D) {
        let points = rerun::Points3D::new([position.to_array()])
            .with_colors([id_to_color(id)])
            .with_radii([rerun::Radius::new_ui_points(5.0)]);
        let path = point_entity_path(&self.topic, id);
        self.log_or_count(path, &points);
    }

    fn clear_nodes(&mut self) {
        let path = points_root_path(&self.topic);
        self.log_or_count(path, &rerun::Clear::recursive());
    }
}

use serde::Serialize;

use crate::detected_points::{Frame, PointIdentifier};
use crate::error::Result;
use crate::feature_points::FeaturePointsManager;
use crate::renderer::NodeRenderer;

/// What one frame did to the tracked set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameUpdate {
    pub removed: Vec<PointIdentifier>,
    pub tracked: usize,
    pub truncated: usize,
    pub no_data: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub frames: usize,
    pub no_data_frames: usize,
    /// Points dropped from the tracked set, including those cleared by
    /// no-data frames.
    pub removed_total: usize,
    pub max_tracked: usize,
    pub truncated_frames: usize,
}

/// Drives a [`FeaturePointsManager`] from a frame source and mirrors the
/// result into a [`NodeRenderer`].
pub struct FeaturePointSession<R: NodeRenderer> {
    manager: FeaturePointsManager,
    renderer: R,
    stats: SessionStats,
}

impl<R: NodeRenderer> FeaturePointSession<R> {
    pub fn new(manager: FeaturePointsManager, renderer: R) -> Self {
        Self {
            manager,
            renderer,
            stats: SessionStats::default(),
        }
    }

    /// Applies one frame. A rejected point cloud leaves both the manager and
    /// the renderer untouched.
    pub fn on_frame(&mut self, frame: Frame) -> Result<FrameUpdate> {
        let cloud = match frame {
            Frame::PointCloud(cloud) => cloud,
            Frame::NoData => {
                let cleared = self.manager.snapshot().len();
                log::debug!("no frame data, clearing {} feature point nodes", cleared);
                self.manager.reset();
                self.renderer.clear_nodes();
                self.stats.frames += 1;
                self.stats.no_data_frames += 1;
                self.stats.removed_total += cleared;
                return Ok(FrameUpdate {
                    no_data: true,
                    ..Default::default()
                });
            }
        };

        let removed = self.manager.update_from_cloud(&cloud)?;
        for id in &removed {
            self.renderer.remove_node(*id);
        }
        for (id, position) in self.manager.snapshot().iter() {
            self.renderer.upsert_node(id, *position);
        }

        let update = FrameUpdate {
            removed,
            tracked: self.manager.snapshot().len(),
            truncated: self.manager.last_truncated(),
            no_data: false,
        };
        self.stats.frames += 1;
        self.stats.removed_total += update.removed.len();
        self.stats.max_tracked = self.stats.max_tracked.max(update.tracked);
        if update.truncated > 0 {
            self.stats.truncated_frames += 1;
        }
        Ok(update)
    }

    pub fn manager(&self) -> &FeaturePointsManager {
        &self.manager
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

use glam::Vec3;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::detected_points::{PointIdentifier, RawPointCloud, RecordedFrame};

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub num_frames: usize,
    /// New points appearing per frame.
    pub spawn_rate: usize,
    /// Mean number of frames a point stays visible.
    pub lifetime: usize,
    /// Every n-th frame reports no data and drops all points. 0 disables.
    pub no_data_every: usize,
    pub frame_interval_ns: i64,
    /// Half width of the cube points are spawned in, in meters.
    pub extent: f32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_frames: 120,
            spawn_rate: 40,
            lifetime: 10,
            no_data_every: 0,
            frame_interval_ns: 33_333_333,
            extent: 2.0,
        }
    }
}

impl SyntheticConfig {
    /// Usable half width: the magnitude of `extent`, or zero when it is not finite.
    pub fn spawn_extent(&self) -> f32 {
        if self.extent.is_finite() {
            self.extent.abs()
        } else {
            log::warn!("ignoring non-finite extent {}", self.extent);
            0.0
        }
    }
}

struct LivePoint {
    id: PointIdentifier,
    position: Vec3,
    frames_left: usize,
}

/// Generates a tracker-like session: identifiers are handed out with gaps,
/// points drift a little each frame and each cloud is delivered unordered.
pub fn generate_session(config: &SyntheticConfig) -> Vec<RecordedFrame> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut live: Vec<LivePoint> = Vec::new();
    let mut next_id: PointIdentifier = rng.random_range(0..1000);
    let max_lifetime = config.lifetime.max(1) * 2;
    let extent = config.spawn_extent();

    (0..config.num_frames)
        .map(|frame_idx| {
            let time_ns = frame_idx as i64 * config.frame_interval_ns;
            if config.no_data_every > 0 && (frame_idx + 1) % config.no_data_every == 0 {
                live.clear();
                return RecordedFrame {
                    time_ns,
                    cloud: None,
                };
            }

            for _ in 0..config.spawn_rate {
                let position = Vec3::new(
                    rng.random_range(-extent..=extent),
                    rng.random_range(-extent..=extent),
                    rng.random_range(-extent..=extent),
                );
                live.push(LivePoint {
                    id: next_id,
                    position,
                    frames_left: rng.random_range(1..=max_lifetime),
                });
                next_id += rng.random_range(1..4);
            }

            let mut pairs: Vec<_> = live
                .iter_mut()
                .map(|p| {
                    let jitter = Vec3::new(
                        rng.random_range(-0.005..0.005),
                        rng.random_range(-0.005..0.005),
                        rng.random_range(-0.005..0.005),
                    );
                    p.position += jitter;
                    p.frames_left -= 1;
                    (p.id, p.position)
                })
                .collect();
            live.retain(|p| p.frames_left > 0);
            pairs.shuffle(&mut rng);

            RecordedFrame {
                time_ns,
                cloud: Some(pairs.into_iter().collect::<RawPointCloud>()),
            }
        })
        .collect()
}

use std::collections::BTreeMap;

use crate::config::FeaturePointsConfig;
use crate::detected_points::{Point3D, PointIdentifier, RawPointCloud};
use crate::error::{FeaturePointError, Result};

/// Default number of feature points kept per frame. Larger clouds are too
/// expensive to mirror as scene nodes every frame.
pub const MAX_POINTS: usize = 200;

/// Read-only mapping from identifier to position, iterated in ascending
/// identifier order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedPointSet {
    points: BTreeMap<PointIdentifier, Point3D>,
}

impl TrackedPointSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: PointIdentifier) -> Option<&Point3D> {
        self.points.get(&id)
    }

    pub fn contains(&self, id: PointIdentifier) -> bool {
        self.points.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PointIdentifier, &Point3D)> + '_ {
        self.points.iter().map(|(id, p)| (*id, p))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = PointIdentifier> + '_ {
        self.points.keys().copied()
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3D> + '_ {
        self.points.values()
    }
}

/// Keeps a bounded set of feature points and reports which ones disappeared
/// between consecutive frames.
///
/// When a frame carries more than `capacity` points, only the numerically
/// smallest identifiers are kept. The tracker does not promise monotonic
/// identifier assignment, so this is not "keep the oldest points". It is a
/// deterministic cut that is cheap to compute. An eviction policy based on
/// age or camera distance would be a better fit if relevance matters.
#[derive(Debug, Clone)]
pub struct FeaturePointsManager {
    capacity: usize,
    current: TrackedPointSet,
    last_truncated: usize,
}

impl Default for FeaturePointsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FeaturePointsManager {
    pub fn new() -> FeaturePointsManager {
        Self::with_capacity(MAX_POINTS)
    }

    pub fn with_capacity(capacity: usize) -> FeaturePointsManager {
        FeaturePointsManager {
            capacity,
            current: TrackedPointSet::default(),
            last_truncated: 0,
        }
    }

    pub fn from_config(config: &FeaturePointsConfig) -> FeaturePointsManager {
        Self::with_capacity(config.max_points)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Replaces the tracked set with a capacity-limited copy of `raw_points`
    /// and returns the identifiers that are no longer tracked, ascending.
    ///
    /// A batch containing the same identifier twice is rejected with
    /// [`FeaturePointError::DuplicateIdentifier`] and the tracked set is left
    /// as it was.
    pub fn update<I>(&mut self, raw_points: I) -> Result<Vec<PointIdentifier>>
    where
        I: IntoIterator<Item = (PointIdentifier, Point3D)>,
    {
        let mut candidate = sorted_candidates(raw_points)?;

        let truncated = candidate.len().saturating_sub(self.capacity);
        if truncated > 0 {
            log::debug!(
                "dropping {} of {} feature points over capacity {}",
                truncated,
                candidate.len(),
                self.capacity
            );
            candidate.truncate(self.capacity);
        }

        let removed = removed_identifiers(&self.current.points, &candidate);
        self.current = TrackedPointSet {
            points: candidate.into_iter().collect(),
        };
        self.last_truncated = truncated;
        log::trace!(
            "tracking {} feature points, {} removed",
            self.current.len(),
            removed.len()
        );
        Ok(removed)
    }

    /// Same as [`update`](Self::update) for a tracker-shaped cloud.
    pub fn update_from_cloud(&mut self, cloud: &RawPointCloud) -> Result<Vec<PointIdentifier>> {
        self.update(cloud.pairs()?)
    }

    /// Forgets every tracked point. Drawables must be cleared by the caller.
    pub fn reset(&mut self) {
        self.current = TrackedPointSet::default();
        self.last_truncated = 0;
    }

    pub fn snapshot(&self) -> &TrackedPointSet {
        &self.current
    }

    /// Number of points cut by the capacity limit on the last update.
    pub fn last_truncated(&self) -> usize {
        self.last_truncated
    }

    /// Builds the uncapped mapping of a raw cloud.
    pub fn convert(cloud: &RawPointCloud) -> Result<TrackedPointSet> {
        let candidate = sorted_candidates(cloud.pairs()?)?;
        Ok(TrackedPointSet {
            points: candidate.into_iter().collect(),
        })
    }
}

/// Sorts a raw batch by identifier and rejects it if any identifier repeats.
/// The reported duplicate is the smallest one.
fn sorted_candidates<I>(raw_points: I) -> Result<Vec<(PointIdentifier, Point3D)>>
where
    I: IntoIterator<Item = (PointIdentifier, Point3D)>,
{
    let mut candidate: Vec<_> = raw_points.into_iter().collect();
    candidate.sort_unstable_by_key(|(id, _)| *id);
    if let Some(pair) = candidate.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(FeaturePointError::DuplicateIdentifier(pair[0].0));
    }
    Ok(candidate)
}

/// Keys of `previous` missing from `retained`. Both sides are ascending, so
/// a single merge pass is enough.
fn removed_identifiers(
    previous: &BTreeMap<PointIdentifier, Point3D>,
    retained: &[(PointIdentifier, Point3D)],
) -> Vec<PointIdentifier> {
    let mut retained_ids = retained.iter().map(|(id, _)| *id).peekable();
    previous
        .keys()
        .copied()
        .filter(|id| {
            while retained_ids.next_if(|r| r < id).is_some() {}
            retained_ids.peek() != Some(id)
        })
        .collect()
}

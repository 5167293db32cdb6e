use serde::{Deserialize, Serialize};

use crate::feature_points::MAX_POINTS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturePointsConfig {
    /// Upper bound on the number of points kept per frame.
    pub max_points: usize,
}

impl Default for FeaturePointsConfig {
    fn default() -> Self {
        Self {
            max_points: MAX_POINTS,
        }
    }
}

impl FeaturePointsConfig {
    pub fn with_max_points(max_points: usize) -> Self {
        Self { max_points }
    }
}

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{FeaturePointError, Result};

/// Identifier assigned by the tracking subsystem. Unique among the points
/// tracked in one session, may be reused after a reset.
pub type PointIdentifier = u64;

/// World-space position of a feature point.
pub type Point3D = Vec3;

/// Raw per-frame point cloud as delivered by the tracker: two parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPointCloud {
    pub identifiers: Vec<PointIdentifier>,
    pub points: Vec<Point3D>,
}

impl RawPointCloud {
    pub fn new(identifiers: Vec<PointIdentifier>, points: Vec<Point3D>) -> RawPointCloud {
        RawPointCloud {
            identifiers,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Zips identifiers with positions.
    ///
    /// Fails if the two arrays disagree in length.
    pub fn pairs(&self) -> Result<impl Iterator<Item = (PointIdentifier, Point3D)> + '_> {
        if self.identifiers.len() != self.points.len() {
            return Err(FeaturePointError::LengthMismatch {
                identifiers: self.identifiers.len(),
                points: self.points.len(),
            });
        }
        Ok(self
            .identifiers
            .iter()
            .copied()
            .zip(self.points.iter().copied()))
    }
}

impl FromIterator<(PointIdentifier, Point3D)> for RawPointCloud {
    fn from_iter<I: IntoIterator<Item = (PointIdentifier, Point3D)>>(iter: I) -> Self {
        let (identifiers, points) = iter.into_iter().unzip();
        RawPointCloud {
            identifiers,
            points,
        }
    }
}

/// One delivery from the frame source.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    PointCloud(RawPointCloud),
    /// Tracking is temporarily unavailable.
    NoData,
}

impl From<Option<RawPointCloud>> for Frame {
    fn from(cloud: Option<RawPointCloud>) -> Self {
        match cloud {
            Some(c) => Frame::PointCloud(c),
            None => Frame::NoData,
        }
    }
}

/// A frame as stored on disk by a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub time_ns: i64,
    pub cloud: Option<RawPointCloud>,
}

impl RecordedFrame {
    pub fn to_frame(&self) -> Frame {
        self.cloud.clone().into()
    }
}

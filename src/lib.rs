pub mod config;
pub mod data_loader;
pub mod detected_points;
pub mod error;
pub mod feature_points;
pub mod io;
pub mod renderer;
pub mod session;
pub mod synthetic;
pub mod visualization;

pub use config::FeaturePointsConfig;
pub use detected_points::{Frame, Point3D, PointIdentifier, RawPointCloud, RecordedFrame};
pub use error::{FeaturePointError, Result};
pub use feature_points::{FeaturePointsManager, MAX_POINTS, TrackedPointSet};
pub use renderer::{NodeRenderer, SceneNodes};
pub use session::{FeaturePointSession, FrameUpdate, SessionStats};

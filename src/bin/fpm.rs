use ar_feature_points::data_loader::load_recorded_session;
use ar_feature_points::io::{ReplayReport, object_from_json, write_report};
use ar_feature_points::visualization::{RerunPointRenderer, log_tracked_points, set_frame_time};
use ar_feature_points::{
    FeaturePointSession, FeaturePointsConfig, FeaturePointsManager, NodeRenderer, RecordedFrame,
    SceneNodes,
};
use clap::Parser;
use std::time::Instant;

#[derive(Parser)]
#[command(version, about, author)]
struct FpmCli {
    /// folder of recorded <time_ns>.json frames
    path: String,

    /// manager config json, overridden by --max-points
    #[arg(long)]
    config: Option<String>,

    /// maximum tracked points per frame
    #[arg(long)]
    max_points: Option<usize>,

    /// write a json replay report here
    #[arg(long)]
    report: Option<String>,

    /// save a rerun recording (.rrd) of the tracked points
    #[arg(long)]
    rerun: Option<String>,

    /// with --rerun, log each frame as one point cloud instead of one entity per point
    #[arg(long, requires = "rerun")]
    cloud: bool,
}

/// Returns the number of rejected frames. With `cloud`, the tracked set is
/// logged as a whole after every applied frame.
fn replay<R: NodeRenderer>(
    session: &mut FeaturePointSession<R>,
    frames: &[RecordedFrame],
    recording: Option<&rerun::RecordingStream>,
    cloud: bool,
) -> usize {
    let mut rejected = 0;
    for frame in frames {
        if let Some(recording) = recording {
            set_frame_time(recording, frame.time_ns);
        }
        match session.on_frame(frame.to_frame()) {
            Ok(update) => {
                log::trace!(
                    "t={} tracked={} removed={} truncated={}",
                    frame.time_ns,
                    update.tracked,
                    update.removed.len(),
                    update.truncated
                );
                if let (Some(recording), true) = (recording, cloud) {
                    if let Err(e) =
                        log_tracked_points(recording, "/world", session.manager().snapshot())
                    {
                        log::warn!("failed to log frame {}: {}", frame.time_ns, e);
                    }
                }
            }
            Err(e) => {
                log::warn!("skipping frame {}: {}", frame.time_ns, e);
                rejected += 1;
            }
        }
    }
    rejected
}

fn run(cli: &FpmCli) -> ar_feature_points::Result<()> {
    let mut config = match &cli.config {
        Some(path) => object_from_json::<FeaturePointsConfig, _>(path)?,
        None => FeaturePointsConfig::default(),
    };
    if let Some(max_points) = cli.max_points {
        config.max_points = max_points;
    }

    let now = Instant::now();
    let frames = load_recorded_session(&cli.path)?;
    log::info!(
        "loaded {} frames in {:.3} sec",
        frames.len(),
        now.elapsed().as_secs_f64()
    );

    let manager = FeaturePointsManager::from_config(&config);
    let now = Instant::now();
    let (stats, rejected, final_tracked) = match &cli.rerun {
        Some(rrd) => {
            let recording = rerun::RecordingStreamBuilder::new("feature_points").save(rrd)?;
            if cli.cloud {
                let mut session = FeaturePointSession::new(manager, SceneNodes::new());
                let rejected = replay(&mut session, &frames, Some(&recording), true);
                let tracked = session.manager().snapshot().len();
                (session.stats().clone(), rejected, tracked)
            } else {
                let renderer = RerunPointRenderer::new(recording.clone(), "/world");
                let mut session = FeaturePointSession::new(manager, renderer);
                let rejected = replay(&mut session, &frames, Some(&recording), false);
                if session.renderer().failed_logs() > 0 {
                    log::warn!("{} rerun log calls failed", session.renderer().failed_logs());
                }
                let tracked = session.manager().snapshot().len();
                (session.stats().clone(), rejected, tracked)
            }
        }
        None => {
            let mut session = FeaturePointSession::new(manager, SceneNodes::new());
            let rejected = replay(&mut session, &frames, None, false);
            let tracked = session.manager().snapshot().len();
            (session.stats().clone(), rejected, tracked)
        }
    };
    let duration_sec = now.elapsed().as_secs_f64();
    log::info!(
        "replay took {:.6} sec, avg {:.9} sec per frame",
        duration_sec,
        duration_sec / frames.len().max(1) as f64
    );

    let report = ReplayReport::new(&cli.path, config.max_points, rejected, final_tracked, &stats);
    println!(
        "frames: {}, no data: {}, rejected: {}, removed: {}, max tracked: {}",
        stats.frames, stats.no_data_frames, rejected, stats.removed_total, stats.max_tracked
    );
    if let Some(path) = &cli.report {
        write_report(path, &report)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = FpmCli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

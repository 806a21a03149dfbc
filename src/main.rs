// Demo runner for the `blobcast` library: drives the frame pipeline at a
// fixed cadence from a synthetic depth source. In a real deployment the
// `MovingSquareSource` is replaced by a sensor-backed `DepthSource` and the
// `PipelineConfig` by the live control surface.

use anyhow::{Context, Result};
use blobcast::config::AppConfig;
use blobcast::core_modules::depth_frame::{DepthSource, MovingSquareSource};
use blobcast::core_modules::utils::snapshot::snapshot;
use blobcast::pipeline::{FramePipeline, FrameReport};
use std::path::Path;
use std::time::Duration;

const SNAPSHOT_EVERY_N_FRAMES: u64 = 30;
const SNAPSHOT_PATH: &str = "depth_frame.png";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let app = AppConfig::load()?;
    log::info!(
        "broadcasting to {} at {} Hz, clamp {}..{} mm, size gate {} px",
        app.destination,
        app.frame_rate_hz,
        app.pipeline.depth_min_mm,
        app.pipeline.depth_max_mm,
        app.pipeline.blob_detect_area,
    );

    let mut pipeline =
        FramePipeline::new(&app.destination).context("binding the broadcast socket")?;
    let mut source = MovingSquareSource::new(app.pipeline.image_width, app.pipeline.image_height);
    source.set_depth_clamp_range(app.pipeline.depth_min_mm, app.pipeline.depth_max_mm);

    let mut ticker =
        tokio::time::interval(Duration::from_micros(1_000_000 / app.frame_rate_hz.max(1) as u64));
    let mut frame: u64 = 0;

    loop {
        ticker.tick().await;
        frame += 1;

        let report = pipeline.process_frame(source.current_depth_buffer(), &app.pipeline);
        match report {
            FrameReport::Quiet => log::trace!("frame {frame}: quiet"),
            FrameReport::Broadcast { blob_count } => {
                log::debug!("frame {frame}: broadcast {blob_count} blob(s)")
            }
            FrameReport::BroadcastDisabled { blob_count } => {
                log::trace!("frame {frame}: {blob_count} blob(s), broadcast disabled")
            }
            FrameReport::BroadcastFailed { blob_count } => {
                log::warn!("frame {frame}: dropped bundle of {blob_count} blob(s)")
            }
        }

        if app.pipeline.draw_depth && frame % SNAPSHOT_EVERY_N_FRAMES == 0 {
            if let Err(err) =
                snapshot::save_intensity(pipeline.last_intensity(), Path::new(SNAPSHOT_PATH))
            {
                log::warn!("could not write depth snapshot: {err}");
            }
        }
    }
}

// THEORY:
// The `pipeline` module is the final, top-level API for the whole engine. It
// wires the per-frame stages into one synchronous pass and reports what
// happened each tick. One call to `process_frame` is exactly one frame: no
// stage overlaps another, no pass overlaps the next, and every per-frame
// buffer is rebuilt inside the pass.
//
// Configuration is deliberately injected by value each tick. The control
// surface that mutates thresholds and toggles lives outside this crate and
// may run asynchronously to the frame clock; the pipeline snapshots the
// parameters exactly once at pass start so a mid-frame mutation can never
// tear a frame.

use crate::core_modules::blob::Blob;
use crate::core_modules::blob_extractor::blob_extractor;
use crate::core_modules::blob_filter;
use crate::core_modules::bundle_encoder;
use crate::core_modules::depth_frame::DepthBuffer;
use crate::core_modules::preprocessor::{self, IntensityBuffer};
use crate::core_modules::transport::BlobTransport;
use std::io;

/// Normalized intensity a pixel must reach to count as foreground. Fixed for
/// the session; the tunable knobs are the depth clamp and the size gate.
pub const DETECT_THRESHOLD: f32 = 0.6;

/// Per-frame parameters, owned by the external control surface and read by
/// value once at the top of every frame pass.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Working resolution, fixed for the session. Also the fallback shape
    /// for degraded frames when the sensor supplies nothing.
    pub image_width: u32,
    pub image_height: u32,
    /// Near edge of the depth clamp, millimeters.
    pub depth_min_mm: u16,
    /// Far edge of the depth clamp, millimeters.
    pub depth_max_mm: u16,
    /// Pixel side-length gate: a blob must exceed this on both axes.
    pub blob_detect_area: u32,
    /// Visualization toggles. Only `draw_edges` touches pipeline work (it
    /// enables boundary tracing); none of them affect the wire output.
    pub draw_depth: bool,
    pub draw_blobs: bool,
    pub draw_edges: bool,
    /// Master switch for the telemetry feed.
    pub broadcast_enabled: bool,
    /// Skips all optional per-frame work (currently boundary tracing).
    pub performance_mode: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            image_width: 512,
            image_height: 424,
            depth_min_mm: 500,
            depth_max_mm: 4000,
            blob_detect_area: 16,
            draw_depth: false,
            draw_blobs: false,
            draw_edges: false,
            broadcast_enabled: true,
            performance_mode: false,
        }
    }
}

/// The primary output of one frame pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameReport {
    /// No qualifying blobs this frame; the bundle was suppressed and the
    /// transport never invoked. Covers degraded (sensor-less) frames too.
    Quiet,
    /// A bundle with this many records went out.
    Broadcast { blob_count: usize },
    /// Qualifying blobs existed but broadcasting is switched off.
    BroadcastDisabled { blob_count: usize },
    /// The bundle could not be sent; the frame was dropped, nothing retried.
    BroadcastFailed { blob_count: usize },
}

/// The main, top-level struct for the engine: one transport plus the
/// per-frame products retained for inspection between passes.
pub struct FramePipeline {
    transport: BlobTransport,
    last_intensity: IntensityBuffer,
    last_blobs: Vec<Blob>,
}

impl FramePipeline {
    /// Binds the broadcast socket toward `destination`. The only fallible
    /// setup; everything per-frame degrades instead of failing.
    pub fn new(destination: &str) -> io::Result<Self> {
        Ok(Self {
            transport: BlobTransport::new(destination)?,
            last_intensity: IntensityBuffer::zeroed(0, 0),
            last_blobs: Vec::new(),
        })
    }

    /// Runs one full frame pass: preprocess, extract, filter, encode, send.
    pub fn process_frame(
        &mut self,
        depth: Option<&DepthBuffer>,
        config: &PipelineConfig,
    ) -> FrameReport {
        // One snapshot of the control parameters per pass.
        let config = config.clone();

        // Stage 1: Depth Preparation
        let intensity = preprocessor::depth_to_intensity(
            depth,
            config.depth_min_mm,
            config.depth_max_mm,
            config.image_width,
            config.image_height,
        );

        // Stage 2: Spatial Extraction
        // Boundary tracing feeds only the edge overlay; skip the work when
        // nothing will consume it. The wire output is identical either way.
        let trace_boundary = config.draw_edges && !config.performance_mode;
        let raw_blobs = blob_extractor::find_blobs(&intensity, DETECT_THRESHOLD, trace_boundary);

        // Stage 3: Size Filtering
        let blobs: Vec<Blob> = raw_blobs
            .into_iter()
            .filter(|blob| {
                blob_filter::passes_min_size(
                    blob,
                    intensity.width,
                    intensity.height,
                    config.blob_detect_area,
                )
            })
            .collect();

        let blob_count = blobs.len();
        self.last_blobs = blobs;
        self.last_intensity = intensity;

        // Stage 4: Encoding & Broadcast
        if blob_count == 0 {
            return FrameReport::Quiet;
        }
        if !config.broadcast_enabled {
            log::debug!("broadcast disabled, holding back {blob_count} blob(s)");
            return FrameReport::BroadcastDisabled { blob_count };
        }

        match bundle_encoder::encode_bundle(&self.last_blobs) {
            Some(datagram) => {
                if self.transport.send(&datagram) {
                    log::debug!("broadcast {blob_count} blob(s), {} bytes", datagram.len());
                    FrameReport::Broadcast { blob_count }
                } else {
                    FrameReport::BroadcastFailed { blob_count }
                }
            }
            // Non-empty list, so this is an encode failure (already logged):
            // the frame is dropped like any other failed send.
            None => FrameReport::BroadcastFailed { blob_count },
        }
    }

    /// The intensity buffer from the most recent pass, for visualization.
    pub fn last_intensity(&self) -> &IntensityBuffer {
        &self.last_intensity
    }

    /// The filtered blobs from the most recent pass, for visualization.
    pub fn last_blobs(&self) -> &[Blob] {
        &self.last_blobs
    }
}

// THEORY:
// The `preprocessor` is the first stage of the frame pipeline. It turns one
// raw `DepthBuffer` into the `IntensityBuffer` the extractor scans: an 8-bit
// grayscale-equivalent grid where sample brightness is a monotonic remapping
// of clamped depth.
//
// Key architectural principles:
// 1.  **Clamp, Never Drop**: samples outside the [min,max] depth range are
//     clamped to the nearest boundary instead of being zeroed out. Dropping
//     them would punch holes into regions that straddle a clamp edge and
//     fragment blobs downstream.
// 2.  **Degrade, Never Fail**: a missing or zero-sized depth buffer (sensor
//     not ready) produces an all-zero intensity buffer at the configured
//     working resolution, so every later stage still sees a well-formed
//     frame. The same holds for a degenerate clamp range (min >= max): the
//     valid range is empty, so nothing can be foreground.
// 3.  **Fresh Per Frame**: the intensity buffer is built from scratch every
//     pass and discarded with it. No state crosses frames through this
//     stage.

use crate::core_modules::depth_frame::DepthBuffer;

/// One frame of 8-bit intensity samples, row-major, same shape as the depth
/// buffer it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl IntensityBuffer {
    /// An all-zero (fully background) buffer, used for degraded frames.
    pub fn zeroed(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height) as usize],
        }
    }
}

/// Remaps one depth frame into the working intensity buffer.
///
/// Brightness increases monotonically with clamped depth: a sample at
/// `min_mm` maps to 0 and a sample at or beyond `max_mm` maps to 255. When
/// no usable depth buffer exists, an all-zero buffer at the fallback working
/// resolution is produced instead.
pub fn depth_to_intensity(
    depth: Option<&DepthBuffer>,
    min_mm: u16,
    max_mm: u16,
    fallback_width: u32,
    fallback_height: u32,
) -> IntensityBuffer {
    let depth = match depth {
        Some(buffer) if !buffer.is_empty() => buffer,
        _ => return IntensityBuffer::zeroed(fallback_width, fallback_height),
    };

    // min >= max is an empty valid range: nothing qualifies as foreground.
    if min_mm >= max_mm {
        return IntensityBuffer::zeroed(depth.width(), depth.height());
    }

    let span = (max_mm - min_mm) as u32;
    let data = depth
        .samples()
        .iter()
        .map(|&sample| {
            let clamped = sample.clamp(min_mm, max_mm);
            ((clamped - min_mm) as u32 * 255 / span) as u8
        })
        .collect();

    IntensityBuffer {
        width: depth.width(),
        height: depth.height(),
        data,
    }
}

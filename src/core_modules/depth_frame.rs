// THEORY:
// The `depth_frame` module defines the raw input side of the pipeline: the
// `DepthBuffer` data container and the `DepthSource` seam behind which the
// actual sensor hardware lives.
//
// Key architectural principles:
// 1.  **Dumb Data Container**: A `DepthBuffer` is a plain row-major grid of
//     millimeter depth samples. It carries no behavior beyond bounds-checked
//     access; all interpretation (clamping, remapping) belongs to the
//     preprocessor.
// 2.  **Hardware Behind a Seam**: The pipeline never talks to a sensor
//     directly. Anything that can hand out one depth buffer per tick is a
//     valid `DepthSource`, which keeps the whole pipeline testable with
//     synthetic frames and keeps device-specific acquisition code out of
//     this crate.
// 3.  **Fixed Session Resolution**: a source's buffer dimensions never change
//     mid-session. The pipeline relies on this to treat per-frame products
//     as same-shaped throughout a run.

/// One frame of raw depth samples, row-major, in millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    samples: Vec<u16>,
}

impl DepthBuffer {
    /// Creates a buffer from raw samples. The sample count must equal
    /// `width * height`; a mismatched buffer is truncated or zero-padded so
    /// the grid shape always holds.
    pub fn new(width: u32, height: u32, mut samples: Vec<u16>) -> Self {
        samples.resize((width * height) as usize, 0);
        Self {
            width,
            height,
            samples,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the buffer holds no usable samples (sensor not ready).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Row-major access to the raw samples.
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Mutable row-major access, for sources that refresh in place.
    pub fn samples_mut(&mut self) -> &mut [u16] {
        &mut self.samples
    }
}

/// The seam between the pipeline and whatever supplies depth frames.
pub trait DepthSource {
    /// Returns the buffer for the current tick, or `None` when the sensor
    /// cannot supply one (the pipeline then runs a degraded, empty frame).
    fn current_depth_buffer(&mut self) -> Option<&DepthBuffer>;

    /// Forwards the near/far clamp to sources that support hardware-side
    /// clamping. Honored before the next `current_depth_buffer` call;
    /// sources without hardware clamping ignore it.
    fn set_depth_clamp_range(&mut self, _min_mm: u16, _max_mm: u16) {}
}

const SQUARE_SIDE_PX: u32 = 160;
const BACKGROUND_DEPTH_MM: u16 = 300;
const SQUARE_DEPTH_MM: u16 = 3500;

/// A synthetic source for the demo runner: a near background with one far
/// square sweeping across the frame, so the pipeline always has exactly one
/// moving foreground region to extract.
pub struct MovingSquareSource {
    buffer: DepthBuffer,
    frame: u64,
}

impl MovingSquareSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: DepthBuffer::new(width, height, Vec::new()),
            frame: 0,
        }
    }
}

impl DepthSource for MovingSquareSource {
    fn current_depth_buffer(&mut self) -> Option<&DepthBuffer> {
        let width = self.buffer.width();
        let height = self.buffer.height();
        if width <= SQUARE_SIDE_PX || height <= SQUARE_SIDE_PX {
            return None;
        }

        let side = SQUARE_SIDE_PX;
        let x0 = (self.frame * 2) as u32 % (width - side);
        let y0 = (self.frame) as u32 % (height - side);
        self.frame += 1;

        let samples = self.buffer.samples_mut();
        samples.fill(BACKGROUND_DEPTH_MM);
        for y in y0..y0 + side {
            let row = (y * width) as usize;
            samples[row + x0 as usize..row + (x0 + side) as usize].fill(SQUARE_DEPTH_MM);
        }

        Some(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_sample_count_is_padded_to_grid_shape() {
        let buffer = DepthBuffer::new(4, 3, vec![7; 5]);
        assert_eq!(buffer.samples().len(), 12);
        assert_eq!(buffer.samples()[4], 7);
        assert_eq!(buffer.samples()[5], 0);
    }

    #[test]
    fn zero_dimension_buffer_reports_empty() {
        assert!(DepthBuffer::new(0, 424, Vec::new()).is_empty());
        assert!(DepthBuffer::new(512, 0, Vec::new()).is_empty());
        assert!(!DepthBuffer::new(2, 2, vec![0; 4]).is_empty());
    }

    #[test]
    fn synthetic_source_keeps_fixed_resolution_across_ticks() {
        let mut source = MovingSquareSource::new(512, 424);
        for _ in 0..5 {
            let buffer = source.current_depth_buffer().unwrap();
            assert_eq!(buffer.width(), 512);
            assert_eq!(buffer.height(), 424);
        }
    }

    #[test]
    fn synthetic_source_contains_exactly_one_far_square() {
        let mut source = MovingSquareSource::new(512, 424);
        let buffer = source.current_depth_buffer().unwrap();
        let far = buffer
            .samples()
            .iter()
            .filter(|&&s| s == SQUARE_DEPTH_MM)
            .count();
        assert_eq!(far as u32, SQUARE_SIDE_PX * SQUARE_SIDE_PX);
    }

    #[test]
    fn undersized_source_yields_no_frame() {
        let mut source = MovingSquareSource::new(100, 100);
        assert!(source.current_depth_buffer().is_none());
    }
}

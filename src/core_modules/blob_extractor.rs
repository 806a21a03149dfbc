// THEORY:
// The `BlobExtractor` is the engine of the Spatial Extraction Layer. It
// implements classic threshold-driven connected-component labeling: every
// maximal 8-connected region of sufficiently bright pixels in the intensity
// buffer becomes one `Blob`.
//
// Key architectural principles & algorithm steps:
// 1.  **Single Polarity**: only bright regions are foreground. The
//     preprocessor already arranged for in-range depth to read as bright, so
//     there is no need for dual-polarity detection.
// 2.  **Scan + Flood Fill**: a row-major scan over the buffer seeds a region
//     at every bright pixel not yet claimed by an earlier region. A
//     stack-based flood fill then claims the whole region, maintaining a
//     shared `visited` mask so each pixel is examined a bounded number of
//     times. Total work is O(pixels) per frame, which is what keeps the
//     extractor viable at sensor frame rate.
// 3.  **Box Aggregation**: while a region grows, only its min/max pixel
//     coordinates are tracked. The resulting minimal axis-aligned box is
//     normalized to [0,1] against the buffer dimensions before it leaves
//     this module.
// 4.  **Optional Contour Trace**: when requested, the region's outline is
//     traced with Moore-neighbor contour following and emitted as ordered
//     edge-vertex pairs. The outline is visualization-only data; the
//     bounding box remains the authoritative geometry downstream.
// 5.  **Stateless Utility**: `find_blobs` takes one frame's buffer and
//     produces that frame's blob list. It has no memory of previous frames,
//     and its output order is the row-major discovery order of the scan.

use crate::core_modules::blob::{Blob, BoundingBox, Point};
use crate::core_modules::preprocessor::IntensityBuffer;

pub mod blob_extractor {
    use super::*;

    /// Clockwise Moore neighborhood, starting East.
    const NEIGHBORS: [(i32, i32); 8] = [
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
        (0, -1),
        (1, -1),
    ];

    /// The main function of the spatial extraction layer.
    /// Finds every maximal 8-connected region whose normalized intensity is
    /// at least `tau`, in row-major discovery order.
    pub fn find_blobs(intensity: &IntensityBuffer, tau: f32, trace_boundary: bool) -> Vec<Blob> {
        let width = intensity.width as usize;
        let height = intensity.height as usize;
        if width == 0 || height == 0 {
            return Vec::new();
        }

        // Smallest 8-bit sample whose normalized value reaches tau.
        let cutoff = (tau * 255.0).ceil().clamp(0.0, 255.0) as u8;

        let mut visited = vec![false; width * height];
        let mut blobs = Vec::new();

        for index in 0..width * height {
            if visited[index] || intensity.data[index] < cutoff {
                continue;
            }

            let seed_x = index % width;
            let seed_y = index / width;
            let region = grow_region(intensity, cutoff, &mut visited, seed_x, seed_y);

            let boundary = if trace_boundary {
                trace_contour(intensity, cutoff, seed_x, seed_y)
            } else {
                Vec::new()
            };

            blobs.push(Blob {
                bounding_box: region.normalized(intensity.width, intensity.height),
                boundary,
            });
        }

        blobs
    }

    /// Pixel-space extents of a growing region, tracked as inclusive bounds.
    struct RegionBounds {
        min_x: usize,
        min_y: usize,
        max_x: usize,
        max_y: usize,
    }

    impl RegionBounds {
        fn normalized(&self, width: u32, height: u32) -> BoundingBox {
            BoundingBox {
                x: self.min_x as f32 / width as f32,
                y: self.min_y as f32 / height as f32,
                width: (self.max_x - self.min_x + 1) as f32 / width as f32,
                height: (self.max_y - self.min_y + 1) as f32 / height as f32,
            }
        }
    }

    /// Claims the full 8-connected region around a seed pixel with a
    /// stack-based flood fill, marking it in the shared `visited` mask and
    /// aggregating its bounding extents.
    fn grow_region(
        intensity: &IntensityBuffer,
        cutoff: u8,
        visited: &mut [bool],
        seed_x: usize,
        seed_y: usize,
    ) -> RegionBounds {
        let width = intensity.width as usize;
        let height = intensity.height as usize;

        let mut bounds = RegionBounds {
            min_x: seed_x,
            min_y: seed_y,
            max_x: seed_x,
            max_y: seed_y,
        };

        let mut stack = vec![(seed_x, seed_y)];
        visited[seed_y * width + seed_x] = true;

        while let Some((x, y)) = stack.pop() {
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);

            for (dx, dy) in &NEIGHBORS {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                    continue;
                }

                let neighbor = ny as usize * width + nx as usize;
                if !visited[neighbor] && intensity.data[neighbor] >= cutoff {
                    visited[neighbor] = true;
                    stack.push((nx as usize, ny as usize));
                }
            }
        }

        bounds
    }

    /// Moore-neighbor contour following around one region, starting from its
    /// topmost-leftmost pixel (the scan-order seed). Emits the outline as
    /// ordered edge-vertex pairs in normalized coordinates; a single-pixel
    /// region has no edges.
    fn trace_contour(
        intensity: &IntensityBuffer,
        cutoff: u8,
        start_x: usize,
        start_y: usize,
    ) -> Vec<(Point, Point)> {
        let width = intensity.width as usize;
        let height = intensity.height as usize;

        let foreground = |x: i32, y: i32| -> bool {
            x >= 0
                && y >= 0
                && x < width as i32
                && y < height as i32
                && intensity.data[y as usize * width + x as usize] >= cutoff
        };

        let next_dir = |x: usize, y: usize, search_start: usize| -> Option<usize> {
            (0..8).map(|i| (search_start + i) % 8).find(|&dir| {
                let (dx, dy) = NEIGHBORS[dir];
                foreground(x as i32 + dx, y as i32 + dy)
            })
        };

        let normalize = |x: usize, y: usize| Point {
            x: x as f32 / width as f32,
            y: y as f32 / height as f32,
        };

        // The seed is the topmost-leftmost region pixel, so its West
        // neighbor is background; the first clockwise search starts just
        // past that backtrack direction.
        let first_dir = match next_dir(start_x, start_y, 5) {
            Some(dir) => dir,
            None => return Vec::new(),
        };

        let mut edges = Vec::new();
        let mut x = start_x;
        let mut y = start_y;
        let mut dir = first_dir;
        // A contour revisits each pixel at most a handful of times; this
        // bound only guards against a tracing defect looping forever.
        let max_steps = 4 * width * height + 8;

        for _ in 0..max_steps {
            let (dx, dy) = NEIGHBORS[dir];
            let nx = (x as i32 + dx) as usize;
            let ny = (y as i32 + dy) as usize;
            edges.push((normalize(x, y), normalize(nx, ny)));
            x = nx;
            y = ny;

            // Resume the clockwise search just past the backtrack direction.
            let search_start = (dir + 5) % 8;
            dir = match next_dir(x, y, search_start) {
                Some(d) => d,
                None => break,
            };

            if x == start_x && y == start_y && dir == first_dir {
                break;
            }
        }

        edges
    }
}

#[cfg(test)]
mod tests {
    use super::blob_extractor::find_blobs;
    use crate::core_modules::preprocessor::IntensityBuffer;

    fn buffer_with_rects(
        width: u32,
        height: u32,
        background: u8,
        rects: &[(u32, u32, u32, u32, u8)],
    ) -> IntensityBuffer {
        let mut data = vec![background; (width * height) as usize];
        for &(rx, ry, rw, rh, value) in rects {
            for y in ry..ry + rh {
                for x in rx..rx + rw {
                    data[(y * width + x) as usize] = value;
                }
            }
        }
        IntensityBuffer {
            width,
            height,
            data,
        }
    }

    #[test]
    fn single_square_yields_one_normalized_box() {
        let intensity = buffer_with_rects(512, 424, 128, &[(100, 100, 50, 50, 230)]);
        let blobs = find_blobs(&intensity, 0.6, false);

        assert_eq!(blobs.len(), 1);
        let b = blobs[0].bounding_box;
        assert!((b.x - 100.0 / 512.0).abs() < 1e-6);
        assert!((b.y - 100.0 / 424.0).abs() < 1e-6);
        assert!((b.width - 50.0 / 512.0).abs() < 1e-6);
        assert!((b.height - 50.0 / 424.0).abs() < 1e-6);
    }

    #[test]
    fn repeated_extraction_is_deterministic() {
        let intensity = buffer_with_rects(
            128,
            96,
            40,
            &[(5, 5, 10, 8, 220), (40, 20, 7, 7, 200), (80, 60, 12, 3, 255)],
        );
        let first = find_blobs(&intensity, 0.6, true);
        let second = find_blobs(&intensity, 0.6, true);
        assert_eq!(first, second);
    }

    #[test]
    fn disjoint_regions_appear_in_scan_order() {
        let intensity = buffer_with_rects(
            200,
            200,
            0,
            &[(10, 60, 20, 20, 255), (60, 10, 20, 20, 255), (10, 10, 20, 20, 255)],
        );
        let blobs = find_blobs(&intensity, 0.5, false);

        assert_eq!(blobs.len(), 3);
        // Row-major discovery: the two top squares left to right, then the
        // lower one.
        assert!((blobs[0].bounding_box.x - 10.0 / 200.0).abs() < 1e-6);
        assert!((blobs[0].bounding_box.y - 10.0 / 200.0).abs() < 1e-6);
        assert!((blobs[1].bounding_box.x - 60.0 / 200.0).abs() < 1e-6);
        assert!((blobs[2].bounding_box.y - 60.0 / 200.0).abs() < 1e-6);
    }

    #[test]
    fn uniformly_bright_frame_is_one_full_frame_blob() {
        let intensity = buffer_with_rects(64, 48, 255, &[]);
        let blobs = find_blobs(&intensity, 0.6, false);

        assert_eq!(blobs.len(), 1);
        let b = blobs[0].bounding_box;
        assert_eq!((b.x, b.y), (0.0, 0.0));
        assert!((b.width - 1.0).abs() < 1e-6);
        assert!((b.height - 1.0).abs() < 1e-6);
    }

    #[test]
    fn diagonal_pixels_join_one_region() {
        let intensity = buffer_with_rects(16, 16, 0, &[(5, 5, 1, 1, 255), (6, 6, 1, 1, 255)]);
        let blobs = find_blobs(&intensity, 0.5, false);
        assert_eq!(blobs.len(), 1);
        let b = blobs[0].bounding_box;
        assert!((b.width - 2.0 / 16.0).abs() < 1e-6);
        assert!((b.height - 2.0 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn sample_exactly_at_cutoff_is_foreground() {
        // tau = 0.6 rounds up to an 8-bit cutoff of 153.
        let intensity = buffer_with_rects(8, 8, 0, &[(2, 2, 2, 2, 153)]);
        assert_eq!(find_blobs(&intensity, 0.6, false).len(), 1);

        let below = buffer_with_rects(8, 8, 0, &[(2, 2, 2, 2, 152)]);
        assert!(find_blobs(&below, 0.6, false).is_empty());
    }

    #[test]
    fn traced_boundary_is_a_closed_normalized_loop() {
        let intensity = buffer_with_rects(32, 32, 0, &[(10, 10, 5, 4, 255)]);
        let blobs = find_blobs(&intensity, 0.5, true);

        assert_eq!(blobs.len(), 1);
        let boundary = &blobs[0].boundary;
        assert!(!boundary.is_empty());

        // Consecutive edges chain, and the loop closes on its first vertex.
        for pair in boundary.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(boundary.last().unwrap().1, boundary[0].0);

        for (a, b) in boundary {
            for p in [a, b] {
                assert!((0.0..=1.0).contains(&p.x));
                assert!((0.0..=1.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn boundary_is_empty_when_tracing_is_disabled() {
        let intensity = buffer_with_rects(32, 32, 0, &[(10, 10, 5, 4, 255)]);
        let blobs = find_blobs(&intensity, 0.5, false);
        assert!(blobs[0].boundary.is_empty());
    }

    #[test]
    fn single_pixel_region_has_a_box_but_no_edges() {
        let intensity = buffer_with_rects(16, 16, 0, &[(7, 7, 1, 1, 255)]);
        let blobs = find_blobs(&intensity, 0.5, true);
        assert_eq!(blobs.len(), 1);
        assert!(blobs[0].boundary.is_empty());
        assert!((blobs[0].bounding_box.width - 1.0 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn all_dark_frame_yields_no_blobs() {
        let intensity = buffer_with_rects(64, 64, 10, &[]);
        assert!(find_blobs(&intensity, 0.6, true).is_empty());
    }
}

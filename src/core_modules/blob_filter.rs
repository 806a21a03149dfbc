// THEORY:
// The `blob_filter` is the size gate between extraction and encoding. It
// converts a blob's normalized bounding box back into pixel-space side
// lengths and rejects anything that is too small on either axis.
//
// Key architectural principles:
// 1.  **Per-Axis Gate**: the threshold is compared against width and height
//     independently, not against their product. A long thin sliver fails on
//     its narrow axis even when its total area is large. This is the
//     contract consumers tune against; it must not be silently "upgraded"
//     to an area test.
// 2.  **Pure Predicate**: no mutation, no side effects. Called once per blob
//     per frame by the pipeline's filtering stage.

use crate::core_modules::blob::Blob;

/// True when the blob's pixel-space bounding box exceeds the minimum side
/// length on both axes. A side exactly at the threshold is rejected.
pub fn passes_min_size(blob: &Blob, buffer_width: u32, buffer_height: u32, min_side_px: u32) -> bool {
    let width_px = blob.bounding_box.width * buffer_width as f32;
    let height_px = blob.bounding_box.height * buffer_height as f32;
    width_px > min_side_px as f32 && height_px > min_side_px as f32
}

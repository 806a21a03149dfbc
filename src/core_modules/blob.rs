// THEORY:
// The `blob` module defines the data containers produced by the Spatial
// Extraction Layer. A `Blob` represents a single, contiguous region of
// foreground activity within one frame of the intensity buffer.
//
// Key architectural principles:
// 1.  **Stateless Data Container**: A `Blob` is a "dumb" data container. It
//     represents a detected region within a single frame and has no memory of
//     previous frames. There is no identity or tracking continuity; the
//     entire list is rebuilt from scratch every frame.
// 2.  **Normalized Geometry**: All coordinates are expressed in the [0,1]
//     range relative to the intensity buffer's dimensions. This decouples
//     every downstream consumer (the size filter, the wire encoder, any
//     visualization) from the sensor's native resolution.
// 3.  **Authoritative Box, Optional Outline**: The bounding box is the only
//     geometry reported downstream. The boundary polyline exists purely for
//     visualization and may be empty when edge tracing is switched off.

/// A 2D point in normalized [0,1] coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// The minimal axis-aligned rectangle enclosing a blob, normalized to [0,1]
/// relative to the intensity buffer's width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge of the box.
    pub x: f32,
    /// Top edge of the box.
    pub y: f32,
    /// Horizontal extent of the box.
    pub width: f32,
    /// Vertical extent of the box.
    pub height: f32,
}

/// A single connected foreground region detected in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    /// The authoritative geometry reported over the wire.
    pub bounding_box: BoundingBox,
    /// Ordered edge-vertex pairs outlining the region, traced along its
    /// contour. Empty when boundary tracing is disabled for the frame.
    pub boundary: Vec<(Point, Point)>,
}

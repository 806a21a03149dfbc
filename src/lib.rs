// THEORY:
// This file is the main entry point for the `blobcast` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (like the demo
// runner binary).
//
// The primary goal is to export the `FramePipeline` and its associated data
// structures (`PipelineConfig`, `FrameReport`, etc.) as the clean,
// high-level interface for the entire engine. The internal stage modules
// (`core_modules`) remain available for consumers that need direct access
// to a single stage, such as tests or visualization layers.

pub mod config;
pub mod core_modules;
pub mod pipeline;

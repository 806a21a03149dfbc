pub mod blob;
pub mod blob_extractor;
pub mod blob_filter;
pub mod bundle_encoder;
pub mod depth_frame;
pub mod preprocessor;
pub mod transport;
pub mod utils;

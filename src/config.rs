// Startup configuration: built-in defaults, optionally overridden by a TOML
// file named by the BLOBCAST_CONFIG environment variable. Everything here is
// resolved once before the first frame; runtime parameter changes arrive
// through the control surface as a fresh `PipelineConfig` per tick.

use crate::pipeline::PipelineConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_DESTINATION: &str = "127.0.0.1:12000";
const DEFAULT_FRAME_RATE_HZ: u32 = 30;
const DEFAULT_IMAGE_WIDTH: u32 = 512;
const DEFAULT_IMAGE_HEIGHT: u32 = 424;
const DEFAULT_DEPTH_MIN_MM: u16 = 500;
const DEFAULT_DEPTH_MAX_MM: u16 = 4000;
const DEFAULT_BLOB_DETECT_AREA: u32 = 16;

#[derive(Debug, Deserialize, Default)]
struct BlobcastConfigFile {
    destination: Option<String>,
    frame_rate_hz: Option<u32>,
    pipeline: Option<PipelineConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct PipelineConfigFile {
    image_width: Option<u32>,
    image_height: Option<u32>,
    depth_min_mm: Option<u16>,
    depth_max_mm: Option<u16>,
    blob_detect_area: Option<u32>,
    draw_depth: Option<bool>,
    draw_blobs: Option<bool>,
    draw_edges: Option<bool>,
    broadcast_enabled: Option<bool>,
    performance_mode: Option<bool>,
}

/// Fully resolved application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    /// Where bundles are sent, `host:port`.
    pub destination: String,
    /// Frame ticks per second.
    pub frame_rate_hz: u32,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let file_cfg = match std::env::var("BLOBCAST_CONFIG").ok().as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => BlobcastConfigFile::default(),
        };
        Ok(resolve(file_cfg))
    }
}

fn read_config_file(path: &Path) -> Result<BlobcastConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
}

fn resolve(file: BlobcastConfigFile) -> AppConfig {
    let p = file.pipeline.unwrap_or_default();
    AppConfig {
        pipeline: PipelineConfig {
            image_width: p.image_width.unwrap_or(DEFAULT_IMAGE_WIDTH),
            image_height: p.image_height.unwrap_or(DEFAULT_IMAGE_HEIGHT),
            depth_min_mm: p.depth_min_mm.unwrap_or(DEFAULT_DEPTH_MIN_MM),
            depth_max_mm: p.depth_max_mm.unwrap_or(DEFAULT_DEPTH_MAX_MM),
            blob_detect_area: p.blob_detect_area.unwrap_or(DEFAULT_BLOB_DETECT_AREA),
            draw_depth: p.draw_depth.unwrap_or(false),
            draw_blobs: p.draw_blobs.unwrap_or(false),
            draw_edges: p.draw_edges.unwrap_or(false),
            broadcast_enabled: p.broadcast_enabled.unwrap_or(true),
            performance_mode: p.performance_mode.unwrap_or(false),
        },
        destination: file.destination.unwrap_or_else(|| DEFAULT_DESTINATION.to_string()),
        frame_rate_hz: file.frame_rate_hz.unwrap_or(DEFAULT_FRAME_RATE_HZ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_without_a_file() {
        let config = resolve(BlobcastConfigFile::default());
        assert_eq!(config.destination, DEFAULT_DESTINATION);
        assert_eq!(config.frame_rate_hz, DEFAULT_FRAME_RATE_HZ);
        assert_eq!(config.pipeline.image_width, 512);
        assert_eq!(config.pipeline.depth_max_mm, 4000);
        assert!(config.pipeline.broadcast_enabled);
    }

    #[test]
    fn file_values_override_defaults_field_by_field() {
        let toml_src = r#"
            destination = "10.0.0.5:9000"

            [pipeline]
            depth_min_mm = 800
            blob_detect_area = 40
            broadcast_enabled = false
        "#;
        let file: BlobcastConfigFile = toml::from_str(toml_src).unwrap();
        let config = resolve(file);

        assert_eq!(config.destination, "10.0.0.5:9000");
        assert_eq!(config.frame_rate_hz, DEFAULT_FRAME_RATE_HZ);
        assert_eq!(config.pipeline.depth_min_mm, 800);
        assert_eq!(config.pipeline.depth_max_mm, DEFAULT_DEPTH_MAX_MM);
        assert_eq!(config.pipeline.blob_detect_area, 40);
        assert!(!config.pipeline.broadcast_enabled);
    }

    #[test]
    fn malformed_file_is_a_startup_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "destination = [not toml").unwrap();
        assert!(read_config_file(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_a_startup_error() {
        assert!(read_config_file(Path::new("/nonexistent/blobcast.toml")).is_err());
    }
}

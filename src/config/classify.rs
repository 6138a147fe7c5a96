use crate::ClassifierParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct InputConfig {
    /// 16-bit grayscale PNG of raw depth samples.
    pub depth: PathBuf,
    /// Color frame aligned with the depth frame.
    pub color: PathBuf,
    /// Metres per raw depth unit.
    pub depth_scale: f32,
    #[serde(default)]
    pub baseline_distance_m: Option<f32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub building_mask: Option<PathBuf>,
    pub road_mask: Option<PathBuf>,
    pub park_mask: Option<PathBuf>,
    /// Class codes 0..=3 as an 8-bit PNG.
    pub label_map: Option<PathBuf>,
    pub noise_map: Option<PathBuf>,
    /// Smoothed height, rescaled to the valid range.
    pub height_map: Option<PathBuf>,
    pub json_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub params: ClassifierParams,
}

pub fn parse_config(contents: &str) -> Result<RuntimeConfig, String> {
    let config: RuntimeConfig =
        serde_json::from_str(contents).map_err(|e| format!("Invalid config: {e}"))?;
    if !config.input.depth_scale.is_finite() || config.input.depth_scale <= 0.0 {
        return Err(format!(
            "Invalid config: depth_scale must be positive, got {}",
            config.input.depth_scale
        ));
    }
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("{} ({})", e, path.display()))
}

use super::road::RegionFilterCounts;
use serde::Serialize;

/// Park detection statistics.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkStage {
    pub hue_pixels: usize,
    pub chroma_pixels: usize,
    /// Pixels passing both criteria.
    pub fused_pixels: usize,
    pub regions: RegionFilterCounts,
    pub park_pixels: usize,
}

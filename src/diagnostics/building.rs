use super::road::RegionFilterCounts;
use serde::Serialize;

/// Building detection statistics.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingStage {
    /// Pixels passing the local-difference rule.
    pub local_diff_pixels: usize,
    /// Pixels passing the absolute-height fallback rule.
    pub fallback_pixels: usize,
    /// Fused candidates before morphology.
    pub candidate_pixels: usize,
    pub regions: RegionFilterCounts,
    /// Regions rejected as too round.
    pub rejected_round: usize,
    pub building_pixels: usize,
}

use serde::Serialize;

/// Outcome of an area/shape filter over connected regions.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionFilterCounts {
    pub total: usize,
    pub kept: usize,
}

impl RegionFilterCounts {
    pub fn rejected(&self) -> usize {
        self.total - self.kept
    }
}

/// Road detection statistics.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadStage {
    pub dark_pixels: usize,
    pub tinted_pixels: usize,
    pub candidate_pixels: usize,
    pub regions: RegionFilterCounts,
    pub road_pixels: usize,
}

/// Shadow correction statistics.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowStage {
    pub halo_pixels: usize,
    pub fragments_removed: usize,
    pub pixels_removed: usize,
}

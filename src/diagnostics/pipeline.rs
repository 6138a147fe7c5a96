use super::{
    BuildingStage, ConflictStage, HeightStage, ParkStage, RoadStage, ShadowStage,
    TimingBreakdown,
};
use crate::image::ImageF32;
use crate::types::{TerrainMasks, TerrainSummary};
use serde::Serialize;

/// Result produced by
/// [`TerrainClassifier::classify_with_diagnostics`](crate::TerrainClassifier).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationReport {
    #[serde(skip)]
    pub masks: TerrainMasks,
    /// Smoothed metric height map (invalid pixels are 0).
    #[serde(skip)]
    pub height_map: ImageF32,
    pub summary: TerrainSummary,
    pub trace: ClassificationTrace,
}

/// End-to-end trace of one classified frame.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub height: HeightStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<BuildingStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road: Option<RoadStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShadowStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub park: Option<ParkStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictStage>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub depth_scale: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_distance_m: Option<f32>,
}

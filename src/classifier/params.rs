//! Parameter types configuring the classification stages.
//!
//! Every threshold of the pipeline lives here; nothing is hard-coded in the
//! stages. Defaults are the values tuned on the reference sandbox rig
//! (matte sand, dark grey paper roads, green paper parks, wooden blocks,
//! overhead depth camera). Recalibrate per deployment: paper colour,
//! lighting and sensor noise all move them.
//!
//! All structs deserialize with `#[serde(default)]`, so a JSON config only
//! needs to name the knobs it overrides.

use crate::filters::ElementShape;
use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    pub height: HeightParams,
    pub building: BuildingParams,
    pub road: RoadParams,
    pub shadow: ShadowParams,
    pub park: ParkParams,
    pub noise: NoiseParams,
}

/// Speckle suppression applied to the metric height map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingKind {
    /// Separable Gaussian; fast, soft edges.
    #[default]
    Gaussian,
    /// Rank filter; strongest outlier rejection, slower.
    Median,
    /// No smoothing.
    None,
}

/// Height extraction from raw depth.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightParams {
    pub smoothing: SmoothingKind,
    /// Smoothing window size in pixels (odd).
    pub smoothing_kernel: usize,
    /// Raw value some drivers emit for "no return" besides 0.
    pub invalid_sentinel: Option<u16>,
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            smoothing: SmoothingKind::Gaussian,
            smoothing_kernel: 7,
            invalid_sentinel: None,
        }
    }
}

/// Building detection from the height map.
///
/// Candidate rule:
/// `local_diff ∈ local_diff_band  OR  (height ∈ absolute_band AND relative > relative_cutoff)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingParams {
    /// Window of the local mean the height difference is measured against.
    /// Larger windows ignore broader hills.
    pub local_mean_kernel: usize,
    /// Accepted height above the local surroundings (metres, inclusive).
    pub local_diff_band: [f32; 2],
    /// Accepted absolute height (metres, inclusive) for the fallback rule.
    pub absolute_band: [f32; 2],
    /// Minimum global relative height for the fallback rule.
    pub relative_cutoff: f32,
    pub close_kernel: usize,
    pub open_kernel: usize,
    pub element: ElementShape,
    /// Extra dilation after close/open; 0 disables.
    pub dilate_kernel: usize,
    /// Accepted enclosed area in pixels, holes included (exclusive bounds).
    pub area_band: [usize; 2],
    /// Reject regions whose compactness exceeds this (round mounds).
    pub max_compactness: Option<f32>,
    /// Gaussian size used to soften the final mask edges; <= 1 disables.
    pub edge_smoothing_kernel: usize,
}

impl Default for BuildingParams {
    fn default() -> Self {
        Self {
            local_mean_kernel: 21,
            local_diff_band: [0.01, 0.20],
            absolute_band: [0.01, 0.20],
            relative_cutoff: 0.15,
            close_kernel: 9,
            open_kernel: 5,
            element: ElementShape::Ellipse,
            dilate_kernel: 0,
            area_band: [30, 15_000],
            max_compactness: None,
            edge_smoothing_kernel: 3,
        }
    }
}

/// Inclusive HSV box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }
}

/// Road segmentation from the color frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadParams {
    /// Dark, unsaturated material.
    pub dark: HsvRange,
    /// Alternate road colour (bluish paper).
    pub tinted: HsvRange,
    pub close_kernel: usize,
    pub open_kernel: usize,
    pub element: ElementShape,
    /// Regions below this pixel area are dropped.
    pub min_area: usize,
    /// Bounding-box aspect ratio that marks a region as a strip.
    pub min_elongation: f32,
    /// Compact regions are still accepted from this area on.
    pub large_area: usize,
}

impl Default for RoadParams {
    fn default() -> Self {
        Self {
            dark: HsvRange::new([0, 0, 0], [179, 80, 90]),
            tinted: HsvRange::new([90, 30, 30], [130, 150, 150]),
            close_kernel: 15,
            open_kernel: 7,
            element: ElementShape::Rect,
            min_area: 800,
            min_elongation: 3.0,
            large_area: 4_000,
        }
    }
}

/// Suppression of cast shadows next to buildings in the road mask.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowParams {
    /// Square dilation applied to the building mask to form the halo.
    pub halo_kernel: usize,
    /// Road regions touching the halo are removed below this pixel area.
    pub fragment_max_area: usize,
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            halo_kernel: 15,
            fragment_max_area: 2_000,
        }
    }
}

/// Park segmentation: HSV green box AND chrominance band.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkParams {
    pub hsv: HsvRange,
    /// Inclusive band on the offset `a` channel (green < 128).
    pub chroma_a_band: [u8; 2],
    pub close_kernel: usize,
    pub open_kernel: usize,
    pub element: ElementShape,
    /// Regions below this pixel area are dropped; 0 keeps everything.
    pub min_area: usize,
}

impl Default for ParkParams {
    fn default() -> Self {
        Self {
            hsv: HsvRange::new([35, 40, 40], [90, 255, 255]),
            chroma_a_band: [0, 112],
            close_kernel: 9,
            open_kernel: 9,
            element: ElementShape::Ellipse,
            min_area: 50,
        }
    }
}

/// Noise-propagation map derived from the final masks.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub road_intensity: f32,
    pub park_intensity: f32,
    pub iterations: usize,
    /// Gaussian diffusion window per iteration (odd).
    pub kernel_size: usize,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            road_intensity: 1.0,
            park_intensity: 0.6,
            iterations: 20,
            kernel_size: 91,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let json = r#"{ "building": { "area_band": [10, 500] }, "park": { "min_area": 0 } }"#;
        let params: ClassifierParams = serde_json::from_str(json).expect("valid params");
        assert_eq!(params.building.area_band, [10, 500]);
        assert_eq!(params.building.local_mean_kernel, 21);
        assert_eq!(params.park.min_area, 0);
        assert_eq!(params.road.min_area, RoadParams::default().min_area);
    }

    #[test]
    fn enums_use_lowercase_names() {
        let json = r#"{ "smoothing": "median", "smoothing_kernel": 5 }"#;
        let params: HeightParams = serde_json::from_str(json).expect("valid params");
        assert_eq!(params.smoothing, SmoothingKind::Median);
        let json = r#"{ "element": "rect" }"#;
        let params: ParkParams = serde_json::from_str(json).expect("valid params");
        assert_eq!(params.element, ElementShape::Rect);
    }
}

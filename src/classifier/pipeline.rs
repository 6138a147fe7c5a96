//! Single-frame pipeline: depth + color in, three disjoint masks out.
//!
//! Typical usage:
//! ```no_run
//! use sandbox_terrain::{ClassifierParams, TerrainClassifier};
//! use sandbox_terrain::image::{ChannelOrder, ColorImage, DepthImage};
//!
//! # fn example(depth: &[u16], bgr: &[u8], w: usize, h: usize) {
//! let classifier = TerrainClassifier::new(ClassifierParams::default());
//! let depth = DepthImage::new(w, h, depth);
//! let color = ColorImage::new(w, h, ChannelOrder::Bgr, bgr);
//! let report = classifier
//!     .classify_with_diagnostics(&depth, &color, 0.001, None)
//!     .expect("well-formed frame");
//! println!("buildings: {} px", report.summary.building_pixels);
//! # }
//! ```

// Stages
// - Height: raw depth → smoothed metres + validity (`height`).
// - Buildings: local-diff/fallback fusion, close → open, area filter (`building`).
// - Color: HSV and chrominance planes, computed once for roads and parks.
// - Roads: dark|tinted candidates, close → open, shape filter (`road`).
// - Shadows: drop small road regions in the dilated building halo.
// - Parks: HSV ∧ chrominance, close → open, area filter (`park`).
// - Conflicts: building > park > road (`conflict`).

use super::params::{
    BuildingParams, ClassifierParams, HeightParams, ParkParams, RoadParams, ShadowParams,
};
use crate::building::detect_buildings;
use crate::color::ColorPlanes;
use crate::conflict::resolve_conflicts;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{
    ClassificationReport, ClassificationTrace, HeightStage, InputDescriptor, TimingBreakdown,
};
use crate::error::FrameError;
use crate::height::extract_height;
use crate::image::{ColorImage, DepthImage};
use crate::park::detect_parks;
use crate::road::{correct_shadows, detect_roads};
use crate::types::{TerrainMasks, TerrainSummary};
use log::{debug, trace, warn};
use std::time::Instant;

/// Stateless terrain classifier. Holds the thresholds only.
#[derive(Clone, Debug, Default)]
pub struct TerrainClassifier {
    params: ClassifierParams,
}

impl TerrainClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    pub fn set_height_params(&mut self, params: HeightParams) {
        self.params.height = params;
    }

    pub fn set_building_params(&mut self, params: BuildingParams) {
        self.params.building = params;
    }

    pub fn set_road_params(&mut self, params: RoadParams) {
        self.params.road = params;
    }

    pub fn set_shadow_params(&mut self, params: ShadowParams) {
        self.params.shadow = params;
    }

    pub fn set_park_params(&mut self, params: ParkParams) {
        self.params.park = params;
    }

    /// Classify one frame pair into building, road and park masks.
    ///
    /// `baseline_distance_m` is the known camera-to-table distance when the
    /// rig provides one; it is recorded in diagnostics and does not change
    /// the result.
    pub fn classify(
        &self,
        depth: &DepthImage<'_>,
        color: &ColorImage<'_>,
        depth_scale: f32,
        baseline_distance_m: Option<f32>,
    ) -> Result<TerrainMasks, FrameError> {
        self.classify_with_diagnostics(depth, color, depth_scale, baseline_distance_m)
            .map(|report| report.masks)
    }

    /// Same as [`classify`](Self::classify), plus per-stage statistics,
    /// timings and the smoothed height map.
    pub fn classify_with_diagnostics(
        &self,
        depth: &DepthImage<'_>,
        color: &ColorImage<'_>,
        depth_scale: f32,
        baseline_distance_m: Option<f32>,
    ) -> Result<ClassificationReport, FrameError> {
        let total_start = Instant::now();
        depth.validate()?;
        color.validate()?;
        if (depth.w, depth.h) != (color.w, color.h) {
            return Err(FrameError::DimensionMismatch {
                depth: (depth.w, depth.h),
                color: (color.w, color.h),
            });
        }
        let (w, h) = (depth.w, depth.h);
        debug!("classify: {}x{} frame, depth scale {}", w, h, depth_scale);
        if let Some(baseline) = baseline_distance_m {
            trace!("classify: baseline distance {:.3} m (informational)", baseline);
        }
        let input = InputDescriptor {
            width: w,
            height: h,
            depth_scale,
            baseline_distance_m,
        };

        let mut timings = TimingBreakdown::default();
        let field = timings.time("height", || {
            extract_height(depth, depth_scale, &self.params.height)
        })?;
        let height_stage = HeightStage::from_field(&field);

        if !field.has_signal() {
            warn!("classify: no valid depth in frame, reporting an empty scene");
            let masks = TerrainMasks::empty(w, h);
            timings.total_ms = elapsed_ms(total_start);
            return Ok(ClassificationReport {
                summary: TerrainSummary::from_masks(&masks, false, timings.total_ms),
                masks,
                height_map: field.height,
                trace: ClassificationTrace {
                    input,
                    timings,
                    height: height_stage,
                    building: None,
                    road: None,
                    shadow: None,
                    park: None,
                    conflict: None,
                },
            });
        }
        if height_stage.degenerate_range {
            debug!("classify: flat height range, relative height is 0");
        }

        let buildings = timings.time("buildings", || {
            detect_buildings(&field, &self.params.building)
        })?;
        let planes = timings.time("color", || ColorPlanes::from_color(color))?;

        let roads = timings.time("roads", || detect_roads(&planes, &self.params.road));
        let road_mask = roads.mask.and(&field.valid);
        let shadows = timings.time("shadows", || {
            correct_shadows(&buildings.mask, &road_mask, &self.params.shadow)
        })?;

        let parks = timings.time("parks", || detect_parks(&planes, &self.params.park));
        let park_mask = parks.mask.and(&field.valid);

        let resolved = timings.time("conflicts", || {
            resolve_conflicts(&buildings.mask, &shadows.mask, &park_mask)
        })?;

        let masks = TerrainMasks {
            building: buildings.mask,
            road: resolved.road,
            park: resolved.park,
        };
        timings.total_ms = elapsed_ms(total_start);
        let summary = TerrainSummary::from_masks(&masks, true, timings.total_ms);
        debug!(
            "classify: {} building, {} road, {} park px in {:.2} ms",
            summary.building_pixels, summary.road_pixels, summary.park_pixels, summary.latency_ms
        );

        Ok(ClassificationReport {
            masks,
            height_map: field.height,
            summary,
            trace: ClassificationTrace {
                input,
                timings,
                height: height_stage,
                building: Some(buildings.stage),
                road: Some(roads.stage),
                shadow: Some(shadows.stage),
                park: Some(parks.stage),
                conflict: Some(resolved.stage),
            },
        })
    }
}

/// Classify one frame pair with default parameters.
pub fn classify(
    depth: &DepthImage<'_>,
    color: &ColorImage<'_>,
    depth_scale: f32,
    baseline_distance_m: Option<f32>,
) -> Result<TerrainMasks, FrameError> {
    TerrainClassifier::default().classify(depth, color, depth_scale, baseline_distance_m)
}

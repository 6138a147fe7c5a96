//! Road segmentation from the color frame and shadow suppression.
use crate::classifier::params::{RoadParams, ShadowParams};
use crate::color::{hsv_in_range, ColorPlanes};
use crate::diagnostics::{RegionFilterCounts, RoadStage, ShadowStage};
use crate::error::FrameError;
use crate::filters::{close, dilate, open, StructuringElement};
use crate::image::Mask;
use crate::regions::{label_components, Region};
use log::debug;

#[derive(Clone, Debug)]
pub struct RoadDetection {
    pub mask: Mask,
    pub stage: RoadStage,
}

#[derive(Clone, Debug)]
pub struct ShadowCorrection {
    pub mask: Mask,
    pub stage: ShadowStage,
}

/// Dark unsaturated material OR the alternate (bluish) road colour.
pub fn road_candidates(planes: &ColorPlanes, params: &RoadParams, stage: &mut RoadStage) -> Mask {
    let hsv = &planes.hsv;
    let mut out = Mask::new(hsv.w, hsv.h);
    for (dst, &px) in out.data.iter_mut().zip(&hsv.data) {
        let dark = hsv_in_range(px, params.dark.lower, params.dark.upper);
        let tinted = hsv_in_range(px, params.tinted.lower, params.tinted.upper);
        stage.dark_pixels += dark as usize;
        stage.tinted_pixels += tinted as usize;
        *dst = dark || tinted;
    }
    stage.candidate_pixels = out.count();
    out
}

/// Strips are kept from `min_area` on; compact blobs only once they reach
/// `large_area`.
fn road_shape_accepted(region: &Region, params: &RoadParams) -> bool {
    region.area >= params.min_area
        && (region.bbox.aspect_ratio() >= params.min_elongation
            || region.area >= params.large_area)
}

pub fn detect_roads(planes: &ColorPlanes, params: &RoadParams) -> RoadDetection {
    let mut stage = RoadStage::default();
    let candidates = road_candidates(planes, params, &mut stage);
    // Generous closing: paper roads are thin and fragment easily.
    let closed = close(
        &candidates,
        &StructuringElement::new(params.element, params.close_kernel),
    );
    let cleaned = open(
        &closed,
        &StructuringElement::new(params.element, params.open_kernel),
    );
    let components = label_components(&cleaned);
    let mut kept = 0usize;
    let mask = components.paint(|region| {
        let ok = road_shape_accepted(region, params);
        kept += ok as usize;
        ok
    });
    stage.regions = RegionFilterCounts {
        total: components.regions.len(),
        kept,
    };
    stage.road_pixels = mask.count();
    debug!(
        "roads: {} candidates ({} dark, {} tinted), {}/{} regions kept",
        stage.candidate_pixels,
        stage.dark_pixels,
        stage.tinted_pixels,
        kept,
        components.regions.len()
    );
    RoadDetection { mask, stage }
}

/// Remove small road regions touching the dilated building halo: next to a
/// block they are its cast shadow. Large regions are kept even when they
/// abut a building.
pub fn correct_shadows(
    building: &Mask,
    road: &Mask,
    params: &ShadowParams,
) -> Result<ShadowCorrection, FrameError> {
    building.ensure_same_shape(road)?;
    let mut stage = ShadowStage::default();
    if !building.any() || !road.any() {
        return Ok(ShadowCorrection {
            mask: road.clone(),
            stage,
        });
    }
    let halo = dilate(building, &StructuringElement::rect(params.halo_kernel));
    stage.halo_pixels = halo.count();

    let components = label_components(road);
    let mut touching = vec![false; components.regions.len() + 1];
    for (&label, &in_halo) in components.labels.iter().zip(&halo.data) {
        if in_halo && label != 0 {
            touching[label as usize] = true;
        }
    }
    let mask = components.paint(|region| {
        let shadow = touching[region.label as usize] && region.area < params.fragment_max_area;
        if shadow {
            stage.fragments_removed += 1;
            stage.pixels_removed += region.area;
        }
        !shadow
    });
    if stage.fragments_removed > 0 {
        debug!(
            "shadows: removed {} road fragments ({} px) next to buildings",
            stage.fragments_removed, stage.pixels_removed
        );
    }
    Ok(ShadowCorrection { mask, stage })
}

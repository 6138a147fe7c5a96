//! Park segmentation: two independent colour criteria must agree.
//!
//! The HSV box alone accepts lighting-induced green casts on sand; the
//! chrominance band alone accepts teal and cyan materials. Their
//! intersection is what survives.
use crate::classifier::params::ParkParams;
use crate::color::{hsv_in_range, ColorPlanes};
use crate::diagnostics::{ParkStage, RegionFilterCounts};
use crate::filters::{close, open, StructuringElement};
use crate::image::Mask;
use crate::regions::label_components;
use log::debug;

#[derive(Clone, Debug)]
pub struct ParkDetection {
    pub mask: Mask,
    pub stage: ParkStage,
}

/// Per-pixel AND of the HSV green box and the chrominance band.
pub fn park_candidates(planes: &ColorPlanes, params: &ParkParams, stage: &mut ParkStage) -> Mask {
    let [a_lo, a_hi] = params.chroma_a_band;
    let mut out = Mask::new(planes.width(), planes.height());
    for ((dst, &px), &a) in out
        .data
        .iter_mut()
        .zip(&planes.hsv.data)
        .zip(&planes.chroma_a)
    {
        let hue = hsv_in_range(px, params.hsv.lower, params.hsv.upper);
        let chroma = a >= a_lo && a <= a_hi;
        stage.hue_pixels += hue as usize;
        stage.chroma_pixels += chroma as usize;
        *dst = hue && chroma;
    }
    stage.fused_pixels = out.count();
    out
}

pub fn detect_parks(planes: &ColorPlanes, params: &ParkParams) -> ParkDetection {
    let mut stage = ParkStage::default();
    let candidates = park_candidates(planes, params, &mut stage);
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
        let ok = region.area >= params.min_area;
        kept += ok as usize;
        ok
    });
    stage.regions = RegionFilterCounts {
        total: components.regions.len(),
        kept,
    };
    stage.park_pixels = mask.count();
    debug!(
        "parks: hue {} px, chroma {} px, fused {} px, {}/{} regions kept",
        stage.hue_pixels,
        stage.chroma_pixels,
        stage.fused_pixels,
        kept,
        components.regions.len()
    );
    ParkDetection { mask, stage }
}

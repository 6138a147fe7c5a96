//! Hill-invariant building detection on the height map.
//!
//! Two signals are fused per pixel:
//!
//! - the *local height difference*, height minus the valid-only box mean of
//!   its neighbourhood, clamped at 0. A block on a hill and the same block on
//!   flat ground give the same value because only the deviation from the
//!   immediate surroundings is measured;
//! - the *global relative height*, `(h - min) / (max - min)` over valid
//!   pixels, used together with an absolute height band as a fallback where
//!   the local signal is ambiguous (terrain discontinuities).
//!
//! Candidates are closed before they are opened so a fragmented block is
//! reconnected before speckle removal can delete its pieces. Surviving
//! regions are filtered by enclosed area and optionally by compactness, then
//! painted solid and their edges softened. The local signal only fires near
//! a step, so a large block arrives as a ring of candidates; its size is the
//! area the ring encloses, not the ring's pixel count.
use crate::classifier::params::BuildingParams;
use crate::diagnostics::{BuildingStage, RegionFilterCounts};
use crate::error::FrameError;
use crate::filters::{
    close, dilate, local_mean_valid_only, open, smooth_mask, Kernel1D, StructuringElement,
};
use crate::height::{HeightField, FLAT_RANGE_EPS};
use crate::image::{ImageF32, Mask};
use crate::regions::label_components;
use log::debug;

/// Building mask plus the statistics gathered while producing it.
#[derive(Clone, Debug)]
pub struct BuildingDetection {
    pub mask: Mask,
    pub stage: BuildingStage,
}

/// `max(height - local_mean, 0)` over valid pixels; 0 elsewhere.
pub fn local_height_difference(field: &HeightField, kernel: usize) -> ImageF32 {
    let mean = local_mean_valid_only(&field.height, &field.valid, kernel);
    let mut diff = ImageF32::new(field.height.w, field.height.h);
    for (i, d) in diff.data.iter_mut().enumerate() {
        if field.valid.data[i] {
            *d = (field.height.data[i] - mean.data[i]).max(0.0);
        }
    }
    diff
}

/// Height normalised to `[0, 1]` over the valid range. Uniformly 0 when the
/// range is empty or degenerate.
pub fn relative_height(field: &HeightField) -> ImageF32 {
    let mut rel = ImageF32::new(field.height.w, field.height.h);
    let Some((lo, hi)) = field.range() else {
        return rel;
    };
    let span = hi - lo;
    if span <= FLAT_RANGE_EPS {
        return rel;
    }
    for (i, r) in rel.data.iter_mut().enumerate() {
        if field.valid.data[i] {
            *r = (field.height.data[i] - lo) / span;
        }
    }
    rel
}

#[inline]
fn in_band(v: f32, band: [f32; 2]) -> bool {
    v >= band[0] && v <= band[1]
}

/// Fused candidate mask before morphology.
pub fn building_candidates(
    field: &HeightField,
    params: &BuildingParams,
    stage: &mut BuildingStage,
) -> Mask {
    let diff = local_height_difference(field, params.local_mean_kernel);
    let rel = relative_height(field);
    let (w, h) = (field.height.w, field.height.h);
    let mut out = Mask::new(w, h);
    for i in 0..w * h {
        if !field.valid.data[i] {
            continue;
        }
        let local = in_band(diff.data[i], params.local_diff_band);
        let fallback = in_band(field.height.data[i], params.absolute_band)
            && rel.data[i] > params.relative_cutoff;
        stage.local_diff_pixels += local as usize;
        stage.fallback_pixels += fallback as usize;
        out.data[i] = local || fallback;
    }
    stage.candidate_pixels = out.count();
    out
}

#[inline]
fn area_accepted(enclosed: usize, params: &BuildingParams) -> bool {
    let [min_area, max_area] = params.area_band;
    enclosed > min_area && enclosed < max_area
}

/// Detect buildings on `field`. Frames without signal produce an empty
/// mask; the only error is a height map and validity mask of different
/// shapes.
pub fn detect_buildings(
    field: &HeightField,
    params: &BuildingParams,
) -> Result<BuildingDetection, FrameError> {
    field.ensure_consistent()?;
    let (w, h) = (field.height.w, field.height.h);
    let mut stage = BuildingStage::default();
    if !field.has_signal() {
        return Ok(BuildingDetection {
            mask: Mask::new(w, h),
            stage,
        });
    }

    let candidates = building_candidates(field, params, &mut stage);
    let mut cleaned = close(
        &candidates,
        &StructuringElement::new(params.element, params.close_kernel),
    );
    cleaned = open(
        &cleaned,
        &StructuringElement::new(params.element, params.open_kernel),
    );
    if params.dilate_kernel > 1 {
        cleaned = dilate(
            &cleaned,
            &StructuringElement::new(params.element, params.dilate_kernel),
        );
    }

    let components = label_components(&cleaned);
    let mut kept = 0usize;
    let mut rejected_round = 0usize;
    let filled = components.paint_filled(|region| {
        if !area_accepted(components.enclosed_area(region), params) {
            return false;
        }
        if let Some(limit) = params.max_compactness {
            if region.contour.compactness() > limit {
                rejected_round += 1;
                return false;
            }
        }
        kept += 1;
        true
    });
    stage.regions = RegionFilterCounts {
        total: components.regions.len(),
        kept,
    };
    stage.rejected_round = rejected_round;

    let mask = smooth_mask(&filled, &Kernel1D::gaussian(params.edge_smoothing_kernel))
        .and(&field.valid);
    stage.building_pixels = mask.count();
    debug!(
        "buildings: {} candidates, {}/{} regions kept ({} too round), {} px",
        stage.candidate_pixels,
        kept,
        components.regions.len(),
        rejected_round,
        stage.building_pixels
    );
    Ok(BuildingDetection { mask, stage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::params::HeightParams;
    use crate::height::extract_height;
    use crate::image::DepthImage;

    fn field_from(w: usize, h: usize, depth: &[u16]) -> HeightField {
        extract_height(&DepthImage::new(w, h, depth), 0.001, &HeightParams::default()).unwrap()
    }

    fn raise(depth: &mut [u16], w: usize, inside: impl Fn(usize, usize) -> bool, by: u16) {
        for (i, d) in depth.iter_mut().enumerate() {
            if inside(i % w, i / w) {
                *d += by;
            }
        }
    }

    fn block_scene(ground: u16, block: u16) -> Vec<u16> {
        let (w, h) = (96, 80);
        let mut depth = vec![ground; w * h];
        for y in 28..52 {
            for x in 36..60 {
                depth[y * w + x] = block;
            }
        }
        depth
    }

    #[test]
    fn relative_height_is_zero_on_flat_frame() {
        let field = field_from(8, 8, &vec![420u16; 64]);
        assert!(relative_height(&field).data.iter().all(|&v| v == 0.0));
        assert!(local_height_difference(&field, 5)
            .data
            .iter()
            .all(|&v| v.abs() < 1e-4));
    }

    #[test]
    fn raised_block_is_found_where_it_stands() {
        let field = field_from(96, 80, &block_scene(300, 350));
        let detection = detect_buildings(&field, &BuildingParams::default()).unwrap();
        let mask = &detection.mask;
        assert_eq!(detection.stage.regions.kept, 1);
        assert!(mask.get(48, 40), "block centre must be filled");
        assert!(mask.get(38, 30) && mask.get(57, 49));
        assert!(!mask.get(10, 10) && !mask.get(80, 70));
        let area = mask.count();
        assert!((450..=700).contains(&area), "unexpected building area {area}");
    }

    #[test]
    fn plateau_offset_does_not_change_the_result() {
        let params = BuildingParams::default();
        let low = detect_buildings(&field_from(96, 80, &block_scene(300, 350)), &params).unwrap();
        let high = detect_buildings(&field_from(96, 80, &block_scene(400, 450)), &params).unwrap();
        assert_eq!(low.mask, high.mask);
    }

    #[test]
    fn regions_outside_the_area_band_are_dropped() {
        let field = field_from(96, 80, &block_scene(300, 350));
        let params = BuildingParams {
            area_band: [30, 200],
            ..BuildingParams::default()
        };
        let detection = detect_buildings(&field, &params).unwrap();
        assert!(!detection.mask.any());
        assert_eq!(detection.stage.regions.rejected(), 1);
    }

    #[test]
    fn compactness_cutoff_rejects_square_blocks_when_strict() {
        let field = field_from(96, 80, &block_scene(300, 350));
        let params = BuildingParams {
            max_compactness: Some(0.5),
            ..BuildingParams::default()
        };
        let detection = detect_buildings(&field, &params).unwrap();
        assert!(!detection.mask.any());
        assert_eq!(detection.stage.rejected_round, 1);
    }

    #[test]
    fn oversized_structure_is_measured_by_what_it_encloses() {
        // Only a ring near the step fires, but the block covers 140 x 140.
        let (w, h) = (240, 240);
        let mut depth = vec![300u16; w * h];
        raise(&mut depth, w, |x, y| (50..190).contains(&x) && (50..190).contains(&y), 50);
        let field = field_from(w, h, &depth);

        let detection = detect_buildings(&field, &BuildingParams::default()).unwrap();
        assert!(!detection.mask.any());
        assert_eq!(detection.stage.regions.total, 1);
        assert_eq!(detection.stage.regions.kept, 0);

        let params = BuildingParams {
            area_band: [30, 25_000],
            ..BuildingParams::default()
        };
        let detection = detect_buildings(&field, &params).unwrap();
        assert_eq!(detection.stage.regions.kept, 1);
        assert!(detection.mask.get(120, 120));
        assert!(detection.mask.count() > 15_000);
    }

    #[test]
    fn compactness_cutoff_drops_mounds_and_keeps_blocks() {
        let (w, h) = (120, 72);
        let mut depth = vec![300u16; w * h];
        raise(&mut depth, w, |x, y| (16..40).contains(&x) && (24..48).contains(&y), 50);
        raise(
            &mut depth,
            w,
            |x, y| {
                let (dx, dy) = (x as i64 - 86, y as i64 - 36);
                dx * dx + dy * dy <= 14 * 14
            },
            50,
        );
        let field = field_from(w, h, &depth);

        let everything = detect_buildings(&field, &BuildingParams::default()).unwrap();
        assert_eq!(everything.stage.regions.kept, 2);

        let params = BuildingParams {
            max_compactness: Some(0.82),
            ..BuildingParams::default()
        };
        let detection = detect_buildings(&field, &params).unwrap();
        assert_eq!(detection.stage.regions.kept, 1);
        assert_eq!(detection.stage.rejected_round, 1);
        assert!(detection.mask.get(27, 35), "square block must survive");
        assert!(!detection.mask.get(86, 36), "round mound must be dropped");
    }

    #[test]
    fn mismatched_validity_is_rejected() {
        let mut field = field_from(16, 16, &vec![300u16; 256]);
        field.valid = Mask::filled(16, 15, true);
        let err = detect_buildings(&field, &BuildingParams::default());
        assert!(matches!(err, Err(FrameError::MaskMismatch { .. })));
    }

    #[test]
    fn no_signal_gives_empty_mask() {
        let field = field_from(16, 16, &vec![0u16; 256]);
        let detection = detect_buildings(&field, &BuildingParams::default()).unwrap();
        assert!(!detection.mask.any());
        assert_eq!(detection.stage.candidate_pixels, 0);
    }
}

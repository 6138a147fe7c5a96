//! Metric height map and validity from raw depth.
//!
//! Heights are `raw * depth_scale` without clamping. A pixel is valid when
//! its height is positive and its raw sample is not the configured sentinel.
//! Smoothing only ever reads valid samples, so validity is never
//! redistributed: invalid pixels stay invalid and keep height 0.
use crate::classifier::params::{HeightParams, SmoothingKind};
use crate::error::FrameError;
use crate::filters::{convolve_valid_only, median_valid_only, Kernel1D};
use crate::image::{DepthImage, ImageF32, ImageView, Mask};
use log::debug;

/// Height spans below this (metres) count as flat; smoothing leaves ulp-level
/// noise on a uniform frame.
pub const FLAT_RANGE_EPS: f32 = 1e-6;

/// Output of [`extract_height`].
#[derive(Clone, Debug)]
pub struct HeightField {
    /// Smoothed height in metres; 0 where invalid.
    pub height: ImageF32,
    pub valid: Mask,
    pub valid_count: usize,
}

impl HeightField {
    /// Min and max height over valid pixels, `None` without signal.
    pub fn range(&self) -> Option<(f32, f32)> {
        self.height.range_where(&self.valid)
    }

    pub fn has_signal(&self) -> bool {
        self.valid_count > 0
    }

    /// [`FrameError::MaskMismatch`] unless height and validity cover the same
    /// grid.
    pub fn ensure_consistent(&self) -> Result<(), FrameError> {
        if self.height.w == self.valid.w && self.height.h == self.valid.h {
            Ok(())
        } else {
            Err(FrameError::MaskMismatch {
                left: (self.height.w, self.height.h),
                right: (self.valid.w, self.valid.h),
            })
        }
    }

    /// All valid heights are equal (within [`FLAT_RANGE_EPS`]).
    pub fn is_flat(&self) -> bool {
        matches!(self.range(), Some((lo, hi)) if hi - lo <= FLAT_RANGE_EPS)
    }
}

/// Convert `depth` to a smoothed metric height map.
///
/// Fails only on malformed input (empty or truncated buffer, unusable
/// scale). A frame without a single valid sample yields a zero map and an
/// all-false validity mask.
pub fn extract_height(
    depth: &DepthImage<'_>,
    depth_scale: f32,
    params: &HeightParams,
) -> Result<HeightField, FrameError> {
    depth.validate()?;
    if !depth_scale.is_finite() || depth_scale <= 0.0 {
        return Err(FrameError::InvalidDepthScale(depth_scale));
    }
    let (w, h) = (depth.w, depth.h);
    let mut raw = ImageF32::new(w, h);
    let mut valid = Mask::new(w, h);
    for y in 0..h {
        let src = depth.row(y);
        for (x, &d) in src.iter().enumerate() {
            let metres = d as f32 * depth_scale;
            let ok = metres > 0.0 && params.invalid_sentinel != Some(d);
            let i = y * w + x;
            valid.data[i] = ok;
            if ok {
                raw.data[i] = metres;
            }
        }
    }
    let valid_count = valid.count();
    debug!(
        "height: {}x{} frame, {} valid pixels, smoothing {:?}/{}",
        w, h, valid_count, params.smoothing, params.smoothing_kernel
    );
    if valid_count == 0 {
        debug!("height: no valid depth, reporting an empty scene");
        return Ok(HeightField {
            height: raw,
            valid,
            valid_count,
        });
    }

    let size = params.smoothing_kernel;
    let height = match params.smoothing {
        _ if size <= 1 => raw,
        SmoothingKind::None => raw,
        SmoothingKind::Gaussian => convolve_valid_only(&raw, &valid, &Kernel1D::gaussian(size)),
        SmoothingKind::Median => median_valid_only(&raw, &valid, size),
    };
    Ok(HeightField {
        height,
        valid,
        valid_count,
    })
}

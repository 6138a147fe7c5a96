//! Noise-propagation map derived from the classified masks.
//!
//! Roads and parks emit noise at fixed intensities. The field diffuses by
//! repeated Gaussian blurs; building pixels keep their previous value, so
//! blocks do not pass noise on, and sources are re-imposed after every step
//! so they never wash out. The result is min-max normalised to `[0, 1]`.
use crate::classifier::params::NoiseParams;
use crate::error::FrameError;
use crate::filters::{convolve_separable, Border, Kernel1D};
use crate::image::ImageF32;
use crate::types::TerrainMasks;
use log::debug;

/// Fails only when the class masks cover different grids.
pub fn propagate_noise(
    masks: &TerrainMasks,
    params: &NoiseParams,
) -> Result<ImageF32, FrameError> {
    masks.building.ensure_same_shape(&masks.road)?;
    masks.building.ensure_same_shape(&masks.park)?;
    let (w, h) = (masks.width(), masks.height());
    let mut sources = ImageF32::new(w, h);
    for (i, s) in sources.data.iter_mut().enumerate() {
        if masks.road.data[i] {
            *s += params.road_intensity;
        }
        if masks.park.data[i] {
            *s += params.park_intensity;
        }
    }

    let kernel = Kernel1D::gaussian(params.kernel_size);
    let mut noise = sources.clone();
    for _ in 0..params.iterations {
        let blurred = convolve_separable(&noise, &kernel, Border::Reflect101);
        for (i, n) in noise.data.iter_mut().enumerate() {
            let next = if masks.building.data[i] {
                *n
            } else {
                blurred.data[i]
            };
            *n = next.max(sources.data[i]);
        }
    }

    normalize_min_max(&mut noise);
    debug!(
        "noise: {} iterations, kernel {}, {}x{}",
        params.iterations, params.kernel_size, w, h
    );
    Ok(noise)
}

/// Rescale to `[0, 1]` in place; a flat field becomes all zero.
fn normalize_min_max(img: &mut ImageF32) {
    let (lo, hi) = img
        .data
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;
    if !(span > 0.0) {
        img.data.iter_mut().for_each(|v| *v = 0.0);
        return;
    }
    img.data.iter_mut().for_each(|v| *v = (*v - lo) / span);
}

/// 8-bit view of a normalised map (0 silent, 255 loudest).
pub fn noise_to_u8(noise: &ImageF32) -> Vec<u8> {
    noise
        .data
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Mask;

    fn params() -> NoiseParams {
        NoiseParams {
            iterations: 6,
            kernel_size: 7,
            ..NoiseParams::default()
        }
    }

    #[test]
    fn road_is_loudest_and_noise_decays_with_distance() {
        let mut masks = TerrainMasks::empty(40, 10);
        for y in 0..10 {
            masks.road.set(0, y, true);
        }
        let noise = propagate_noise(&masks, &params()).unwrap();
        assert!((noise.get(0, 5) - 1.0).abs() < 1e-6);
        assert!(noise.get(3, 5) > noise.get(10, 5));
        assert!(noise.get(10, 5) >= noise.get(39, 5));
        assert!(noise.data.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn buildings_block_spreading() {
        let mut masks = TerrainMasks::empty(30, 5);
        for y in 0..5 {
            masks.road.set(0, y, true);
            for x in 10..14 {
                masks.building.set(x, y, true);
            }
        }
        let noise = propagate_noise(&masks, &params()).unwrap();
        // The wall never gets louder than zero, so nothing passes it.
        assert_eq!(noise.get(12, 2), 0.0);
        assert!(noise.get(5, 2) > 0.0);
    }

    #[test]
    fn park_sources_are_quieter_than_roads() {
        let mut masks = TerrainMasks::empty(40, 5);
        for y in 0..5 {
            masks.road.set(0, y, true);
            masks.park.set(39, y, true);
        }
        let noise = propagate_noise(&masks, &params()).unwrap();
        assert!(noise.get(39, 2) < noise.get(0, 2));
        assert!(noise.get(39, 2) > 0.0);
    }

    #[test]
    fn silent_scene_maps_to_zero() {
        let masks = TerrainMasks::empty(8, 8);
        let noise = propagate_noise(&masks, &params()).unwrap();
        assert!(noise_to_u8(&noise).iter().all(|&v| v == 0));
    }

    #[test]
    fn masks_of_different_sizes_are_rejected() {
        let mut masks = TerrainMasks::empty(8, 8);
        masks.park = Mask::new(8, 7);
        assert!(matches!(
            propagate_noise(&masks, &params()),
            Err(FrameError::MaskMismatch { .. })
        ));
    }
}

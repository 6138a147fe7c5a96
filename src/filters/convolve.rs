//! Separable convolution over `ImageF32`.
//!
//! Two 1D passes (horizontal then vertical). The plain variant resolves
//! out-of-range taps through a [`Border`] policy; the validity-weighted
//! variant drops both out-of-range and invalid taps and renormalises by the
//! weight that remained, so invalid samples never leak into valid ones.
use super::for_each_row;
use super::kernels::SeparableFilter;
use crate::image::{ImageF32, ImageView, Mask};

/// Border extrapolation for out-of-range taps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Border {
    /// `aaa|abcd|ddd`
    Replicate,
    /// `dcb|abcd|cba`
    #[default]
    Reflect101,
}

#[inline]
fn border_index(idx: isize, len: usize, border: Border) -> usize {
    let n = len as isize;
    if n <= 1 {
        return 0;
    }
    match border {
        Border::Replicate => idx.clamp(0, n - 1) as usize,
        Border::Reflect101 => {
            let mut i = idx;
            // Large kernels on tiny grids may need several reflections.
            while i < 0 || i >= n {
                if i < 0 {
                    i = -i;
                }
                if i >= n {
                    i = 2 * n - 2 - i;
                }
            }
            i as usize
        }
    }
}

/// Convolve `src` with `filter` along both axes.
pub fn convolve_separable<F: SeparableFilter + ?Sized>(
    src: &ImageF32,
    filter: &F,
    border: Border,
) -> ImageF32 {
    let (w, h) = (src.w, src.h);
    let taps = filter.taps();
    if w == 0 || h == 0 || taps.is_empty() {
        return src.clone();
    }
    let radius = (taps.len() / 2) as isize;

    let mut tmp = ImageF32::new(w, h);
    for_each_row(&mut tmp.data, w, |y, out| {
        let row = src.row(y);
        for (x, dst) in out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &t) in taps.iter().enumerate() {
                let sx = border_index(x as isize + k as isize - radius, w, border);
                acc += t * row[sx];
            }
            *dst = acc;
        }
    });

    let mut out = ImageF32::new(w, h);
    for_each_row(&mut out.data, w, |y, dst_row| {
        for (k, &t) in taps.iter().enumerate() {
            let sy = border_index(y as isize + k as isize - radius, h, border);
            let src_row = tmp.row(sy);
            for (dst, &v) in dst_row.iter_mut().zip(src_row) {
                *dst += t * v;
            }
        }
    });
    out
}

/// Validity-weighted convolution: each valid output is the weighted mean of
/// the valid samples under the kernel. Invalid outputs are 0.
pub fn convolve_valid_only<F: SeparableFilter + ?Sized>(
    src: &ImageF32,
    valid: &Mask,
    filter: &F,
) -> ImageF32 {
    debug_assert!(src.w == valid.w && src.h == valid.h);
    let (w, h) = (src.w, src.h);
    let taps = filter.taps();
    if w == 0 || h == 0 || taps.is_empty() {
        return src.clone();
    }
    let radius = (taps.len() / 2) as isize;

    // Interleaved (weighted sum, weight) pairs from the horizontal pass.
    let mut horiz = vec![(0.0f32, 0.0f32); w * h];
    for_each_row(&mut horiz, w, |y, out| {
        let row = src.row(y);
        let vrow = valid.row(y);
        for (x, dst) in out.iter_mut().enumerate() {
            let mut num = 0.0f32;
            let mut den = 0.0f32;
            for (k, &t) in taps.iter().enumerate() {
                let sx = x as isize + k as isize - radius;
                if sx < 0 || sx >= w as isize {
                    continue;
                }
                let sx = sx as usize;
                if vrow[sx] {
                    num += t * row[sx];
                    den += t;
                }
            }
            *dst = (num, den);
        }
    });

    let mut out = ImageF32::new(w, h);
    for_each_row(&mut out.data, w, |y, dst_row| {
        let vrow = valid.row(y);
        for (x, dst) in dst_row.iter_mut().enumerate() {
            if !vrow[x] {
                continue;
            }
            let mut num = 0.0f32;
            let mut den = 0.0f32;
            for (k, &t) in taps.iter().enumerate() {
                let sy = y as isize + k as isize - radius;
                if sy < 0 || sy >= h as isize {
                    continue;
                }
                let (n, d) = horiz[sy as usize * w + x];
                num += t * n;
                den += t * d;
            }
            // den > 0 always holds here: the centre tap reads this valid pixel.
            if den > 0.0 {
                *dst = num / den;
            }
        }
    });
    out
}

/// Blur a binary mask and re-threshold at half intensity, rounding off
/// single-pixel jaggies along region borders.
pub fn smooth_mask<F: SeparableFilter + ?Sized>(mask: &Mask, filter: &F) -> Mask {
    if filter.taps().len() <= 1 {
        return mask.clone();
    }
    let as_f32 = ImageF32::from_mask(mask, 1.0, 0.0);
    let blurred = convolve_separable(&as_f32, filter, Border::Reflect101);
    Mask {
        w: mask.w,
        h: mask.h,
        data: blurred.data.iter().map(|&v| v > 127.0 / 255.0).collect(),
    }
}

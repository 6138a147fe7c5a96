//! Summed-area tables restricted to valid samples.
//!
//! A local mean over a `k × k` window costs four lookups regardless of `k`,
//! which keeps the wide (≈21 px) neighbourhood used for hill-invariant height
//! differences cheap at video rate.
use super::for_each_row;
use crate::image::{ImageF32, ImageView, Mask};

/// Integral image of values and valid counts, `(w + 1) × (h + 1)` entries.
#[derive(Clone, Debug)]
pub struct IntegralImage {
    w: usize,
    h: usize,
    sums: Vec<f64>,
    counts: Vec<u32>,
}

impl IntegralImage {
    /// Accumulate only pixels where `valid` is set.
    pub fn from_valid(src: &ImageF32, valid: &Mask) -> Self {
        debug_assert!(src.w == valid.w && src.h == valid.h);
        let (w, h) = (src.w, src.h);
        let stride = w + 1;
        let mut sums = vec![0.0f64; stride * (h + 1)];
        let mut counts = vec![0u32; stride * (h + 1)];
        for y in 0..h {
            let row = src.row(y);
            let vrow = valid.row(y);
            let mut row_sum = 0.0f64;
            let mut row_count = 0u32;
            for x in 0..w {
                if vrow[x] {
                    row_sum += row[x] as f64;
                    row_count += 1;
                }
                let i = (y + 1) * stride + x + 1;
                sums[i] = sums[i - stride] + row_sum;
                counts[i] = counts[i - stride] + row_count;
            }
        }
        Self { w, h, sums, counts }
    }

    /// Sum and count over the inclusive window `[x0, x1] × [y0, y1]`.
    pub fn window(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> (f64, u32) {
        let stride = self.w + 1;
        let (a, b) = (y0 * stride + x0, y0 * stride + x1 + 1);
        let (c, d) = ((y1 + 1) * stride + x0, (y1 + 1) * stride + x1 + 1);
        let sum = self.sums[d] - self.sums[b] - self.sums[c] + self.sums[a];
        let count = self.counts[d] + self.counts[a] - self.counts[b] - self.counts[c];
        (sum, count)
    }

    /// Mean of valid samples in the window clipped to the grid, centred on
    /// `(x, y)` with the given radius. `None` when no valid sample is covered.
    pub fn centred_mean(&self, x: usize, y: usize, radius: usize) -> Option<f64> {
        if self.w == 0 || self.h == 0 {
            return None;
        }
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius).min(self.w - 1);
        let y1 = (y + radius).min(self.h - 1);
        let (sum, count) = self.window(x0, y0, x1, y1);
        (count > 0).then(|| sum / count as f64)
    }
}

/// Box mean of valid samples over a `size × size` window (clipped at the
/// borders). Invalid pixels yield 0.
pub fn local_mean_valid_only(src: &ImageF32, valid: &Mask, size: usize) -> ImageF32 {
    let integral = IntegralImage::from_valid(src, valid);
    let radius = size.max(1) / 2;
    let mut out = ImageF32::new(src.w, src.h);
    for_each_row(&mut out.data, src.w, |y, dst_row| {
        let vrow = valid.row(y);
        for (x, dst) in dst_row.iter_mut().enumerate() {
            if vrow[x] {
                *dst = integral.centred_mean(x, y, radius).unwrap_or(0.0) as f32;
            }
        }
    });
    out
}

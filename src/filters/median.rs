//! Rank (median) smoothing that only reads valid samples.
use super::for_each_row;
use crate::image::{ImageF32, ImageView, Mask};
use std::cmp::Ordering;

/// Median of valid samples in a `size × size` window (clipped at borders).
/// Invalid pixels stay 0.
pub fn median_valid_only(src: &ImageF32, valid: &Mask, size: usize) -> ImageF32 {
    debug_assert!(src.w == valid.w && src.h == valid.h);
    let (w, h) = (src.w, src.h);
    let half = (size.max(1) / 2) as isize;
    let mut out = ImageF32::new(w, h);
    for_each_row(&mut out.data, w, |y, dst_row| {
        let mut buf = Vec::with_capacity((2 * half as usize + 1).pow(2));
        for (x, dst) in dst_row.iter_mut().enumerate() {
            if !valid.get(x, y) {
                continue;
            }
            buf.clear();
            for dy in -half..=half {
                let yy = y as isize + dy;
                if yy < 0 || yy >= h as isize {
                    continue;
                }
                let row = src.row(yy as usize);
                let vrow = valid.row(yy as usize);
                for dx in -half..=half {
                    let xx = x as isize + dx;
                    if xx < 0 || xx >= w as isize {
                        continue;
                    }
                    if vrow[xx as usize] {
                        buf.push(row[xx as usize]);
                    }
                }
            }
            buf.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            *dst = buf[buf.len() / 2];
        }
    });
    out
}

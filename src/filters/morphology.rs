//! Binary morphology on [`Mask`].
//!
//! Structuring elements are stored as one horizontal span per kernel row, so
//! erosion and dilation reduce to span counts over per-row prefix sums:
//! O(W·H·kh) instead of O(W·H·kw·kh). Pixels outside the grid never erode
//! and never dilate, matching the usual border convention for morphology.
use super::for_each_row;
use crate::image::{ImageView, Mask};
use serde::{Deserialize, Serialize};

/// Structuring element shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementShape {
    #[default]
    Ellipse,
    Rect,
}

/// Kernel rows as `(dy, dx_min, dx_max)` offsets from the anchor (inclusive).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    spans: Vec<(isize, isize, isize)>,
}

impl StructuringElement {
    pub fn new(shape: ElementShape, size: usize) -> Self {
        match shape {
            ElementShape::Ellipse => Self::ellipse(size),
            ElementShape::Rect => Self::rect(size),
        }
    }

    /// Full `size × size` square.
    pub fn rect(size: usize) -> Self {
        let size = size.max(1) as isize;
        let anchor = size / 2;
        let spans = (0..size)
            .map(|i| (i - anchor, -anchor, size - 1 - anchor))
            .collect();
        Self { spans }
    }

    /// Ellipse inscribed in a `size × size` box, rasterised row by row.
    pub fn ellipse(size: usize) -> Self {
        let size = size.max(1) as isize;
        let r = size / 2;
        let c = size / 2;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };
        let mut spans = Vec::with_capacity(size as usize);
        for i in 0..size {
            let dy = i - r;
            let (j1, j2) = if dy.abs() <= r {
                let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as isize;
                ((c - dx).max(0), (c + dx + 1).min(size))
            } else {
                (0, 0)
            };
            if j2 > j1 {
                spans.push((dy, j1 - c, j2 - 1 - c));
            }
        }
        Self { spans }
    }

    /// Number of kernel pixels.
    pub fn area(&self) -> usize {
        self.spans
            .iter()
            .map(|&(_, lo, hi)| (hi - lo + 1) as usize)
            .sum()
    }

    fn is_identity(&self) -> bool {
        self.spans == [(0, 0, 0)]
    }
}

/// Per-row prefix counts of set pixels, `(w + 1)` entries per row.
fn row_prefix_counts(mask: &Mask) -> Vec<u32> {
    let stride = mask.w + 1;
    let mut prefix = vec![0u32; stride * mask.h];
    for (y, row) in mask.rows().enumerate() {
        let dst = &mut prefix[y * stride..(y + 1) * stride];
        for (x, &v) in row.iter().enumerate() {
            dst[x + 1] = dst[x] + v as u32;
        }
    }
    prefix
}

/// A pixel survives erosion when every in-grid pixel under the element is set.
pub fn erode(mask: &Mask, element: &StructuringElement) -> Mask {
    if element.is_identity() {
        return mask.clone();
    }
    let (w, h) = (mask.w as isize, mask.h as isize);
    let stride = mask.w + 1;
    let prefix = row_prefix_counts(mask);
    let mut out = Mask::new(mask.w, mask.h);
    for_each_row(&mut out.data, mask.w, |y, dst_row| {
        let src_row = mask.row(y);
        for (x, dst) in dst_row.iter_mut().enumerate() {
            if !src_row[x] {
                continue;
            }
            let mut keep = true;
            for &(dy, lo, hi) in &element.spans {
                let yy = y as isize + dy;
                if yy < 0 || yy >= h {
                    continue;
                }
                let x0 = (x as isize + lo).max(0);
                let x1 = (x as isize + hi).min(w - 1);
                if x1 < x0 {
                    continue;
                }
                let base = yy as usize * stride;
                let count = prefix[base + x1 as usize + 1] - prefix[base + x0 as usize];
                if count as isize != x1 - x0 + 1 {
                    keep = false;
                    break;
                }
            }
            *dst = keep;
        }
    });
    out
}

/// A pixel is set after dilation when any pixel under the element is set.
pub fn dilate(mask: &Mask, element: &StructuringElement) -> Mask {
    if element.is_identity() {
        return mask.clone();
    }
    let (w, h) = (mask.w as isize, mask.h as isize);
    let stride = mask.w + 1;
    let prefix = row_prefix_counts(mask);
    let mut out = Mask::new(mask.w, mask.h);
    for_each_row(&mut out.data, mask.w, |y, dst_row| {
        for (x, dst) in dst_row.iter_mut().enumerate() {
            for &(dy, lo, hi) in &element.spans {
                // Reflected element: a set pixel at +d lights up the anchor at -d.
                let yy = y as isize - dy;
                if yy < 0 || yy >= h {
                    continue;
                }
                let x0 = (x as isize - hi).max(0);
                let x1 = (x as isize - lo).min(w - 1);
                if x1 < x0 {
                    continue;
                }
                let base = yy as usize * stride;
                if prefix[base + x1 as usize + 1] > prefix[base + x0 as usize] {
                    *dst = true;
                    break;
                }
            }
        }
    });
    out
}

/// Erode then dilate: removes specks smaller than the element.
pub fn open(mask: &Mask, element: &StructuringElement) -> Mask {
    dilate(&erode(mask, element), element)
}

/// Dilate then erode: bridges gaps narrower than the element.
pub fn close(mask: &Mask, element: &StructuringElement) -> Mask {
    erode(&dilate(mask, element), element)
}

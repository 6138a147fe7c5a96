//! Owned, tightly packed f32 grid: metric heights and the signals derived
//! from them (local differences, relative heights, noise levels).
use super::mask::Mask;
use super::traits::ImageView;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    pub w: usize,
    pub h: usize,
    /// Always equal to `w` for owned grids.
    pub stride: usize,
    /// Row-major samples.
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Zero-filled `w × h` grid.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// `on` where the mask is set, `off` elsewhere.
    pub fn from_mask(mask: &Mask, on: f32, off: f32) -> Self {
        Self {
            w: mask.w,
            h: mask.h,
            stride: mask.w,
            data: mask.data.iter().map(|&v| if v { on } else { off }).collect(),
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.stride + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        self.data[y * self.stride + x] = v;
    }

    /// Min and max over the pixels set in `mask`; `None` if none is set.
    pub fn range_where(&self, mask: &Mask) -> Option<(f32, f32)> {
        self.data
            .iter()
            .zip(&mask.data)
            .filter(|&(_, &on)| on)
            .fold(None, |acc, (&v, _)| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

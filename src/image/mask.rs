//! Owned binary grid used for validity, candidate and class masks.
//!
//! Pixels are stored as `bool`; the 0/255 byte convention only appears at
//! the I/O boundary (`to_u8`/`from_u8`).
use super::traits::ImageView;
use crate::error::FrameError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<bool>,
}

impl Mask {
    /// All-false mask of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, false)
    }

    pub fn filled(w: usize, h: usize, value: bool) -> Self {
        Self {
            w,
            h,
            data: vec![value; w * h],
        }
    }

    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self { w, h, data }
    }

    /// Interpret a byte buffer where any non-zero sample is set.
    pub fn from_u8(w: usize, h: usize, bytes: &[u8]) -> Option<Self> {
        (bytes.len() == w * h).then(|| Self {
            w,
            h,
            data: bytes.iter().map(|&b| b != 0).collect(),
        })
    }

    /// Export as 0/255 bytes.
    pub fn to_u8(&self) -> Vec<u8> {
        self.data.iter().map(|&v| if v { 255 } else { 0 }).collect()
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[self.idx(x, y)]
    }
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: bool) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn any(&self) -> bool {
        self.data.iter().any(|&v| v)
    }

    pub fn same_shape(&self, other: &Mask) -> bool {
        self.w == other.w && self.h == other.h
    }

    /// [`FrameError::MaskMismatch`] unless both masks cover the same grid.
    pub fn ensure_same_shape(&self, other: &Mask) -> Result<(), FrameError> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(FrameError::MaskMismatch {
                left: (self.w, self.h),
                right: (other.w, other.h),
            })
        }
    }

    /// `self AND other`.
    pub fn and(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a && b)
    }

    /// `self AND NOT other`.
    pub fn and_not(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a && !b)
    }

    /// `self OR other`.
    pub fn or(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a || b)
    }

    /// Number of pixels set in both masks.
    pub fn overlap(&self, other: &Mask) -> usize {
        debug_assert!(self.same_shape(other));
        self.data
            .iter()
            .zip(&other.data)
            .filter(|&(&a, &b)| a && b)
            .count()
    }

    fn zip_with(&self, other: &Mask, op: impl Fn(bool, bool) -> bool) -> Mask {
        debug_assert!(self.same_shape(other), "mask shapes differ");
        Mask {
            w: self.w,
            h: self.h,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| op(a, b))
                .collect(),
        }
    }
}

impl ImageView for Mask {
    type Pixel = bool;

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
        self.w
    }
    #[inline]
    fn row(&self, y: usize) -> &[bool] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_ops_follow_pixelwise_truth_tables() {
        let a = Mask::from_u8(2, 2, &[255, 255, 0, 0]).unwrap();
        let b = Mask::from_u8(2, 2, &[255, 0, 255, 0]).unwrap();
        assert_eq!(a.and(&b).data, vec![true, false, false, false]);
        assert_eq!(a.and_not(&b).data, vec![false, true, false, false]);
        assert_eq!(a.or(&b).data, vec![true, true, true, false]);
        assert_eq!(a.overlap(&b), 1);
        assert_eq!(a.to_u8(), vec![255, 255, 0, 0]);
    }

    #[test]
    fn shape_check_reports_both_grids() {
        let a = Mask::new(4, 3);
        assert_eq!(a.ensure_same_shape(&Mask::new(4, 3)), Ok(()));
        assert_eq!(
            a.ensure_same_shape(&Mask::new(3, 4)),
            Err(FrameError::MaskMismatch {
                left: (4, 3),
                right: (3, 4),
            })
        );
    }
}

//! Borrowed view over an interleaved 3-channel color frame.
use super::depth::validate_layout;
use crate::error::FrameError;
use serde::{Deserialize, Serialize};

/// Channel order of the interleaved bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// OpenCV-style camera buffers.
    #[default]
    Bgr,
    Rgb,
}

#[derive(Clone, Copy, Debug)]
pub struct ColorImage<'a> {
    pub w: usize,
    pub h: usize,
    /// Bytes between consecutive rows (>= 3 * w)
    pub stride: usize,
    pub order: ChannelOrder,
    pub data: &'a [u8],
}

impl<'a> ColorImage<'a> {
    /// Tightly packed view.
    pub fn new(w: usize, h: usize, order: ChannelOrder, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w * 3,
            order,
            data,
        }
    }

    /// Pixel at (x, y) as `[r, g, b]` regardless of storage order.
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = y * self.stride + x * 3;
        let px = [self.data[i], self.data[i + 1], self.data[i + 2]];
        match self.order {
            ChannelOrder::Rgb => px,
            ChannelOrder::Bgr => [px[2], px[1], px[0]],
        }
    }

    pub fn validate(&self) -> Result<(), FrameError> {
        validate_layout(self.w, self.h, self.stride, 3, self.data.len())
    }
}

//! Borrowed view over a raw depth buffer as delivered by a sensor driver.
use super::traits::ImageView;
use crate::error::FrameError;

/// Raw depth samples in sensor units. Zero means "no return".
#[derive(Clone, Copy, Debug)]
pub struct DepthImage<'a> {
    pub w: usize,
    pub h: usize,
    /// Samples between consecutive rows
    pub stride: usize,
    pub data: &'a [u16],
}

impl<'a> DepthImage<'a> {
    /// Tightly packed view (`stride == w`).
    pub fn new(w: usize, h: usize, data: &'a [u16]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u16 {
        self.data[y * self.stride + x]
    }

    /// Reject zero-sized, under-strided or truncated buffers.
    pub fn validate(&self) -> Result<(), FrameError> {
        validate_layout(self.w, self.h, self.stride, 1, self.data.len())
    }
}

impl<'a> ImageView for DepthImage<'a> {
    type Pixel = u16;

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
    fn row(&self, y: usize) -> &[u16] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

/// Shared layout check for borrowed frames. `channels` is the number of
/// samples per pixel; `stride` is counted in samples.
pub(crate) fn validate_layout(
    w: usize,
    h: usize,
    stride: usize,
    channels: usize,
    len: usize,
) -> Result<(), FrameError> {
    if w == 0 || h == 0 {
        return Err(FrameError::EmptyFrame {
            width: w,
            height: h,
        });
    }
    let row_len = w * channels;
    if stride < row_len {
        return Err(FrameError::StrideTooSmall {
            stride,
            row_len,
        });
    }
    let expected = stride * (h - 1) + row_len;
    if len < expected {
        return Err(FrameError::BufferTooSmall {
            expected,
            actual: len,
        });
    }
    Ok(())
}

//! Structural input errors.
//!
//! These are the only conditions that abort a frame. Data-quality issues
//! (no valid depth, flat height range) are reported through diagnostics and
//! yield empty masks instead.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    /// Width or height is zero.
    #[error("empty frame: {width}x{height}")]
    EmptyFrame { width: usize, height: usize },

    /// Depth and color frames do not cover the same pixel grid.
    #[error("frame dimensions differ: depth {depth:?}, color {color:?}")]
    DimensionMismatch {
        depth: (usize, usize),
        color: (usize, usize),
    },

    /// The backing buffer is shorter than the declared layout.
    #[error("buffer too small: expected at least {expected} samples, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    /// Row stride is shorter than a row.
    #[error("stride {stride} shorter than row length {row_len}")]
    StrideTooSmall { stride: usize, row_len: usize },

    /// Depth scale must be finite and positive.
    #[error("invalid depth scale: {0}")]
    InvalidDepthScale(f32),

    /// Two masks handed to a mask-combining stage have different shapes.
    #[error("mask dimensions differ: {left:?} vs {right:?}")]
    MaskMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

//! Neighbourhood filters over height grids and binary masks.
//!
//! - [`kernels`]: 1D separable taps (OpenCV-compatible small Gaussians,
//!   sigma-derived Gaussians).
//! - [`convolve`]: separable convolution with explicit border policy, and a
//!   validity-weighted variant that only reads valid samples.
//! - [`median`]: validity-aware median (rank) filter.
//! - [`integral`]: summed-area tables for O(1) masked box means.
//! - [`morphology`]: ellipse/rect structuring elements with erode, dilate,
//!   open and close on [`Mask`](crate::image::Mask).
//!
//! Every filter allocates its output; inputs are never modified in place.

pub mod convolve;
pub mod integral;
pub mod kernels;
pub mod median;
pub mod morphology;

pub use convolve::{convolve_separable, convolve_valid_only, smooth_mask, Border};
pub use integral::{local_mean_valid_only, IntegralImage};
pub use kernels::{Kernel1D, SeparableFilter};
pub use median::median_valid_only;
pub use morphology::{close, dilate, erode, open, ElementShape, StructuringElement};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Run `f(y, row)` over every `w`-wide row of `data`, in parallel when the
/// `parallel` feature is enabled.
pub(crate) fn for_each_row<T, F>(data: &mut [T], w: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if w == 0 {
        return;
    }
    #[cfg(feature = "parallel")]
    {
        data.par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    }
    #[cfg(not(feature = "parallel"))]
    {
        data.chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    }
}

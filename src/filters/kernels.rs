//! One-dimensional filter taps.

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];

    fn radius(&self) -> usize {
        self.taps().len() / 2
    }
}

/// Owned 1D kernel; sizes are configurable per deployment.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel1D {
    taps: Vec<f32>,
}

const GAUSSIAN_1TAP: [f32; 1] = [1.0];
const GAUSSIAN_3TAP: [f32; 3] = [0.25, 0.5, 0.25];
const GAUSSIAN_5TAP: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];
const GAUSSIAN_7TAP: [f32; 7] = [
    0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
];

impl Kernel1D {
    pub fn from_taps(taps: Vec<f32>) -> Self {
        Self { taps }
    }

    /// Gaussian of odd `size` with sigma derived from the size
    /// (`0.3·((size−1)/2 − 1) + 0.8`). Sizes up to 7 use the fixed binomial
    /// taps. Even sizes are bumped to the next odd size.
    pub fn gaussian(size: usize) -> Self {
        let size = odd(size);
        match size {
            1 => Self::from_taps(GAUSSIAN_1TAP.to_vec()),
            3 => Self::from_taps(GAUSSIAN_3TAP.to_vec()),
            5 => Self::from_taps(GAUSSIAN_5TAP.to_vec()),
            7 => Self::from_taps(GAUSSIAN_7TAP.to_vec()),
            _ => {
                let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
                Self::gaussian_with_sigma(size, sigma)
            }
        }
    }

    /// Sampled, normalised Gaussian with an explicit sigma.
    pub fn gaussian_with_sigma(size: usize, sigma: f32) -> Self {
        let size = odd(size);
        let radius = (size / 2) as f32;
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f32> = (0..size)
            .map(|i| {
                let x = i as f32 - radius;
                (-x * x / denom).exp()
            })
            .collect();
        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self { taps }
    }
}

impl SeparableFilter for Kernel1D {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

#[inline]
fn odd(size: usize) -> usize {
    if size == 0 {
        1
    } else {
        size | 1
    }
}

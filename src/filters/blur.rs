//! Gaussian blur parameterised by an odd kernel size.
//!
//! The sigma is derived from the size with the usual rule
//! `sigma = 0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`, so a 3×3 blur uses
//! sigma 0.8. Taps are normalised to unit sum.
use super::separable::OwnedSeparableFilter;
use super::{apply_separable, Border};
use crate::image::ImageF32;

/// Sigma implied by an odd kernel size.
pub fn sigma_for_size(ksize: usize) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalised Gaussian taps for an odd `ksize` (>= 1).
pub fn gaussian_taps(ksize: usize) -> Vec<f32> {
    let ksize = ksize.max(1) | 1;
    if ksize == 1 {
        return vec![1.0];
    }
    let sigma = sigma_for_size(ksize);
    let r = (ksize / 2) as isize;
    let mut taps: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

/// Blur with a `ksize × ksize` Gaussian.
pub fn gaussian_blur(src: &ImageF32, ksize: usize, border: Border) -> ImageF32 {
    let filter = OwnedSeparableFilter::new(gaussian_taps(ksize));
    apply_separable(src, &filter, &filter, border)
}

//! Image gradients from the 5-tap Sobel operator.
//!
//! - Separable: derivative taps along the differentiated axis, binomial
//!   smoothing across it.
//! - Border samples replicate the nearest edge pixel.
//! - Outputs per-pixel `gx`, `gy` and `mag = sqrt(gx^2+gy^2)`.
//!
//! `gx` is positive where intensity increases to the right, `gy` where it
//! increases downwards (row index grows).
use super::separable::{SOBEL5_DERIV, SOBEL5_SMOOTH};
use super::{apply_separable, Border};
use crate::image::ImageF32;

/// Per-pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel: `sqrt(gx^2 + gy^2)`
    pub mag: ImageF32,
}

/// Compute 5×5 Sobel gradients on a single-channel float image.
pub fn sobel5_gradients(l: &ImageF32) -> Grad {
    let gx = apply_separable(l, &SOBEL5_DERIV, &SOBEL5_SMOOTH, Border::Replicate);
    let gy = apply_separable(l, &SOBEL5_SMOOTH, &SOBEL5_DERIV, Border::Replicate);
    let mag = magnitude(&gx, &gy);
    Grad { gx, gy, mag }
}

/// Per-pixel Euclidean norm of two equally sized components.
pub fn magnitude(a: &ImageF32, b: &ImageF32) -> ImageF32 {
    debug_assert_eq!((a.w, a.h), (b.w, b.h));
    let mut out = ImageF32::new(a.w, a.h);
    for ((dst, &x), &y) in out.data.iter_mut().zip(&a.data).zip(&b.data) {
        *dst = (x * x + y * y).sqrt();
    }
    out
}

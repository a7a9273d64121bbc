//! Flow-guided difference of Gaussians.
//!
//! One pass runs `Seeded → GradientDog → FlowDog → Thresholded`; each arrow is
//! a full barrier because the next stage reads neighbouring pixels of the
//! previous one. The outer loop re-seeds the working image from the mask
//! (pixels under a 0 mask are zeroed, then a 3×3 blur) and repeats a fixed
//! number of times.

pub mod flow_dog;
pub mod gradient_dog;
pub mod threshold;

pub use flow_dog::{flow_dog, FlowDogResponse};
pub use gradient_dog::{gradient_dog, GradientDogKernels};
pub use threshold::binary_threshold;

use crate::error::CldError;
use crate::etf::FlowField;
use crate::filters::{gaussian_blur, Border};
use crate::image::ImageF32;
use crate::options::CldOptions;
use crate::parallel::ParallelOptions;
use crate::types::{EdgeMask, MASK_OFF};
use log::{debug, warn};

/// Kernel size of the blur applied when re-seeding.
pub const RESEED_BLUR_SIZE: usize = 3;

/// Stages of a single FDoG pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FdogStage {
    Seeded,
    GradientDog,
    FlowDog,
    Thresholded,
}

/// Intermediate buffers and the mask from one pass.
#[derive(Clone, Debug)]
pub struct FdogPass {
    pub gradient_dog: ImageF32,
    pub flow_dog: FlowDogResponse,
    pub mask: EdgeMask,
}

/// Run one pass over `src` guided by `field`.
pub fn run_pass(
    src: &ImageF32,
    field: &FlowField,
    options: &CldOptions,
    parallel: ParallelOptions,
) -> Result<FdogPass, CldError> {
    options.validate()?;
    if src.w == 0 || src.h == 0 {
        return Err(CldError::EmptyImage {
            width: src.w,
            height: src.h,
        });
    }
    if (field.width(), field.height()) != (src.w, src.h) {
        return Err(CldError::SizeMismatch {
            expected: src.w * src.h,
            actual: field.width() * field.height(),
        });
    }
    debug!("FDoG: {:?}", FdogStage::Seeded);

    let kernels = GradientDogKernels::new(options.sigma_c, options.sigma_r, options.rho);
    let dog = gradient_dog(src, field, &kernels, parallel);
    debug!(
        "FDoG: {:?} (half-width {})",
        FdogStage::GradientDog,
        kernels.half_width()
    );

    let response = flow_dog(&dog, field, options.sigma_m, parallel);
    debug!("FDoG: {:?} (sigma_m {})", FdogStage::FlowDog, options.sigma_m);

    let mask = if response.degenerate {
        warn!("FDoG: flat flow-DoG response, no edge structure");
        EdgeMask::new(src.w, src.h)
    } else {
        binary_threshold(&response.normalized, options.tau, parallel)
    };
    debug!(
        "FDoG: {:?} (tau {}, {} off pixels)",
        FdogStage::Thresholded,
        options.tau,
        mask.off_pixels()
    );

    Ok(FdogPass {
        gradient_dog: dog,
        flow_dog: response,
        mask,
    })
}

/// Zero the working image wherever the mask is off, then blur it.
pub fn reseed(src: &ImageF32, mask: &EdgeMask) -> Result<ImageF32, CldError> {
    if (mask.w, mask.h) != (src.w, src.h) {
        return Err(CldError::SizeMismatch {
            expected: src.w * src.h,
            actual: mask.w * mask.h,
        });
    }
    let mut seeded = src.clone();
    for (v, &m) in seeded.data.iter_mut().zip(&mask.data) {
        if m == MASK_OFF {
            *v = 0.0;
        }
    }
    Ok(gaussian_blur(&seeded, RESEED_BLUR_SIZE, Border::Replicate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MASK_ON;

    #[test]
    fn reseed_zeroes_masked_pixels_before_blur() {
        let src = ImageF32::filled(5, 5, 1.0);
        let mut mask = EdgeMask::new(5, 5);
        mask.data.iter_mut().for_each(|m| *m = MASK_ON);
        let untouched = reseed(&src, &mask).unwrap();
        assert!(untouched.data.iter().all(|&v| (v - 1.0).abs() < 1e-6));

        mask.data[12] = MASK_OFF;
        let out = reseed(&src, &mask).unwrap();
        assert!(out.get(2, 2) < 0.8, "centre={}", out.get(2, 2));
        assert!(out.get(1, 2) < 0.95, "neighbour={}", out.get(1, 2));
        assert!((out.get(0, 0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_field_is_rejected() {
        let src = ImageF32::new(4, 4);
        let err = run_pass(
            &src,
            &FlowField::zeros(4, 3),
            &CldOptions::default(),
            ParallelOptions::disabled(),
        )
        .unwrap_err();
        assert!(matches!(err, CldError::SizeMismatch { .. }));
    }

    #[test]
    fn oversized_sigma_fails_before_building_kernels() {
        let src = ImageF32::new(4, 4);
        let options = CldOptions::default().with_sigmas(1.0, 2.6, 1e10);
        let err = run_pass(&src, &FlowField::zeros(4, 4), &options, ParallelOptions::disabled())
            .unwrap_err();
        assert!(matches!(err, CldError::InvalidOption { name: "sigma_m", .. }));
    }
}

use crate::error::CldError;
use crate::filters::{gaussian_blur, normalize_min_max, Border};
use crate::image::{GrayImageU8, ImageF32};
use crate::types::EdgeMask;

/// Stretch the mask to [0,255] and soften it with a `blur_size` Gaussian.
///
/// A mask with a single value has no range to stretch and comes back
/// all-zero before blurring, matching min-max normalization elsewhere.
pub fn anti_alias(mask: &EdgeMask, blur_size: usize) -> Result<GrayImageU8, CldError> {
    if blur_size == 0 || blur_size % 2 == 0 {
        return Err(CldError::invalid(
            "blur_size",
            format!("must be odd and positive, got {blur_size}"),
        ));
    }
    let data = mask.data.iter().map(|&v| v as f32).collect();
    let src = ImageF32::from_raw(mask.w, mask.h, data)?;
    let stretched = normalize_min_max(&src, 0.0, 1.0).image;
    let blurred = gaussian_blur(&stretched, blur_size, Border::Replicate);
    Ok(GrayImageU8::from_f32(&blurred))
}

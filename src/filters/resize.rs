//! Nearest-neighbour resampling, used to upscale the preview noise texture.
use crate::image::{ImageF32, ImageViewMut};

/// Nearest-neighbour resize of `src` to `w × h`.
pub fn resize_nearest(src: &ImageF32, w: usize, h: usize) -> ImageF32 {
    let mut out = ImageF32::new(w, h);
    if src.w == 0 || src.h == 0 || w == 0 || h == 0 {
        return out;
    }
    for y in 0..h {
        let syi = ((y * src.h) / h).min(src.h - 1);
        let row = out.row_mut(y);
        for (x, dst) in row.iter_mut().enumerate() {
            let sxi = ((x * src.w) / w).min(src.w - 1);
            *dst = src.get(sxi, syi);
        }
    }
    out
}

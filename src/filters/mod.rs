//! Dense-image primitives used around the two engines.
//!
//! - `grad`: 5-tap Sobel derivatives and gradient magnitude.
//! - `separable`: separable filter trait, 1-D correlation with a border policy.
//! - `blur`: Gaussian blur parameterised by kernel size.
//! - `normalize`: min-max normalization that reports flat inputs.
//! - `resize`: nearest-neighbour resampling.
//!
//! None of these carry algorithmic state; they mirror the matrix operations an
//! external vision library would provide.

pub mod blur;
pub mod grad;
pub mod normalize;
pub mod resize;
pub mod separable;

pub use blur::{gaussian_blur, gaussian_taps};
pub use grad::{sobel5_gradients, Grad};
pub use normalize::{normalize_min_max, Normalized};
pub use resize::resize_nearest;
pub use separable::{Border, SeparableFilter};

use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Apply `horizontal` along rows then `vertical` along columns.
pub fn apply_separable(
    src: &ImageF32,
    horizontal: &dyn SeparableFilter,
    vertical: &dyn SeparableFilter,
    border: Border,
) -> ImageF32 {
    let (w, h) = (src.w, src.h);
    let mut tmp = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return tmp;
    }
    for y in 0..h {
        separable::correlate_line(src.row(y), horizontal.taps(), border, tmp.row_mut(y));
    }

    let mut out = ImageF32::new(w, h);
    let mut column = vec![0.0f32; h];
    let mut filtered = vec![0.0f32; h];
    for x in 0..w {
        for (y, c) in column.iter_mut().enumerate() {
            *c = tmp.get(x, y);
        }
        separable::correlate_line(&column, vertical.taps(), border, &mut filtered);
        for (y, &v) in filtered.iter().enumerate() {
            out.set(x, y, v);
        }
    }
    out
}

//! Difference of Gaussians sampled across the flow.
//!
//! At each pixel the luminance is sampled along the line perpendicular to the
//! local tangent at integer offsets `-k..=k` (nearest pixel), where `k` is the
//! half-width of the wider of the centre (`sigma_c`) and surround
//! (`sigma_r · sigma_c`) kernels. Samples whose position falls outside the
//! image are dropped from both the sums and the weight totals.
use crate::etf::field::across;
use crate::etf::FlowField;
use crate::image::ImageF32;
use crate::kernel::GaussianKernel;
use crate::parallel::{fill_rows, ParallelOptions};

/// Kernels and blend weight of the cross-flow DoG.
#[derive(Clone, Debug)]
pub struct GradientDogKernels {
    pub center: GaussianKernel,
    pub surround: GaussianKernel,
    pub rho: f32,
}

impl GradientDogKernels {
    pub fn new(sigma_c: f32, sigma_r: f32, rho: f32) -> Self {
        Self {
            center: GaussianKernel::build(sigma_c),
            surround: GaussianKernel::build(sigma_r * sigma_c),
            rho,
        }
    }

    /// Sampling half-width along the cross-flow line.
    pub fn half_width(&self) -> usize {
        self.center.half_width().max(self.surround.half_width())
    }
}

/// `center_mean - rho · surround_mean` at `(x, y)`.
pub fn gradient_dog_at(
    src: &ImageF32,
    field: &FlowField,
    kernels: &GradientDogKernels,
    x: usize,
    y: usize,
) -> f32 {
    let n = across(&field.get(x, y));
    let max_x = (src.w - 1) as f32;
    let max_y = (src.h - 1) as f32;
    let k = kernels.half_width() as isize;

    let (mut center_acc, mut center_w) = (0.0f32, 0.0f32);
    let (mut surround_acc, mut surround_w) = (0.0f32, 0.0f32);
    for step in -k..=k {
        let col = x as f32 + n.x * step as f32;
        let row = y as f32 + n.y * step as f32;
        if col < 0.0 || col > max_x || row < 0.0 || row > max_y {
            continue;
        }
        let value = src.get(col.round() as usize, row.round() as usize);
        let offset = step.unsigned_abs();
        let wc = kernels.center.weight(offset);
        let ws = kernels.surround.weight(offset);
        center_acc += value * wc;
        surround_acc += value * ws;
        center_w += wc;
        surround_w += ws;
    }

    let own = src.get(x, y);
    let center = if center_w > 0.0 {
        center_acc / center_w
    } else {
        own
    };
    let surround = if surround_w > 0.0 {
        surround_acc / surround_w
    } else {
        own
    };
    center - kernels.rho * surround
}

/// Full-image cross-flow DoG response.
pub fn gradient_dog(
    src: &ImageF32,
    field: &FlowField,
    kernels: &GradientDogKernels,
    parallel: ParallelOptions,
) -> ImageF32 {
    let mut out = ImageF32::new(src.w, src.h);
    fill_rows(&mut out.data, src.w, parallel, |y, row| {
        for (x, dst) in row.iter_mut().enumerate() {
            *dst = gradient_dog_at(src, field, kernels, x, y);
        }
    });
    out
}

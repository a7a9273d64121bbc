//! Integration of the cross-flow response along the flow.
//!
//! From each pixel two walks of `k` steps (the half-width of the `sigma_m`
//! kernel) follow the field forwards and backwards. Each step samples the
//! gradient-DoG at the current rounded position with weight `g[step]` and then
//! advances by the local tangent, so the path bends with the field. The local
//! tangent is sign-aligned with the previous step so a walk never doubles back
//! on an anti-parallel neighbour. A walk stops at a zero vector or when it
//! leaves the image.
//!
//! Both walks visit the start pixel, so the sum is seeded with `-g[0]·dog(p)`
//! to count it once. The mean `m = sum / weight` maps to `1` when positive and
//! to `1 + tanh(m)` otherwise; the whole image is then min-max normalized to
//! [0,1] once every pixel is known.
use crate::etf::FlowField;
use crate::filters::normalize_min_max;
use crate::image::{ImageF32, ImageView};
use crate::kernel::GaussianKernel;
use crate::parallel::{fill_rows, ParallelOptions};
use crate::types::FlowVector;

/// Output of the flow-DoG stage.
#[derive(Clone, Debug)]
pub struct FlowDogResponse {
    /// Per-pixel response in (0, 1], before normalization.
    pub raw: ImageF32,
    /// `raw` min-max normalized to [0,1].
    pub normalized: ImageF32,
    /// True when `raw` was constant; `normalized` is then all zero.
    pub degenerate: bool,
}

/// Map the weighted mean onto the smooth step used before normalization.
#[inline]
pub fn edge_response(mean: f32) -> f32 {
    if mean > 0.0 {
        1.0
    } else {
        1.0 + mean.tanh()
    }
}

fn walk(
    dog: &ImageF32,
    field: &FlowField,
    kernel: &GaussianKernel,
    x: usize,
    y: usize,
    sign: f32,
) -> (f32, f32) {
    let (mut sum, mut weight) = (0.0f32, 0.0f32);
    let mut pos = FlowVector::new(x as f32, y as f32);
    let mut prev: Option<FlowVector> = None;
    for step in 0..kernel.half_width() {
        let (ix, iy) = (pos.x.round() as isize, pos.y.round() as isize);
        if !dog.contains(ix, iy) {
            break;
        }
        let (ix, iy) = (ix as usize, iy as usize);
        let mut dir = field.get(ix, iy) * sign;
        if dir.x == 0.0 && dir.y == 0.0 {
            break;
        }
        if let Some(p) = prev {
            if dir.dot(&p) < 0.0 {
                dir = -dir;
            }
        }
        let w = kernel.weight(step);
        sum += dog.get(ix, iy) * w;
        weight += w;
        pos += dir;
        prev = Some(dir);
    }
    (sum, weight)
}

/// Un-normalized flow-DoG response at `(x, y)`.
pub fn flow_dog_at(
    dog: &ImageF32,
    field: &FlowField,
    kernel: &GaussianKernel,
    x: usize,
    y: usize,
) -> f32 {
    let g0 = kernel.weight(0);
    let own = dog.get(x, y);
    let (fwd_sum, fwd_weight) = walk(dog, field, kernel, x, y, 1.0);
    let (back_sum, back_weight) = walk(dog, field, kernel, x, y, -1.0);
    let sum = -g0 * own + fwd_sum + back_sum;
    let weight = -g0 + fwd_weight + back_weight;
    let mean = if weight != 0.0 { sum / weight } else { own };
    edge_response(mean)
}

/// Full-image flow-DoG followed by the global normalization.
pub fn flow_dog(
    dog: &ImageF32,
    field: &FlowField,
    sigma_m: f32,
    parallel: ParallelOptions,
) -> FlowDogResponse {
    let kernel = GaussianKernel::build(sigma_m);
    let mut raw = ImageF32::new(dog.w, dog.h);
    fill_rows(&mut raw.data, dog.w, parallel, |y, row| {
        for (x, dst) in row.iter_mut().enumerate() {
            *dst = flow_dog_at(dog, field, &kernel, x, y);
        }
    });
    let normalized = normalize_min_max(&raw, 0.0, 1.0);
    FlowDogResponse {
        raw,
        normalized: normalized.image,
        degenerate: normalized.degenerate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_mapping() {
        assert_eq!(edge_response(0.3), 1.0);
        assert_eq!(edge_response(0.0), 1.0);
        assert!((edge_response(-0.5) - (1.0 + (-0.5f32).tanh())).abs() < 1e-7);
        assert!(edge_response(-50.0) >= 0.0);
    }

    #[test]
    fn zero_field_returns_own_value() {
        let dog = ImageF32::from_raw(3, 1, vec![-0.2, -0.4, 0.1]).unwrap();
        let field = FlowField::zeros(3, 1);
        let kernel = GaussianKernel::build(3.0);
        let v = flow_dog_at(&dog, &field, &kernel, 1, 0);
        assert!((v - (1.0 + (-0.4f32).tanh())).abs() < 1e-6);
    }

    #[test]
    fn walk_follows_uniform_column() {
        // A column of identical negative responses along a vertical field
        // averages to the same value regardless of how far the walk runs.
        let (w, h) = (5, 30);
        let mut dog = ImageF32::filled(w, h, 0.0);
        for y in 0..h {
            dog.set(2, y, -0.3);
        }
        let field =
            FlowField::from_vectors(w, h, vec![FlowVector::new(0.0, 1.0); w * h]).unwrap();
        let kernel = GaussianKernel::build(3.0);
        let v = flow_dog_at(&dog, &field, &kernel, 2, 15);
        assert!((v - (1.0 + (-0.3f32).tanh())).abs() < 1e-5, "v={v}");
        assert_eq!(flow_dog_at(&dog, &field, &kernel, 0, 15), 1.0);
    }

    #[test]
    fn anti_parallel_cells_do_not_reverse_the_walk() {
        // Alternating signs along the column would bounce a naive walk between
        // two rows; the sign-aligned walk keeps moving.
        let (w, h) = (3, 40);
        let vectors = (0..w * h)
            .map(|i| {
                if (i / w) % 2 == 0 {
                    FlowVector::new(0.0, 1.0)
                } else {
                    FlowVector::new(0.0, -1.0)
                }
            })
            .collect();
        let field = FlowField::from_vectors(w, h, vectors).unwrap();
        let mut dog = ImageF32::new(w, h);
        for y in 0..h {
            dog.set(1, y, if y > 25 { -1.0 } else { 0.0 });
        }
        let kernel = GaussianKernel::build(3.0);
        // Starting at row 20, only a walk that keeps going reaches rows > 25.
        assert!(flow_dog_at(&dog, &field, &kernel, 1, 20) < 1.0);
    }

    #[test]
    fn constant_response_is_degenerate() {
        let dog = ImageF32::filled(4, 4, 0.01);
        let out = flow_dog(&dog, &FlowField::zeros(4, 4), 3.0, ParallelOptions::disabled());
        assert!(out.degenerate);
        assert!(out.normalized.data.iter().all(|&v| v == 0.0));
        assert!(out.raw.data.iter().all(|&v| v == 1.0));
    }

    fn swirl(w: usize, h: usize) -> (ImageF32, FlowField) {
        let mut src = ImageF32::new(w, h);
        let mut vectors = Vec::with_capacity(w * h);
        let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
        for y in 0..h {
            for x in 0..w {
                let (dx, dy) = (x as f32 - cx, y as f32 - cy);
                src.set(x, y, ((x * 31 + y * 17) % 13) as f32 / 12.0 - 0.6);
                vectors.push(if (x + 2 * y) % 7 == 0 {
                    FlowVector::zeros()
                } else {
                    FlowVector::new(-dy + 0.5, dx + 0.25)
                });
            }
        }
        (src, FlowField::from_vectors(w, h, vectors).unwrap())
    }

    #[test]
    fn pixel_order_does_not_matter() {
        let (dog, field) = swirl(27, 19);
        let response = flow_dog(&dog, &field, 3.0, ParallelOptions::disabled());

        let kernel = GaussianKernel::build(3.0);
        let mut reversed = ImageF32::new(dog.w, dog.h);
        for i in (0..dog.w * dog.h).rev() {
            reversed.data[i] = flow_dog_at(&dog, &field, &kernel, i % dog.w, i / dog.w);
        }
        assert_eq!(response.raw, reversed);

        let parallel = flow_dog(&dog, &field, 3.0, ParallelOptions::new(true, 1));
        assert_eq!(response.raw, parallel.raw);
        assert_eq!(response.normalized, parallel.normalized);
    }
}

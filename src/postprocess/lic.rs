//! Line integral convolution preview of a flow field.
//!
//! A half-resolution uniform noise texture is upscaled with nearest
//! neighbour sampling (so every noise cell covers a 2×2 block) and then
//! averaged along the flow: from each pixel the walker takes `steps` unit
//! L1 steps forward and `steps` backward, wrapping around the image edges,
//! and accumulates `exp(-k²/σ) / (πσ)` weighted noise with `σ = 2·steps²`.
//! Pixels with a zero flow vector stay put and simply average their own cell.
use crate::etf::FlowField;
use crate::filters::resize_nearest;
use crate::image::ImageF32;
use crate::parallel::{fill_rows, ParallelOptions};
use crate::types::FlowVector;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicParams {
    /// Steps taken in each direction.
    pub steps: usize,
    /// Seed of the noise texture.
    pub seed: u64,
}

impl Default for LicParams {
    fn default() -> Self {
        Self {
            steps: 10,
            seed: 0x5eed_f10e,
        }
    }
}

/// SplitMix64; enough for a preview texture and fully reproducible.
struct NoiseSource(u64);

impl NoiseSource {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in [0,1).
    fn next_unit(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

fn noise_texture(w: usize, h: usize, seed: u64) -> ImageF32 {
    let (nw, nh) = ((w / 2).max(1), (h / 2).max(1));
    let mut rng = NoiseSource(seed);
    let mut small = ImageF32::new(nw, nh);
    for v in small.data.iter_mut() {
        *v = rng.next_unit();
    }
    resize_nearest(&small, w, h)
}

fn wrap(v: f32, n: usize) -> usize {
    (v.floor() as i64).rem_euclid(n as i64) as usize
}

fn l1_step(v: &FlowVector) -> FlowVector {
    let l1 = v.x.abs() + v.y.abs();
    if l1 > 0.0 {
        v / l1
    } else {
        FlowVector::zeros()
    }
}

fn advect(field: &FlowField, noise: &ImageF32, x0: usize, y0: usize, steps: usize, sign: f32) -> (f32, f32) {
    let (w, h) = (field.width(), field.height());
    let sigma = 2.0 * (steps * steps) as f32;
    let (mut x, mut y) = (x0 as f32, y0 as f32);
    let mut sum = 0.0;
    let mut weight = 0.0;
    for k in 0..steps {
        let v = field.get(wrap(x, w), wrap(y, h)) * sign;
        let step = l1_step(&v);
        x += step.x;
        y += step.y;
        let g = (-((k * k) as f32) / sigma).exp() / (PI * sigma);
        sum += g * noise.get(wrap(x, w), wrap(y, h));
        weight += g;
    }
    (sum, weight)
}

/// Render `field` as a grayscale image in [0,1].
pub fn visualize_flow(field: &FlowField, params: &LicParams, parallel: ParallelOptions) -> ImageF32 {
    let (w, h) = (field.width(), field.height());
    let mut out = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    let noise = noise_texture(w, h, params.seed);
    if params.steps == 0 {
        return noise;
    }
    fill_rows(&mut out.data, w, parallel, |y, row| {
        for (x, px) in row.iter_mut().enumerate() {
            let (fs, fw) = advect(field, &noise, x, y, params.steps, 1.0);
            let (bs, bw) = advect(field, &noise, x, y, params.steps, -1.0);
            *px = (fs + bs) / (fw + bw);
        }
    });
    out
}

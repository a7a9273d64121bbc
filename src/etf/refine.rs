//! One refinement pass of the edge tangent flow.
//!
//! For pixel `p` the new tangent is
//!
//! ```text
//! t'(p) = Σ_q φ(p,q) · t(q) · ws(p,q) · wm(p,q) · wd(p,q)
//! ```
//!
//! over the square window of half-width `radius` (neighbours outside the image
//! are skipped), with
//!
//! - `wd = |t(p)·t(q)|`, `φ = sign(t(p)·t(q))` (`-1` when the dot is not positive);
//! - `ws = 1` when `|p - q| < radius`, else `0`;
//! - `wm = (1 + tanh(ĝ(p) - ĝ(q))) / 2` on the normalized gradient
//!   magnitude `ĝ`; it exceeds 1/2 when `p` is stronger than `q`.
//!
//! The pass reads only the previous field and writes each result to its own
//! cell of a fresh buffer, then normalizes it.
use super::field::{unit_or_zero, FlowField};
use crate::image::ImageF32;
use crate::parallel::{fill_rows, ParallelOptions};
use crate::types::FlowVector;

#[inline]
pub fn direction_weight(tp: &FlowVector, tq: &FlowVector) -> f32 {
    tp.dot(tq).abs()
}

#[inline]
pub fn phi(tp: &FlowVector, tq: &FlowVector) -> f32 {
    if tp.dot(tq) > 0.0 {
        1.0
    } else {
        -1.0
    }
}

#[inline]
pub fn spatial_weight(dx: isize, dy: isize, radius: usize) -> f32 {
    let dist = ((dx * dx + dy * dy) as f32).sqrt();
    if dist < radius as f32 {
        1.0
    } else {
        0.0
    }
}

#[inline]
pub fn magnitude_weight(mag_p: f32, mag_q: f32) -> f32 {
    (1.0 + (mag_p - mag_q).tanh()) * 0.5
}

/// Refined, normalized tangent at `(x, y)` computed from the snapshot `field`.
pub fn refined_vector(
    field: &FlowField,
    magnitude: &ImageF32,
    x: usize,
    y: usize,
    radius: usize,
) -> FlowVector {
    let (w, h) = (field.width() as isize, field.height() as isize);
    let tp = field.get(x, y);
    let mag_p = magnitude.get(x, y);
    let r = radius as isize;
    let (xi, yi) = (x as isize, y as isize);

    let mut acc = FlowVector::zeros();
    for qy in (yi - r)..=(yi + r) {
        if qy < 0 || qy >= h {
            continue;
        }
        for qx in (xi - r)..=(xi + r) {
            if qx < 0 || qx >= w {
                continue;
            }
            let ws = spatial_weight(qx - xi, qy - yi, radius);
            if ws == 0.0 {
                continue;
            }
            let tq = field.get(qx as usize, qy as usize);
            let wd = direction_weight(&tp, &tq);
            if wd == 0.0 {
                continue;
            }
            let wm = magnitude_weight(mag_p, magnitude.get(qx as usize, qy as usize));
            acc += tq * (phi(&tp, &tq) * ws * wm * wd);
        }
    }
    unit_or_zero(acc)
}

/// Run one full pass and return the new field. `field` is left untouched.
pub fn refine_pass(
    field: &FlowField,
    magnitude: &ImageF32,
    radius: usize,
    parallel: ParallelOptions,
) -> FlowField {
    let (w, h) = (field.width(), field.height());
    let mut next = vec![FlowVector::zeros(); w * h];
    fill_rows(&mut next, w, parallel, |y, row| {
        for (x, dst) in row.iter_mut().enumerate() {
            *dst = refined_vector(field, magnitude, x, y, radius);
        }
    });
    FlowField::from_normalized(w, h, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal_noise_field(w: usize, h: usize) -> (FlowField, ImageF32) {
        let mut vectors = Vec::with_capacity(w * h);
        let mut mag = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let a = ((x * 7 + y * 13) % 17) as f32 * 0.37;
                let flip = if (x + y) % 3 == 0 { -1.0 } else { 1.0 };
                vectors.push(FlowVector::new(a.cos() * flip, a.sin() * flip));
                mag.set(x, y, ((x * 5 + y * 3) % 11) as f32 / 10.0);
            }
        }
        (FlowField::from_vectors(w, h, vectors).unwrap(), mag)
    }

    #[test]
    fn weights_match_definitions() {
        let a = FlowVector::new(1.0, 0.0);
        let b = FlowVector::new(-0.6, 0.8);
        assert!((direction_weight(&a, &b) - 0.6).abs() < 1e-6);
        assert_eq!(phi(&a, &b), -1.0);
        assert_eq!(phi(&a, &a), 1.0);
        assert_eq!(phi(&a, &FlowVector::zeros()), -1.0);
        assert_eq!(spatial_weight(2, 2, 3), 1.0);
        assert_eq!(spatial_weight(3, 0, 3), 0.0);
        assert!((magnitude_weight(0.2, 0.2) - 0.5).abs() < 1e-7);
        assert!((magnitude_weight(0.9, 0.1) - 0.832_018_4).abs() < 1e-6);
        assert!((magnitude_weight(0.1, 0.9) - 0.167_981_6).abs() < 1e-6);
    }

    #[test]
    fn magnitude_weight_is_taken_from_centre_minus_neighbour() {
        // Centre (1,0) at magnitude 0.5 between a weak neighbour tilted up and
        // a strong neighbour tilted down by the same angle.
        let vectors = vec![
            FlowVector::new(0.6, 0.8),
            FlowVector::new(1.0, 0.0),
            FlowVector::new(0.6, -0.8),
        ];
        let field = FlowField::from_vectors(3, 1, vectors).unwrap();
        let mag = ImageF32::from_raw(3, 1, vec![0.1, 0.5, 0.9]).unwrap();
        let t = refined_vector(&field, &mag, 1, 0, 2);
        assert!(t.y > 0.05, "centre leaned towards the strong neighbour: {t:?}");
        assert!((t.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn pass_output_is_normalized() {
        let (field, mag) = diagonal_noise_field(19, 13);
        let next = refine_pass(&field, &mag, 3, ParallelOptions::disabled());
        assert!(next.is_normalized(1e-5));
    }

    #[test]
    fn pixel_order_does_not_matter() {
        let (field, mag) = diagonal_noise_field(23, 17);
        let pass = refine_pass(&field, &mag, 3, ParallelOptions::disabled());

        // Recompute every pixel in reverse order from the same snapshot.
        let (w, h) = (field.width(), field.height());
        let mut reversed = vec![FlowVector::zeros(); w * h];
        for i in (0..w * h).rev() {
            reversed[i] = refined_vector(&field, &mag, i % w, i / w, 3);
        }
        assert_eq!(pass.vectors(), reversed.as_slice());

        let parallel = refine_pass(&field, &mag, 3, ParallelOptions::new(true, 1));
        assert_eq!(pass, parallel);
    }

    #[test]
    fn anti_parallel_neighbours_reinforce() {
        let w = 5;
        let vectors: Vec<FlowVector> = (0..w * w)
            .map(|i| {
                if i % 2 == 0 {
                    FlowVector::new(0.0, 1.0)
                } else {
                    FlowVector::new(0.0, -1.0)
                }
            })
            .collect();
        let field = FlowField::from_vectors(w, w, vectors).unwrap();
        let mag = ImageF32::filled(w, w, 0.5);
        let next = refine_pass(&field, &mag, 2, ParallelOptions::disabled());
        for y in 0..w {
            for x in 0..w {
                let before = field.get(x, y);
                let after = next.get(x, y);
                assert!(
                    (after - before).norm() < 1e-6,
                    "({x},{y}) before={before:?} after={after:?}"
                );
            }
        }
    }

    #[test]
    fn zero_vectors_stay_zero() {
        let field = FlowField::zeros(6, 4);
        let mag = ImageF32::new(6, 4);
        let next = refine_pass(&field, &mag, 3, ParallelOptions::disabled());
        assert!(next.vectors().iter().all(|v| *v == FlowVector::zeros()));
    }
}

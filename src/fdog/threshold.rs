use crate::image::ImageF32;
use crate::parallel::{fill_rows, ParallelOptions};
use crate::types::{EdgeMask, MASK_OFF, MASK_ON};

/// `255` where `response >= tau`, `0` elsewhere.
pub fn binary_threshold(response: &ImageF32, tau: f32, parallel: ParallelOptions) -> EdgeMask {
    let mut mask = EdgeMask::new(response.w, response.h);
    fill_rows(&mut mask.data, response.w, parallel, |y, row| {
        let src = &response.data[y * response.w..(y + 1) * response.w];
        for (dst, &v) in row.iter_mut().zip(src) {
            *dst = if v >= tau { MASK_ON } else { MASK_OFF };
        }
    });
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        let img = ImageF32::from_raw(3, 1, vec![0.49, 0.5, 0.51]).unwrap();
        let mask = binary_threshold(&img, 0.5, ParallelOptions::disabled());
        assert_eq!(mask.data, vec![0, 255, 255]);
    }

    #[test]
    fn raising_tau_only_turns_pixels_off() {
        let values: Vec<f32> = (0..64).map(|i| ((i * 37) % 64) as f32 / 63.0).collect();
        let img = ImageF32::from_raw(8, 8, values).unwrap();
        let mut prev = binary_threshold(&img, 0.0, ParallelOptions::disabled());
        for step in 1..=20 {
            let tau = step as f32 / 20.0;
            let next = binary_threshold(&img, tau, ParallelOptions::disabled());
            for (a, b) in prev.data.iter().zip(&next.data) {
                assert!(!(*a == MASK_OFF && *b == MASK_ON), "tau={tau}");
            }
            prev = next;
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let values: Vec<f32> = (0..30 * 20).map(|i| ((i * 53) % 97) as f32 / 96.0).collect();
        let img = ImageF32::from_raw(30, 20, values).unwrap();
        let seq = binary_threshold(&img, 0.6, ParallelOptions::disabled());
        let par = binary_threshold(&img, 0.6, ParallelOptions::new(true, 1));
        assert_eq!(seq, par);
    }
}

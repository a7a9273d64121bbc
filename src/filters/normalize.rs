use crate::image::ImageF32;

/// Result of a min-max normalization.
#[derive(Clone, Debug)]
pub struct Normalized {
    pub image: ImageF32,
    /// True when the input had no spread (`max - min` at or below epsilon);
    /// every output pixel is then `lo`.
    pub degenerate: bool,
}

/// Affinely map the input range onto `[lo, hi]`.
///
/// Non-finite samples are treated as `lo`.
pub fn normalize_min_max(src: &ImageF32, lo: f32, hi: f32) -> Normalized {
    let mut image = src.clone();
    let finite = src.data.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f32::INFINITY, f32::NEG_INFINITY), |(a, b), v| {
        (a.min(v), b.max(v))
    });
    let spread = max - min;
    if !spread.is_finite() || spread <= f32::EPSILON {
        image.data.iter_mut().for_each(|v| *v = lo);
        return Normalized {
            image,
            degenerate: true,
        };
    }
    let scale = (hi - lo) / spread;
    for v in &mut image.data {
        *v = if v.is_finite() {
            lo + (*v - min) * scale
        } else {
            lo
        };
    }
    Normalized {
        image,
        degenerate: false,
    }
}

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The filter is applied as a
    /// correlation centred on the middle tap; an odd tap count is assumed.
    fn taps(&self) -> &[f32];

    fn radius(&self) -> usize {
        self.taps().len() / 2
    }
}

/// Simple wrapper around a static filter kernel.
#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [f32],
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        self.taps
    }
}

/// Filter with taps computed at runtime (e.g. a Gaussian of given size).
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedSeparableFilter {
    taps: Vec<f32>,
}

impl OwnedSeparableFilter {
    pub fn new(taps: Vec<f32>) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for OwnedSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// 5-tap binomial smoothing `[1, 4, 6, 4, 1]` (unnormalised, Sobel aperture 5).
pub const SOBEL5_SMOOTH: StaticSeparableFilter =
    StaticSeparableFilter::new(&[1.0, 4.0, 6.0, 4.0, 1.0]);

/// 5-tap central derivative `[-1, -2, 0, 2, 1]` (Sobel aperture 5).
pub const SOBEL5_DERIV: StaticSeparableFilter =
    StaticSeparableFilter::new(&[-1.0, -2.0, 0.0, 2.0, 1.0]);

/// How samples outside the image are synthesised during filtering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Border {
    /// Repeat the nearest edge pixel.
    Replicate,
    /// Treat outside pixels as a fixed value.
    Constant(f32),
}

#[inline]
fn sample(line: &[f32], i: isize, border: Border) -> f32 {
    let n = line.len() as isize;
    if i >= 0 && i < n {
        return line[i as usize];
    }
    match border {
        Border::Replicate => line[i.clamp(0, n - 1) as usize],
        Border::Constant(c) => c,
    }
}

/// Correlate one line with `taps`, writing into `out`.
pub fn correlate_line(line: &[f32], taps: &[f32], border: Border, out: &mut [f32]) {
    debug_assert_eq!(line.len(), out.len());
    let r = (taps.len() / 2) as isize;
    for (i, dst) in out.iter_mut().enumerate() {
        let base = i as isize - r;
        let mut acc = 0.0f32;
        for (k, &t) in taps.iter().enumerate() {
            acc += t * sample(line, base + k as isize, border);
        }
        *dst = acc;
    }
}

//! Sampled half-Gaussian weight tables shared by the ETF and FDoG engines.
//!
//! The table stores `g(0), g(1), …, g(k)` for `g(x) = exp(-x²/2σ²) / sqrt(2πσ²)`.
//! The half-width `k` is not configured: it is the first offset at which the
//! weight falls below [`RELATIVE_CUTOFF`] times the peak, so the support grows
//! with sigma.

/// Truncation threshold relative to the peak weight `g(0)`.
pub const RELATIVE_CUTOFF: f32 = 1e-3;

/// Largest sigma a kernel is built for; the table then spans a few hundred taps.
pub const MAX_SIGMA: f32 = 100.0;

/// Normal density with zero mean evaluated at `x`.
#[inline]
pub fn gauss(x: f32, sigma: f32) -> f32 {
    let s2 = sigma * sigma;
    (-(x * x) / (2.0 * s2)).exp() / (2.0 * std::f32::consts::PI * s2).sqrt()
}

/// Immutable half-Gaussian weights, `weights[0]` is the peak.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    sigma: f32,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Build the table for `sigma`. Callers reject `sigma <= 0` beforehand.
    pub fn build(sigma: f32) -> Self {
        debug_assert!(sigma > 0.0, "sigma must be positive");
        let peak = gauss(0.0, sigma);
        let cutoff = peak * RELATIVE_CUTOFF;
        let mut weights = vec![peak];
        let mut x = 1usize;
        loop {
            let w = gauss(x as f32, sigma);
            weights.push(w);
            if w < cutoff || !w.is_finite() {
                break;
            }
            x += 1;
        }
        Self { sigma, weights }
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Largest offset carried by the table.
    pub fn half_width(&self) -> usize {
        self.weights.len() - 1
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at `|offset|`, zero beyond the table.
    #[inline]
    pub fn weight(&self, offset: usize) -> f32 {
        self.weights.get(offset).copied().unwrap_or(0.0)
    }
}

//! Parameters of the line-drawing pipeline.
//!
//! Defaults follow the reference settings: a fairly wide surround
//! (`sigma_r = 2.6`), a strong surround subtraction (`rho = 0.98`) and a high
//! threshold (`tau = 0.98`) that keeps only the most pronounced dark ridges.

use crate::error::CldError;
use crate::kernel::MAX_SIGMA;
use crate::parallel::ParallelOptions;
use serde::{Deserialize, Serialize};

/// Configuration of flow construction, edge detection and post-processing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CldOptions {
    /// Ratio between the surround and centre sigma of the cross-flow DoG.
    pub sigma_r: f32,
    /// Sigma of the along-flow integration.
    pub sigma_m: f32,
    /// Centre sigma of the cross-flow DoG.
    pub sigma_c: f32,
    /// Weight of the surround term; below 1 keeps flat regions non-negative.
    pub rho: f32,
    /// Binarization threshold on the normalized response, in [0,1].
    pub tau: f32,
    /// Half-width of the ETF refinement window.
    pub etf_kernel_radius: usize,
    /// ETF refinement passes (0 keeps the bootstrap field).
    pub etf_iterations: usize,
    /// Re-seeded FDoG repetitions after the first pass.
    pub fdog_iterations: usize,
    /// Odd kernel size of the anti-aliasing blur.
    pub blur_size: usize,
    pub anti_alias: bool,
    pub visualize_flow: bool,
    pub parallel: ParallelOptions,
}

impl Default for CldOptions {
    fn default() -> Self {
        Self {
            sigma_r: 2.6,
            sigma_m: 3.0,
            sigma_c: 1.0,
            rho: 0.98,
            tau: 0.98,
            etf_kernel_radius: 3,
            etf_iterations: 1,
            fdog_iterations: 0,
            blur_size: 3,
            anti_alias: false,
            visualize_flow: false,
            parallel: ParallelOptions::default(),
        }
    }
}

fn check_sigma(name: &'static str, value: f32) -> Result<(), CldError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(CldError::invalid(
            name,
            format!("must be positive and finite, got {value}"),
        ));
    }
    if value > MAX_SIGMA {
        return Err(CldError::invalid(
            name,
            format!("must not exceed {MAX_SIGMA}, got {value}"),
        ));
    }
    Ok(())
}

impl CldOptions {
    /// Reject values the engines cannot handle.
    pub fn validate(&self) -> Result<(), CldError> {
        check_sigma("sigma_r", self.sigma_r)?;
        check_sigma("sigma_m", self.sigma_m)?;
        check_sigma("sigma_c", self.sigma_c)?;
        // The surround kernel is built from the product.
        if self.sigma_r * self.sigma_c > MAX_SIGMA {
            return Err(CldError::invalid(
                "sigma_r",
                format!(
                    "surround sigma {} (sigma_r * sigma_c) exceeds {MAX_SIGMA}",
                    self.sigma_r * self.sigma_c
                ),
            ));
        }
        if !self.rho.is_finite() {
            return Err(CldError::invalid("rho", format!("must be finite, got {}", self.rho)));
        }
        if !(0.0..=1.0).contains(&self.tau) {
            return Err(CldError::invalid(
                "tau",
                format!("must lie in [0, 1], got {}", self.tau),
            ));
        }
        if self.etf_kernel_radius == 0 {
            return Err(CldError::invalid("etf_kernel_radius", "must be at least 1"));
        }
        if self.blur_size == 0 || self.blur_size % 2 == 0 {
            return Err(CldError::invalid(
                "blur_size",
                format!("must be odd and positive, got {}", self.blur_size),
            ));
        }
        Ok(())
    }

    pub fn with_tau(mut self, tau: f32) -> Self {
        self.tau = tau;
        self
    }

    pub fn with_etf(mut self, kernel_radius: usize, iterations: usize) -> Self {
        self.etf_kernel_radius = kernel_radius;
        self.etf_iterations = iterations;
        self
    }

    pub fn with_fdog_iterations(mut self, iterations: usize) -> Self {
        self.fdog_iterations = iterations;
        self
    }

    pub fn with_sigmas(mut self, sigma_c: f32, sigma_r: f32, sigma_m: f32) -> Self {
        self.sigma_c = sigma_c;
        self.sigma_r = sigma_r;
        self.sigma_m = sigma_m;
        self
    }

    pub fn with_post_process(mut self, anti_alias: bool, visualize_flow: bool) -> Self {
        self.anti_alias = anti_alias;
        self.visualize_flow = visualize_flow;
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelOptions) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        CldOptions::default().validate().unwrap();
    }

    #[test]
    fn bad_values_name_the_option() {
        let cases = [
            (CldOptions::default().with_sigmas(0.0, 2.6, 3.0), "sigma_c"),
            (CldOptions::default().with_sigmas(1.0, -1.0, 3.0), "sigma_r"),
            (CldOptions::default().with_sigmas(1.0, 2.6, f32::NAN), "sigma_m"),
            (CldOptions::default().with_tau(1.5), "tau"),
            (CldOptions::default().with_tau(-0.1), "tau"),
            (CldOptions::default().with_etf(0, 1), "etf_kernel_radius"),
            (
                CldOptions {
                    blur_size: 4,
                    ..Default::default()
                },
                "blur_size",
            ),
            (
                CldOptions {
                    rho: f32::INFINITY,
                    ..Default::default()
                },
                "rho",
            ),
        ];
        for (opts, expected) in cases {
            match opts.validate() {
                Err(CldError::InvalidOption { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn huge_sigmas_are_rejected() {
        for (opts, expected) in [
            (CldOptions::default().with_sigmas(1e10, 1.0, 3.0), "sigma_c"),
            (CldOptions::default().with_sigmas(1.0, 2.6, 1e10), "sigma_m"),
            (CldOptions::default().with_sigmas(40.0, 3.0, 3.0), "sigma_r"),
        ] {
            match opts.validate() {
                Err(CldError::InvalidOption { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
        CldOptions::default()
            .with_sigmas(10.0, 10.0, MAX_SIGMA)
            .validate()
            .unwrap();
    }

    #[test]
    fn json_round_trip_is_exact() {
        let opts = CldOptions {
            sigma_r: 2.6,
            sigma_m: 3.1,
            sigma_c: 0.7,
            rho: 0.997,
            tau: 0.123_456_79,
            etf_kernel_radius: 5,
            etf_iterations: 3,
            fdog_iterations: 2,
            blur_size: 5,
            anti_alias: true,
            visualize_flow: true,
            parallel: ParallelOptions::new(true, 17),
        };
        let json = serde_json::to_string(&opts).unwrap();
        let back: CldOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
        assert_eq!(back.tau.to_bits(), opts.tau.to_bits());
        assert_eq!(back.rho.to_bits(), opts.rho.to_bits());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let opts: CldOptions = serde_json::from_str(r#"{ "tau": 0.5, "etf_iterations": 4 }"#).unwrap();
        assert_eq!(opts.tau, 0.5);
        assert_eq!(opts.etf_iterations, 4);
        assert_eq!(opts.sigma_m, CldOptions::default().sigma_m);
    }
}

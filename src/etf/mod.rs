//! Edge Tangent Flow: a smooth field of directions running along edges.
//!
//! Lifecycle
//! - `bootstrap`: min-max normalize the luminance, take 5-tap Sobel
//!   derivatives, normalize the gradient magnitude to [0,1], and rotate each
//!   gradient a quarter turn so vectors follow edges instead of crossing them.
//! - `refine`: apply the weighted-neighbour update of [`refine`] once. Every
//!   pass reads the published field and replaces it wholesale at the end.
//!
//! Coordinates are `(x, y)` = (column, row) throughout; vectors use the same
//! axes, so a vertical step edge yields tangents `(0, ±1)`.

pub mod field;
pub mod refine;

pub use field::FlowField;

use crate::error::CldError;
use crate::filters::{normalize_min_max, sobel5_gradients};
use crate::image::ImageF32;
use crate::parallel::ParallelOptions;
use crate::progress::{ProgressObserver, Stage};
use log::debug;

/// Where the engine is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EtfState {
    /// Field derived from gradients only.
    Bootstrapped,
    /// `n` refinement passes applied.
    Refined(usize),
}

/// Owns the published flow field and the gradient magnitude it was built from.
#[derive(Clone, Debug)]
pub struct EdgeTangentFlow {
    field: FlowField,
    magnitude: ImageF32,
    passes: usize,
    parallel: ParallelOptions,
}

impl EdgeTangentFlow {
    /// Build the initial field from a luminance image.
    pub fn bootstrap(image: &ImageF32, parallel: ParallelOptions) -> Result<Self, CldError> {
        if image.w == 0 || image.h == 0 {
            return Err(CldError::EmptyImage {
                width: image.w,
                height: image.h,
            });
        }
        let luminance = normalize_min_max(&image.sanitized(), 0.0, 1.0).image;
        let grad = sobel5_gradients(&luminance);
        let magnitude = normalize_min_max(&grad.mag, 0.0, 1.0);
        if magnitude.degenerate {
            debug!(
                "ETF: flat gradient magnitude on {}x{}, field is empty",
                image.w, image.h
            );
        }
        let field = FlowField::from_gradients(&grad.gx, &grad.gy);
        Ok(Self {
            field,
            magnitude: magnitude.image,
            passes: 0,
            parallel,
        })
    }

    /// Apply one refinement pass with the given neighbourhood half-width.
    pub fn refine(&mut self, kernel_radius: usize) {
        let next = refine::refine_pass(&self.field, &self.magnitude, kernel_radius, self.parallel);
        self.field = next;
        self.passes += 1;
    }

    /// Apply `iterations` passes, reporting each published field.
    pub fn refine_n(
        &mut self,
        kernel_radius: usize,
        iterations: usize,
        progress: &dyn ProgressObserver,
    ) {
        for pass in 1..=iterations {
            self.refine(kernel_radius);
            debug!("ETF: refinement pass {pass}/{iterations} (radius {kernel_radius})");
            progress.on_stage(Stage::FlowRefined {
                pass,
                total: iterations,
            });
        }
    }

    pub fn state(&self) -> EtfState {
        match self.passes {
            0 => EtfState::Bootstrapped,
            n => EtfState::Refined(n),
        }
    }

    pub fn field(&self) -> &FlowField {
        &self.field
    }

    /// Normalized gradient magnitude in [0,1].
    pub fn magnitude(&self) -> &ImageF32 {
        &self.magnitude
    }

    pub fn into_field(self) -> FlowField {
        self.field
    }
}

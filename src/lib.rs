#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod options;
pub mod pipeline;
pub mod progress;
pub mod types;

// Engine internals, public for tools and tests.
pub mod etf;
pub mod fdog;
pub mod filters;
pub mod kernel;
pub mod parallel;
pub mod postprocess;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::CldError;
pub use crate::options::CldOptions;
pub use crate::pipeline::{
    compute_flow_field, detect_edges, generate, generate_with_progress, Cld, CldOutput,
};
pub use crate::types::{EdgeMask, FlowVector};

pub use crate::diagnostics::CldReport;
pub use crate::etf::FlowField;
pub use crate::parallel::ParallelOptions;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use coherent_lines::prelude::*;
///
/// # fn main() -> Result<(), CldError> {
/// let (w, h) = (320usize, 240usize);
/// let gray = vec![128u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let cld = Cld::new(CldOptions::default())?;
/// let out = cld.process_u8(img)?;
/// println!("lines={} latency_ms={:.3}", out.report.off_pixels, out.report.timing.total_ms);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageF32, ImageU8};
    pub use crate::{generate, Cld, CldError, CldOptions, CldOutput, EdgeMask};
}

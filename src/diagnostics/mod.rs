//! Run report returned alongside the drawing.
//!
//! `CldReport` records the image size, the options in effect, how many passes
//! each engine ran and a per-stage timing trace. It serializes to the JSON
//! written by the `cld` binary when `output.report_json` is set.

pub mod report;
pub mod timing;

pub use report::CldReport;
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};

use super::timing::TimingBreakdown;
use crate::options::CldOptions;
use serde::{Deserialize, Serialize};

/// Summary of one `generate` call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CldReport {
    pub width: usize,
    pub height: usize,
    pub options: CldOptions,
    /// Refinement passes applied to the flow field.
    pub etf_passes: usize,
    /// FDoG passes run, the initial one included.
    pub fdog_passes: usize,
    /// Line pixels (value 0) in the final mask.
    pub off_pixels: usize,
    /// Set when the last pass saw a constant flow-DoG response.
    pub degenerate_response: bool,
    pub timing: TimingBreakdown,
}

impl CldReport {
    /// Fraction of the image covered by lines.
    pub fn line_coverage(&self) -> f32 {
        let total = self.width * self.height;
        if total == 0 {
            0.0
        } else {
            self.off_pixels as f32 / total as f32
        }
    }
}

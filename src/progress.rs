//! Stage notifications for callers that want to report progress.
//!
//! The engines never write to the terminal. Instead the driver reports each
//! completed barrier to a [`ProgressObserver`] supplied by the caller.
use serde::Serialize;

/// A completed stage boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "stage")]
pub enum Stage {
    /// Gradients computed and the initial tangent field published.
    FlowBootstrapped,
    /// Refinement pass `pass` of `total` published (1-based).
    FlowRefined { pass: usize, total: usize },
    /// FDoG pass `pass` produced a mask; pass 0 is the initial detection and
    /// passes `1..=total` are re-seeded repetitions.
    EdgesDetected { pass: usize, total: usize },
    /// Anti-aliasing and flow visualization finished.
    PostProcessed,
}

/// Receives stage boundaries in order from the driver thread.
pub trait ProgressObserver {
    fn on_stage(&self, stage: Stage);
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_stage(&self, _stage: Stage) {}
}

/// Observer forwarding stages to the `log` facade at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_stage(&self, stage: Stage) {
        match stage {
            Stage::FlowBootstrapped => log::info!("edge tangent flow bootstrapped"),
            Stage::FlowRefined { pass, total } => {
                log::info!("edge tangent flow refined ({pass}/{total})")
            }
            Stage::EdgesDetected { pass, total } => {
                log::info!("flow-guided DoG pass {pass} of {total} done")
            }
            Stage::PostProcessed => log::info!("post-processing done"),
        }
    }
}

impl<F: Fn(Stage)> ProgressObserver for F {
    fn on_stage(&self, stage: Stage) {
        self(stage)
    }
}

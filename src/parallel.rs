//! Row-parallel fill of an output grid from immutable inputs.
//!
//! Every per-pixel stage of the pipeline is written as a closure that computes
//! one output row from read-only snapshots. The closure never sees the buffer
//! it writes into, so the result is independent of scheduling order. Returning
//! from [`fill_rows`] is the barrier: all rows are complete before the caller
//! can read any of them.
use serde::{Deserialize, Serialize};

/// Controls whether per-pixel stages run sequentially or with Rayon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelOptions {
    pub enabled: bool,
    /// Smallest image (in pixels) for which the thread pool is used.
    pub min_pixels: usize,
}

impl ParallelOptions {
    pub fn new(enabled: bool, min_pixels: usize) -> Self {
        Self {
            enabled,
            min_pixels: min_pixels.max(1),
        }
    }

    /// Disable parallel execution regardless of image size.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_pixels: usize::MAX,
        }
    }

    /// Returns true when parallel execution should be used for `pixels`.
    pub fn should_parallelize(&self, pixels: usize) -> bool {
        self.enabled && pixels >= self.min_pixels
    }
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            min_pixels: 4096,
        }
    }
}

/// Fill `out` (row-major, `width` items per row) by calling `row_fn(y, row)`
/// for every row.
pub fn fill_rows<T, F>(out: &mut [T], width: usize, parallel: ParallelOptions, row_fn: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if width == 0 || out.is_empty() {
        return;
    }
    debug_assert_eq!(out.len() % width, 0, "buffer is not a whole number of rows");

    if parallel.should_parallelize(out.len()) {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            out.par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| row_fn(y, row));
            return;
        }
    }

    for (y, row) in out.chunks_mut(width).enumerate() {
        row_fn(y, row);
    }
}

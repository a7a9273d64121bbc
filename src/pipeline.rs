//! Entry points tying the engines together.
//!
//! `generate` runs the whole drawing pipeline:
//! 1. ETF bootstrap and `etf_iterations` refinement passes.
//! 2. One FDoG pass on the source luminance.
//! 3. `fdog_iterations` re-seeded passes, each working on the image produced
//!    by the previous re-seed.
//! 4. Optional anti-aliasing of the final mask and a LIC flow preview.
//!
//! Every stage completes before the next starts, so callers only ever see
//! whole passes through the [`ProgressObserver`].
use crate::diagnostics::{elapsed_ms, CldReport, TimingBreakdown};
use crate::error::CldError;
use crate::etf::{EdgeTangentFlow, FlowField};
use crate::fdog;
use crate::image::{GrayImageU8, ImageF32, ImageU8};
use crate::options::CldOptions;
use crate::parallel::ParallelOptions;
use crate::postprocess::{anti_alias, visualize_flow, LicParams};
use crate::progress::{NoProgress, ProgressObserver, Stage};
use crate::types::EdgeMask;
use log::debug;
use std::time::Instant;

/// Everything a `generate` call produces.
#[derive(Clone, Debug)]
pub struct CldOutput {
    /// Final binary mask; 0 marks line pixels.
    pub mask: EdgeMask,
    /// Smoothed mask, present when `anti_alias` is set.
    pub anti_aliased: Option<GrayImageU8>,
    /// LIC rendering of the flow field, present when `visualize_flow` is set.
    pub flow_preview: Option<ImageF32>,
    pub report: CldReport,
}

fn ensure_not_empty(image: &ImageF32) -> Result<(), CldError> {
    if image.w == 0 || image.h == 0 {
        return Err(CldError::EmptyImage {
            width: image.w,
            height: image.h,
        });
    }
    Ok(())
}

/// Bootstrap the edge tangent flow of `image` and refine it `iterations` times.
pub fn compute_flow_field(
    image: &ImageF32,
    kernel_radius: usize,
    iterations: usize,
) -> Result<FlowField, CldError> {
    compute_flow_field_with(
        image,
        kernel_radius,
        iterations,
        ParallelOptions::default(),
        &NoProgress,
    )
}

/// [`compute_flow_field`] with explicit parallelism and progress reporting.
pub fn compute_flow_field_with(
    image: &ImageF32,
    kernel_radius: usize,
    iterations: usize,
    parallel: ParallelOptions,
    progress: &dyn ProgressObserver,
) -> Result<FlowField, CldError> {
    if kernel_radius == 0 {
        return Err(CldError::invalid("etf_kernel_radius", "must be at least 1"));
    }
    let mut etf = EdgeTangentFlow::bootstrap(image, parallel)?;
    progress.on_stage(Stage::FlowBootstrapped);
    etf.refine_n(kernel_radius, iterations, progress);
    Ok(etf.into_field())
}

/// Run a single FDoG pass and return its mask.
///
/// Pure in its inputs: repeated calls with the same arguments give the same
/// mask.
pub fn detect_edges(
    image: &ImageF32,
    field: &FlowField,
    options: &CldOptions,
) -> Result<EdgeMask, CldError> {
    options.validate()?;
    ensure_not_empty(image)?;
    let pass = fdog::run_pass(&image.sanitized(), field, options, options.parallel)?;
    Ok(pass.mask)
}

/// Full pipeline without progress reporting.
pub fn generate(image: &ImageF32, options: &CldOptions) -> Result<CldOutput, CldError> {
    generate_with_progress(image, options, &NoProgress)
}

/// Full pipeline, reporting every completed stage to `progress`.
pub fn generate_with_progress(
    image: &ImageF32,
    options: &CldOptions,
    progress: &dyn ProgressObserver,
) -> Result<CldOutput, CldError> {
    options.validate()?;
    ensure_not_empty(image)?;
    let total_start = Instant::now();
    let parallel = options.parallel;
    let mut timing = TimingBreakdown::default();

    let source = image.sanitized();
    let field = timing.measure("etf", || {
        compute_flow_field_with(
            &source,
            options.etf_kernel_radius,
            options.etf_iterations,
            parallel,
            progress,
        )
    })?;

    let total = options.fdog_iterations;
    let mut pass = timing.measure("fdog pass 0", || {
        fdog::run_pass(&source, &field, options, parallel)
    })?;
    progress.on_stage(Stage::EdgesDetected { pass: 0, total });

    let mut working = source;
    for i in 1..=total {
        working = fdog::reseed(&working, &pass.mask)?;
        pass = timing.measure(format!("fdog pass {i}"), || {
            fdog::run_pass(&working, &field, options, parallel)
        })?;
        progress.on_stage(Stage::EdgesDetected { pass: i, total });
    }

    let post_start = Instant::now();
    let anti_aliased = if options.anti_alias {
        Some(anti_alias(&pass.mask, options.blur_size)?)
    } else {
        None
    };
    let flow_preview = options
        .visualize_flow
        .then(|| visualize_flow(&field, &LicParams::default(), parallel));
    timing.push("post-process", elapsed_ms(post_start));
    progress.on_stage(Stage::PostProcessed);

    timing.total_ms = elapsed_ms(total_start);
    let report = CldReport {
        width: image.w,
        height: image.h,
        options: options.clone(),
        etf_passes: options.etf_iterations,
        fdog_passes: total + 1,
        off_pixels: pass.mask.off_pixels(),
        degenerate_response: pass.flow_dog.degenerate,
        timing,
    };
    debug!(
        "generated {}x{} drawing in {:.1} ms ({} line pixels)",
        report.width, report.height, report.timing.total_ms, report.off_pixels
    );

    Ok(CldOutput {
        mask: pass.mask,
        anti_aliased,
        flow_preview,
        report,
    })
}

/// Reusable pipeline bound to validated options.
#[derive(Clone, Debug)]
pub struct Cld {
    options: CldOptions,
}

impl Cld {
    pub fn new(options: CldOptions) -> Result<Self, CldError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &CldOptions {
        &self.options
    }

    /// Draw lines for a luminance image in [0,1].
    pub fn process(&self, image: &ImageF32) -> Result<CldOutput, CldError> {
        generate(image, &self.options)
    }

    /// Draw lines for an 8-bit grayscale view.
    pub fn process_u8(&self, gray: ImageU8<'_>) -> Result<CldOutput, CldError> {
        self.process(&ImageF32::from_u8(&gray))
    }

    pub fn process_with_progress(
        &self,
        image: &ImageF32,
        progress: &dyn ProgressObserver,
    ) -> Result<CldOutput, CldError> {
        generate_with_progress(image, &self.options, progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn step(w: usize, h: usize) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in w / 2..w {
                img.set(x, y, 1.0);
            }
        }
        img
    }

    #[test]
    fn stages_arrive_in_order() {
        let options = CldOptions::default()
            .with_etf(3, 2)
            .with_fdog_iterations(2)
            .with_parallel(ParallelOptions::disabled());
        let seen = RefCell::new(Vec::new());
        let observer = |stage: Stage| seen.borrow_mut().push(stage);
        generate_with_progress(&step(12, 12), &options, &observer).unwrap();
        assert_eq!(
            seen.into_inner(),
            vec![
                Stage::FlowBootstrapped,
                Stage::FlowRefined { pass: 1, total: 2 },
                Stage::FlowRefined { pass: 2, total: 2 },
                Stage::EdgesDetected { pass: 0, total: 2 },
                Stage::EdgesDetected { pass: 1, total: 2 },
                Stage::EdgesDetected { pass: 2, total: 2 },
                Stage::PostProcessed,
            ]
        );
    }

    #[test]
    fn report_counts_passes_and_outputs_follow_flags() {
        let options = CldOptions::default()
            .with_tau(0.9)
            .with_fdog_iterations(1)
            .with_post_process(true, true);
        let out = generate(&step(16, 16), &options).unwrap();
        assert_eq!(out.report.fdog_passes, 2);
        assert_eq!(out.report.etf_passes, 1);
        assert_eq!((out.report.width, out.report.height), (16, 16));
        assert_eq!(out.report.off_pixels, out.mask.off_pixels());
        let aa = out.anti_aliased.unwrap();
        assert_eq!((aa.width(), aa.height()), (16, 16));
        let preview = out.flow_preview.unwrap();
        assert_eq!((preview.w, preview.h), (16, 16));
        let labels: Vec<_> = out.report.timing.stages.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["etf", "fdog pass 0", "fdog pass 1", "post-process"]);

        let plain = generate(&step(16, 16), &CldOptions::default()).unwrap();
        assert!(plain.anti_aliased.is_none());
        assert!(plain.flow_preview.is_none());
    }

    #[test]
    fn invalid_options_fail_before_any_work() {
        let seen = RefCell::new(0usize);
        let observer = |_: Stage| *seen.borrow_mut() += 1;
        let err = generate_with_progress(&step(8, 8), &CldOptions::default().with_tau(2.0), &observer)
            .unwrap_err();
        assert!(matches!(err, CldError::InvalidOption { name: "tau", .. }));
        assert_eq!(seen.into_inner(), 0);
    }

    #[test]
    fn empty_image_is_rejected() {
        let err = generate(&ImageF32::new(0, 3), &CldOptions::default()).unwrap_err();
        assert_eq!(err, CldError::EmptyImage { width: 0, height: 3 });
        assert!(compute_flow_field(&ImageF32::new(4, 0), 3, 1).is_err());
    }

    #[test]
    fn zero_radius_is_rejected() {
        assert!(matches!(
            compute_flow_field(&step(8, 8), 0, 1),
            Err(CldError::InvalidOption { name: "etf_kernel_radius", .. })
        ));
    }

    #[test]
    fn cld_handle_matches_free_function() {
        let options = CldOptions::default().with_tau(0.9);
        let cld = Cld::new(options.clone()).unwrap();
        let img = step(10, 6);
        let bytes: Vec<u8> = img.data.iter().map(|&v| (v * 255.0) as u8).collect();
        let a = cld.process(&img).unwrap();
        let b = cld.process_u8(ImageU8::packed(10, 6, &bytes)).unwrap();
        let c = generate(&img, &options).unwrap();
        assert_eq!(a.mask, c.mask);
        assert_eq!(b.mask, c.mask);
        assert!(Cld::new(CldOptions::default().with_sigmas(-1.0, 2.6, 3.0)).is_err());
    }
}

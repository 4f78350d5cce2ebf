//! Detection passes over one frame.
//!
//! A [`Detector`] holds only immutable settings and its match engine. Each
//! call runs a complete pass and returns owned outputs, so concurrent passes
//! over different frames need no coordination beyond the shared known-library
//! lock.
//!
//! Locking during a pass:
//!
//! - the known-templates library is read-locked once, by the calling thread,
//!   for the entire fan-out; workers read through that guard and writers wait
//!   until the pass ends;
//! - the samples library and the detection set each have their own mutex,
//!   held only for one insertion.

use crate::bank::TemplateLibrary;
use crate::candidate::overlap::resolve_overlaps;
use crate::contour::{filter_contours, Contour, ContourFilterParams, ContourSet};
use crate::image::ImageView;
use crate::preprocess::{preprocess, PreprocessConfig};
use crate::search::{CorrelationMatcher, FoundTemplate, MatchEngine};
use crate::trace::{trace_event, trace_span};
use crate::util::{DetectError, DetectResult};
use image::GrayImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

mod fanout;

use fanout::{FanOutSinks, UnitContext};

/// Configuration for a detection pass.
#[derive(Clone, Debug)]
pub struct DetectorConfig {
    /// Preprocessing stages (frame input only).
    pub preprocess: PreprocessConfig,
    /// Enables the size/shape contour test.
    pub filter_contours_by_size: bool,
    /// Minimum boundary point count.
    pub min_contour_length: usize,
    /// Minimum enclosed area.
    pub min_contour_area: f64,
    /// Area-per-point ratio at or below which a contour is rejected.
    pub min_form_factor: f64,
    /// Skip matching; only filtered contours and samples are produced.
    pub only_find_contours: bool,
    /// Descriptor length; must equal the known library's.
    pub template_size: usize,
    /// Run the fan-out on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            preprocess: PreprocessConfig::default(),
            filter_contours_by_size: true,
            min_contour_length: 15,
            min_contour_area: 10.0,
            min_form_factor: 0.5,
            only_find_contours: false,
            template_size: 30,
            parallel: true,
        }
    }
}

impl DetectorConfig {
    /// Checks ranges that would otherwise surface mid-pass.
    pub fn validate(&self) -> DetectResult<()> {
        if self.template_size < 2 {
            return Err(DetectError::InvalidInput("template_size must be >= 2"));
        }
        if !self.min_contour_area.is_finite() || !self.min_form_factor.is_finite() {
            return Err(DetectError::InvalidInput("contour thresholds must be finite"));
        }
        if !self.preprocess.canny_threshold.is_finite()
            || !self.preprocess.adaptive_threshold_constant.is_finite()
        {
            return Err(DetectError::InvalidInput("preprocess thresholds must be finite"));
        }
        Ok(())
    }

    /// Filter settings derived from this configuration.
    ///
    /// The edge-support test follows `preprocess.noise_filter`, which is also
    /// what produces the edge mask.
    pub fn filter_params(&self) -> ContourFilterParams {
        ContourFilterParams {
            filter_by_size: self.filter_contours_by_size,
            min_contour_length: self.min_contour_length,
            min_contour_area: self.min_contour_area,
            min_form_factor: self.min_form_factor,
            edge_support: self.preprocess.noise_filter,
        }
    }
}

/// Cooperative cancellation flag checked between contour units.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; units already running finish normally.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outputs of a pass over a contour set.
#[derive(Clone, Debug)]
pub struct Detections {
    /// Contours that passed the filter, in sibling order.
    pub contours: Vec<Contour>,
    /// One descriptor per filtered contour, ordered by contour index.
    pub samples: TemplateLibrary,
    /// Resolved detections, largest first.
    pub found: Vec<FoundTemplate>,
}

/// Outputs of a pass over a frame.
#[derive(Clone, Debug)]
pub struct FrameDetections {
    /// Binary frame the contours were traced from.
    pub binarized: GrayImage,
    /// Dilated edge mask, when edge filtering was enabled.
    pub edge_mask: Option<GrayImage>,
    /// Contour, sample, and detection outputs.
    pub detections: Detections,
}

/// Runs detection passes with a fixed configuration and match engine.
pub struct Detector<M = CorrelationMatcher> {
    cfg: DetectorConfig,
    engine: M,
    cancel: Option<CancelToken>,
}

impl Detector<CorrelationMatcher> {
    /// Creates a detector with the default correlation matcher.
    pub fn new(cfg: DetectorConfig) -> DetectResult<Self> {
        Self::with_engine(cfg, CorrelationMatcher::default())
    }
}

impl<M: MatchEngine> Detector<M> {
    /// Creates a detector with a custom match engine.
    pub fn with_engine(cfg: DetectorConfig, engine: M) -> DetectResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            engine,
            cancel: None,
        })
    }

    /// Attaches a cancellation token honored between contour units.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Returns the match engine.
    pub fn engine(&self) -> &M {
        &self.engine
    }

    /// Preprocesses a grayscale frame and runs a full pass on its contours.
    pub fn process_frame(
        &self,
        frame: ImageView<'_, u8>,
        known: &RwLock<TemplateLibrary>,
    ) -> DetectResult<FrameDetections> {
        let pre = preprocess(frame, &self.cfg.preprocess)?;
        let detections = self.process_contours(
            &pre.contours,
            pre.edge_mask.as_ref(),
            frame.width(),
            frame.height(),
            known,
        )?;
        Ok(FrameDetections {
            binarized: pre.binarized,
            edge_mask: pre.edge_mask,
            detections,
        })
    }

    /// Filters a traced contour set, matches the survivors, and resolves
    /// overlapping detections.
    pub fn process_contours(
        &self,
        set: &ContourSet,
        edge_mask: Option<&GrayImage>,
        frame_width: usize,
        frame_height: usize,
        known: &RwLock<TemplateLibrary>,
    ) -> DetectResult<Detections> {
        let contours = filter_contours(
            set,
            &self.cfg.filter_params(),
            edge_mask,
            frame_width,
            frame_height,
        );

        let sinks = FanOutSinks::new(self.cfg.template_size)?;
        if self.cfg.only_find_contours {
            self.fan_out(None, &sinks, &contours)?;
        } else {
            let guard = known
                .read()
                .map_err(|_| DetectError::LockPoisoned { what: "known templates" })?;
            if guard.template_size() != self.cfg.template_size {
                return Err(DetectError::DescriptorLengthMismatch {
                    expected: guard.template_size(),
                    got: self.cfg.template_size,
                });
            }
            self.fan_out(Some(&*guard), &sinks, &contours)?;
        }

        let (mut samples, mut found) = sinks.into_parts()?;
        samples.sort_by_contour_index();
        resolve_overlaps(&mut found);

        Ok(Detections {
            contours,
            samples,
            found,
        })
    }

    fn fan_out(
        &self,
        known: Option<&TemplateLibrary>,
        sinks: &FanOutSinks,
        contours: &[Contour],
    ) -> DetectResult<()> {
        let _span = trace_span!(
            "fan_out",
            contours = contours.len(),
            parallel = self.cfg.parallel,
            match_enabled = known.is_some()
        )
        .entered();

        let ctx = UnitContext {
            engine: &self.engine,
            known,
            template_size: self.cfg.template_size,
            cancel: self.cancel.as_ref(),
        };

        #[cfg(feature = "rayon")]
        let result = if self.cfg.parallel {
            fanout::fan_out_parallel(&ctx, sinks, contours)
        } else {
            fanout::fan_out_sequential(&ctx, sinks, contours)
        };
        #[cfg(not(feature = "rayon"))]
        let result = fanout::fan_out_sequential(&ctx, sinks, contours);

        trace_event!("fan_out_done", ok = result.is_ok());
        result
    }
}

//! Per-contour fan-out: descriptor build, sample recording, matching.
//!
//! The caller holds the known-library read guard for the whole fan-out and
//! passes the borrowed library in. The samples library and the detection set
//! each sit behind their own mutex, locked only around a single push, so
//! descriptor building and matching run fully in parallel.

use crate::bank::TemplateLibrary;
use crate::contour::Contour;
use crate::detector::CancelToken;
use crate::search::{FoundTemplate, MatchEngine};
use crate::template::Template;
use crate::util::{DetectError, DetectResult};
use std::sync::Mutex;

/// Shared outputs written by the workers.
pub(crate) struct FanOutSinks {
    pub(crate) samples: Mutex<TemplateLibrary>,
    pub(crate) found: Mutex<Vec<FoundTemplate>>,
}

impl FanOutSinks {
    pub(crate) fn new(template_size: usize) -> DetectResult<Self> {
        Ok(Self {
            samples: Mutex::new(TemplateLibrary::new(template_size)?),
            found: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn into_parts(self) -> DetectResult<(TemplateLibrary, Vec<FoundTemplate>)> {
        let samples = self
            .samples
            .into_inner()
            .map_err(|_| DetectError::LockPoisoned { what: "samples" })?;
        let found = self
            .found
            .into_inner()
            .map_err(|_| DetectError::LockPoisoned { what: "detections" })?;
        Ok((samples, found))
    }
}

/// Everything one unit of work reads.
pub(crate) struct UnitContext<'a, M> {
    pub(crate) engine: &'a M,
    /// `None` in contours-only mode: the matcher is never called.
    pub(crate) known: Option<&'a TemplateLibrary>,
    pub(crate) template_size: usize,
    pub(crate) cancel: Option<&'a CancelToken>,
}

fn process_unit<M: MatchEngine>(
    ctx: &UnitContext<'_, M>,
    sinks: &FanOutSinks,
    contour_index: usize,
    contour: &Contour,
) -> DetectResult<()> {
    if ctx.cancel.is_some_and(CancelToken::is_cancelled) {
        return Err(DetectError::Cancelled);
    }

    let sample = Template::from_contour(contour, contour_index, ctx.template_size)?;
    let hit = ctx
        .known
        .and_then(|library| ctx.engine.find_template(library, &sample));

    sinks
        .samples
        .lock()
        .map_err(|_| DetectError::LockPoisoned { what: "samples" })?
        .push(sample)?;

    if let Some(found) = hit {
        sinks
            .found
            .lock()
            .map_err(|_| DetectError::LockPoisoned { what: "detections" })?
            .push(found);
    }
    Ok(())
}

/// Runs every unit on the calling thread.
pub(crate) fn fan_out_sequential<M: MatchEngine>(
    ctx: &UnitContext<'_, M>,
    sinks: &FanOutSinks,
    contours: &[Contour],
) -> DetectResult<()> {
    contours
        .iter()
        .enumerate()
        .try_for_each(|(idx, contour)| process_unit(ctx, sinks, idx, contour))
}

/// Runs units on the rayon pool; returns after every unit has finished.
#[cfg(feature = "rayon")]
pub(crate) fn fan_out_parallel<M: MatchEngine>(
    ctx: &UnitContext<'_, M>,
    sinks: &FanOutSinks,
    contours: &[Contour],
) -> DetectResult<()> {
    use rayon::prelude::*;

    contours
        .par_iter()
        .enumerate()
        .try_for_each(|(idx, contour)| process_unit(ctx, sinks, idx, contour))
}

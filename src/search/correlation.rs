//! Normalized cyclic cross-correlation matcher.

use crate::bank::TemplateLibrary;
use crate::kernel::{inter_correlation, max_abs_deviation};
use crate::search::{FoundTemplate, MatchConfig, MatchEngine};
use crate::template::Template;
use crate::util::math::wrap_deg;

/// Default [`MatchEngine`] scoring samples by normalized inter-correlation.
///
/// The rate is `max_s |<a, shift_s(b)>| / (|a| |b|)`, which lies in [0, 1]
/// and is invariant to translation, scale, rotation, and start point.
#[derive(Clone, Debug, Default)]
pub struct CorrelationMatcher {
    cfg: MatchConfig,
}

impl CorrelationMatcher {
    /// Creates a matcher with default acceptance settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the acceptance settings.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active acceptance settings.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Scores one pair; `None` when the pair is not comparable or fails the
    /// prefilter.
    pub fn score(&self, template: &Template, sample: &Template) -> Option<(f64, f64)> {
        if template.len() != sample.len() {
            return None;
        }
        let denom = template.norm() * sample.norm();
        if denom <= f64::EPSILON {
            return None;
        }
        if self.cfg.use_acf_prefilter
            && max_abs_deviation(template.acf(), sample.acf()) > self.cfg.max_acf_deviation
        {
            return None;
        }
        let (coeff, _shift, magnitude) = inter_correlation(sample.vectors(), template.vectors())?;
        let rate = (magnitude / denom).clamp(0.0, 1.0);
        Some((rate, wrap_deg(coeff.arg().to_degrees())))
    }
}

impl MatchEngine for CorrelationMatcher {
    fn find_template(&self, library: &TemplateLibrary, sample: &Template) -> Option<FoundTemplate> {
        let mut best: Option<(usize, f64, f64)> = None;
        for (index, template) in library.iter().enumerate() {
            let Some((rate, angle_deg)) = self.score(template, sample) else {
                continue;
            };
            match best {
                Some((_, best_rate, _)) if best_rate >= rate => {}
                _ => best = Some((index, rate, angle_deg)),
            }
        }

        let (template_index, rate, angle_deg) = best?;
        if rate < self.cfg.min_rate {
            return None;
        }
        let template_area = library.get(template_index)?.source_area();
        let scale = if template_area > f64::EPSILON {
            (sample.source_area() / template_area).sqrt()
        } else {
            1.0
        };
        Some(FoundTemplate {
            sample: sample.clone(),
            template_index,
            rate,
            angle_deg,
            scale,
        })
    }
}

//! Matching samples against a template library.
//!
//! [`MatchEngine`] is the seam between the detector and the similarity
//! algorithm. The detector only needs "best entry above threshold, or none",
//! so tests can plug in deterministic engines. [`CorrelationMatcher`] is the
//! default engine, built on the cyclic correlation kernels.

use crate::bank::TemplateLibrary;
use crate::template::Template;

mod correlation;

pub use correlation::CorrelationMatcher;

/// A sample accepted as an instance of a library entry.
#[derive(Clone, Debug)]
pub struct FoundTemplate {
    /// The per-frame sample that matched.
    pub sample: Template,
    /// Index of the matched entry in the known-templates library.
    pub template_index: usize,
    /// Confidence in [0, 1].
    pub rate: f64,
    /// Rotation of the sample relative to the entry, in [-180, 180).
    pub angle_deg: f64,
    /// Linear scale of the sample relative to the entry.
    pub scale: f64,
}

/// Similarity search over a template library.
///
/// Implementations must not mutate their inputs and must be callable from
/// several threads at once against the same library.
pub trait MatchEngine: Sync {
    /// Returns the best entry whose score clears the engine's acceptance
    /// threshold, or `None`.
    fn find_template(&self, library: &TemplateLibrary, sample: &Template) -> Option<FoundTemplate>;
}

/// Acceptance settings for [`CorrelationMatcher`].
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Minimum normalized inter-correlation for a match.
    pub min_rate: f64,
    /// Largest tolerated ACF difference before an entry is skipped.
    pub max_acf_deviation: f64,
    /// Enables the ACF prefilter.
    pub use_acf_prefilter: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_rate: 0.85,
            max_acf_deviation: 0.25,
            use_acf_prefilter: true,
        }
    }
}

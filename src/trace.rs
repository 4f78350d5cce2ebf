//! Conditional tracing macros (zero-cost when feature disabled).
//!
//! With the `tracing` feature enabled, the macros below forward to `tracing`
//! so a subscriber sees one span per pipeline stage (`preprocess`,
//! `filter_contours`, `fan_out`, `resolve_overlaps`) and count events inside
//! them. Without the feature they compile to nothing.

/// Create an info-level span for a pipeline stage.
///
/// When the `tracing` feature is disabled, this returns a [`NoopSpan`] so
/// call sites can use `let _span = trace_span!(...).entered();` unconditionally.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emit an info-level event carrying stage counts.
///
/// When disabled, the values are still evaluated so call sites do not
/// trigger unused warnings.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Stand-in span guard used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mimicking `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

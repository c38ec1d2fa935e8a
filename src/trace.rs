//! Logging hooks for the merge pipeline.
//!
//! Spans: `merge`, `merge_batch`, `ensemble_run`, `detector_predict`.
//! Summary events (`merge_result`, `merge_batch_result`) are logged at info;
//! per-backend events (`source_detections`, `prefilter_result`) at debug, so
//! `detmerge=info` shows one line per merge and `detmerge=debug` shows each
//! source.
//!
//! Without the `tracing` feature every macro expands to a [`NoopSpan`] or to
//! nothing, and call sites carry no `cfg`.

/// Opens an info-level span for a pipeline stage.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($stage:literal $(, $($field:tt)*)?) => {
        tracing::info_span!($stage $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($stage:literal $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Logs a count summary for a merge stage at info level.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($event:literal, $($key:ident = $count:expr),+ $(,)?) => {
        tracing::info!(name: $event, $($key = $count),+)
    };
}

/// Logs per-backend counts at debug level.
#[cfg(feature = "tracing")]
macro_rules! trace_source {
    ($event:literal, $($key:ident = $count:expr),+ $(,)?) => {
        tracing::debug!(name: $event, $($key = $count),+)
    };
}

// Counts are cheap; they are still evaluated so both builds see the same
// borrows.
#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($event:literal, $($key:ident = $count:expr),+ $(,)?) => {
        $crate::trace::discard(($($count,)+))
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_source {
    ($event:literal, $($key:ident = $count:expr),+ $(,)?) => {
        $crate::trace::discard(($($count,)+))
    };
}

pub(crate) use trace_event;
pub(crate) use trace_source;
pub(crate) use trace_span;

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub(crate) fn discard<T>(_fields: T) {}

/// Span guard used when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Same shape as `tracing::Span::entered`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

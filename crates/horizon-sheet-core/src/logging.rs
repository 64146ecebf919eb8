//! Logging facilities for Horizon Sheet.
//!
//! Horizon Sheet uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_sheet=debug")
//!         .init();
//! }
//! ```
//!
//! Every subsystem logs with one of the stable [`targets`], so a filter such
//! as `horizon_sheet::render=trace` isolates the renderer.

/// Span names used throughout Horizon Sheet for tracing.
pub mod span_names {
    /// Full viewport redraw.
    pub const REDRAW: &str = "horizon_sheet::redraw";
    /// Structural row/column mutation.
    pub const MUTATION: &str = "horizon_sheet::mutation";
    /// Undo or redo replay.
    pub const HISTORY: &str = "horizon_sheet::history";
    /// Clipboard paste.
    pub const PASTE: &str = "horizon_sheet::paste";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_sheet_core";
    /// Timer system target.
    pub const TIMER: &str = "horizon_sheet_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_sheet_core::signal";
    /// Sheet controller target.
    pub const SHEET: &str = "horizon_sheet";
    /// Viewport renderer target.
    pub const RENDER: &str = "horizon_sheet::render";
    /// Selection manager target.
    pub const SELECTION: &str = "horizon_sheet::selection";
    /// Edit controller target.
    pub const EDIT: &str = "horizon_sheet::edit";
    /// Undo/redo engine target.
    pub const HISTORY: &str = "horizon_sheet::history";
    /// Row/column mutation target.
    pub const MUTATION: &str = "horizon_sheet::mutation";
    /// Clipboard target.
    pub const CLIPBOARD: &str = "horizon_sheet::clipboard";
    /// Performance spans target.
    pub const PERF: &str = "horizon_sheet::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_sheet::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros with the core target.
#[macro_export]
macro_rules! sheet_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_sheet_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! sheet_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_sheet_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! sheet_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_sheet_core", $($arg)*)
    };
}

//! Core systems for Horizon Sheet.
//!
//! This crate provides the foundational pieces the sheet widget is built on:
//!
//! - **Signal/Slot System**: Type-safe observer registry used for sheet events
//! - **Timers**: One-shot timers and a debouncer used to batch redraws
//! - **Logging**: Stable `tracing` targets, span names and helper macros
//! - **Geometry**: Points, sizes, rectangles and colors in pixel space
//!
//! # Debounce Example
//!
//! ```
//! use horizon_sheet_core::{Debouncer, TimerManager};
//! use std::time::{Duration, Instant};
//!
//! let mut timers = TimerManager::new();
//! let mut redraw = Debouncer::new(Duration::from_millis(16));
//! let now = Instant::now();
//!
//! // Many requests within one tick collapse into a single timer.
//! redraw.schedule(&mut timers, now);
//! redraw.schedule(&mut timers, now);
//! assert_eq!(timers.active_count(), 1);
//!
//! let fired = timers.process_expired(now + Duration::from_millis(16));
//! assert!(redraw.fire(&fired));
//! ```

mod error;
pub mod logging;
pub mod signal;
mod timer;
pub mod types;

pub use error::{CoreError, Result, SignalError, TimerError};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{Debouncer, TimerId, TimerManager};
pub use types::{Color, Point, Rect, Size};

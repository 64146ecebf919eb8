//! Timer system for Horizon Sheet.
//!
//! Provides one-shot timers driven by the host's event loop. The host calls
//! [`TimerManager::process_expired`] with the current instant; nothing here
//! sleeps or spawns threads. [`Debouncer`] builds on it to coalesce bursts of
//! requests into a single deferred action, which is how redraws are batched.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages pending one-shot timers.
#[derive(Debug)]
pub struct TimerManager {
    /// Pending timer ids. Fire times live in the queue.
    timers: SlotMap<TimerId, ()>,
    /// Priority queue of pending timer fires (min-heap by fire time).
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Start a one-shot timer that fires `delay` after `now`.
    pub fn start_one_shot(&mut self, now: Instant, delay: Duration) -> TimerId {
        let fire_time = now + delay;
        let id = self.timers.insert(());
        self.queue.push(TimerQueueEntry { id, fire_time });
        tracing::trace!(target: targets::TIMER, ?id, ?delay, "timer started");
        id
    }

    /// Stop and remove a timer.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if self.timers.remove(id).is_some() {
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId(id).into())
        }
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        // Clean up stopped timers from the front of the queue.
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }

        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Remove and return every timer due at or before `now`, earliest first.
    #[tracing::instrument(skip(self), target = "horizon_sheet_core::timer", level = "trace")]
    pub fn process_expired(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            if self.timers.remove(entry.id).is_some() {
                tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
                fired.push(entry.id);
            }
        }

        fired
    }

    /// Get the number of pending timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Coalesces repeated requests into one deferred firing.
///
/// While a request is pending, further calls to [`schedule`](Self::schedule)
/// are ignored. The pending handle is cleared before [`fire`](Self::fire)
/// reports success, so the action it guards may schedule again.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<TimerId>,
}

impl Debouncer {
    /// Create a debouncer with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay used by future requests.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Whether a request is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedule a firing unless one is already pending.
    ///
    /// Returns `true` when a new timer was started.
    pub fn schedule(&mut self, timers: &mut TimerManager, now: Instant) -> bool {
        if self.pending.is_some() {
            crate::sheet_trace!("debounced request coalesced");
            return false;
        }
        self.pending = Some(timers.start_one_shot(now, self.delay));
        true
    }

    /// Consume the pending request if `fired` contains its timer.
    pub fn fire(&mut self, fired: &[TimerId]) -> bool {
        match self.pending {
            Some(id) if fired.contains(&id) => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending request without firing.
    pub fn cancel(&mut self, timers: &mut TimerManager) {
        if let Some(id) = self.pending.take()
            && timers.stop(id).is_err()
        {
            crate::sheet_debug!(?id, "debounced timer already gone");
        }
    }
}
